// SPDX-License-Identifier: MPL-2.0
//! The closed set of languages the application speaks.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Zh,
    Ko,
}

impl Locale {
    /// Every supported locale, in language-picker order.
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Zh, Locale::Ko];

    /// Lowercase language code, also the stem of the locale's `.ftl` file.
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
            Locale::Ko => "ko",
        }
    }

    /// The language's own name for itself.
    pub fn native_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Zh => "中文",
            Locale::Ko => "한국어",
        }
    }

    pub fn language_identifier(self) -> LanguageIdentifier {
        match self {
            Locale::En => unic_langid::langid!("en"),
            Locale::Zh => unic_langid::langid!("zh"),
            Locale::Ko => unic_langid::langid!("ko"),
        }
    }

    fn from_language(language: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(language))
    }
}

impl FromStr for Locale {
    type Err = Error;

    /// Accepts bare codes (`ko`) and full tags whose language matches
    /// (`ko-KR`, `zh_CN`, `en-US`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(locale) = Self::from_language(trimmed) {
            return Ok(locale);
        }
        trimmed
            .replace('_', "-")
            .parse::<LanguageIdentifier>()
            .ok()
            .and_then(|langid| Self::from_language(langid.language.as_str()))
            .ok_or_else(|| Error::UnsupportedLocale(s.to_string()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Picks the locale to use: explicit choice, then configured language, then
/// the operating system's locale, then English.
pub fn resolve_locale(cli_lang: Option<&str>, configured: Option<&str>) -> Locale {
    resolve_locale_with_system(cli_lang, configured, sys_locale::get_locale().as_deref())
}

fn resolve_locale_with_system(
    cli_lang: Option<&str>,
    configured: Option<&str>,
    system: Option<&str>,
) -> Locale {
    [cli_lang, configured, system]
        .into_iter()
        .flatten()
        .find_map(|candidate| candidate.parse().ok())
        .unwrap_or_default()
}
