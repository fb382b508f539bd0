// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the application.
//!
//! Messages live in Fluent (`.ftl`) files embedded into the binary, one file
//! per supported [`Locale`]. They are parsed once into a process-wide
//! [`Catalog`] and only read afterwards.
//!
//! # Fallback
//!
//! [`Catalog::resolve`] never fails. A key missing from the requested locale
//! falls back to English, and a key missing everywhere resolves to itself.

pub mod locale;

pub use locale::{resolve_locale, Locale};

use crate::error::{Error, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::FluentResource;
use fluent_syntax::ast;
use rust_embed::RustEmbed;
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

/// Locale every other locale falls back to.
pub const DEFAULT_LOCALE: Locale = Locale::En;

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// Returns the process-wide catalog built from the embedded `.ftl` files.
pub fn catalog() -> &'static Catalog {
    CATALOG.get_or_init(Catalog::embedded)
}

/// Shorthand for `catalog().resolve(key, locale)`.
pub fn tr(key: &str, locale: Locale) -> String {
    catalog().resolve(key, locale)
}

pub struct Catalog {
    bundles: HashMap<Locale, FluentBundle<FluentResource>>,
    /// Resolvable message ids of [`DEFAULT_LOCALE`], sorted.
    keys: Vec<String>,
}

impl Catalog {
    /// Builds a catalog from `(locale, ftl source)` pairs.
    ///
    /// Fails on the first resource with a syntax error or a duplicated
    /// message id.
    pub fn from_sources<I, S>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Locale, S)>,
        S: Into<String>,
    {
        let mut bundles = HashMap::new();
        let mut keys = Vec::new();
        for (locale, source) in sources {
            let resource = FluentResource::try_new(source.into()).map_err(|(_, errors)| {
                Error::Catalog(format!("{locale}: {} syntax error(s): {errors:?}", errors.len()))
            })?;
            if locale == DEFAULT_LOCALE {
                keys = message_keys(&resource);
            }
            let mut bundle = new_bundle(locale);
            bundle
                .add_resource(resource)
                .map_err(|errors| Error::Catalog(format!("{locale}: {errors:?}")))?;
            bundles.insert(locale, bundle);
        }
        Ok(Self::indexed(bundles, keys))
    }

    /// Loads every embedded `<code>.ftl` whose stem is a supported locale.
    ///
    /// Broken entries are skipped rather than rejected, so the fallback
    /// chain still answers for them.
    fn embedded() -> Self {
        let mut bundles = HashMap::new();
        let mut keys = Vec::new();

        for file in Asset::iter() {
            let filename = file.as_ref();
            let Some(locale) = filename
                .strip_suffix(".ftl")
                .and_then(|stem| stem.parse::<Locale>().ok())
            else {
                continue;
            };
            let Some(content) = Asset::get(filename) else {
                continue;
            };
            let source = String::from_utf8_lossy(content.data.as_ref()).to_string();
            let resource = match FluentResource::try_new(source) {
                Ok(resource) => resource,
                Err((partial, _errors)) => partial,
            };
            if locale == DEFAULT_LOCALE {
                keys = message_keys(&resource);
            }
            let mut bundle = new_bundle(locale);
            bundle.add_resource_overriding(resource);
            bundles.insert(locale, bundle);
        }

        Self::indexed(bundles, keys)
    }

    /// Keeps only the keys the default locale actually resolves.
    fn indexed(bundles: HashMap<Locale, FluentBundle<FluentResource>>, keys: Vec<String>) -> Self {
        let mut catalog = Self {
            bundles,
            keys: Vec::new(),
        };
        catalog.keys = keys
            .into_iter()
            .filter(|key| catalog.lookup(key, DEFAULT_LOCALE).is_some())
            .collect();
        catalog
    }

    /// Resolves `key` for `locale`: exact locale, then [`DEFAULT_LOCALE`],
    /// then the key itself.
    pub fn resolve(&self, key: &str, locale: Locale) -> String {
        self.lookup(key, locale)
            .or_else(|| self.lookup(key, DEFAULT_LOCALE))
            .unwrap_or_else(|| key.to_string())
    }

    /// Every message the default locale resolves to a non-empty value, sorted.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn locales(&self) -> Vec<Locale> {
        Locale::ALL
            .into_iter()
            .filter(|locale| self.bundles.contains_key(locale))
            .collect()
    }

    fn lookup(&self, key: &str, locale: Locale) -> Option<String> {
        let bundle = self.bundles.get(&locale)?;
        let pattern = bundle.get_message(key)?.value()?;
        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, None, &mut errors);
        if errors.is_empty() && !value.is_empty() {
            Some(value.into_owned())
        } else {
            None
        }
    }
}

/// Ids of the messages in `resource` that have a value. Terms, comments and
/// attribute-only messages are skipped.
fn message_keys(resource: &FluentResource) -> Vec<String> {
    let mut ids: Vec<String> = resource
        .entries()
        .filter_map(|entry| match entry {
            ast::Entry::Message(message) if message.value.is_some() => {
                Some(message.id.name.to_string())
            }
            _ => None,
        })
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

fn new_bundle(locale: Locale) -> FluentBundle<FluentResource> {
    let mut bundle = FluentBundle::new_concurrent(vec![locale.language_identifier()]);
    bundle.set_use_isolating(false);
    bundle
}
