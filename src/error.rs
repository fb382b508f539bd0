// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Catalog(String),
    Dataset(String),
    /// The supplied bytes could not be decoded as an image at all.
    InvalidImage(String),
    /// The bytes decode, but the format is not one uploads accept.
    UnsupportedFormat(String),
    UnsupportedLocale(String),
}

impl Error {
    /// Returns the i18n message key a user-facing layer shows for this error.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            Error::InvalidImage(_) | Error::UnsupportedFormat(_) => "invalid_image",
            Error::Config(_) => "config_load_error",
            Error::Io(_)
            | Error::Catalog(_)
            | Error::Dataset(_)
            | Error::UnsupportedLocale(_) => "error_general",
        }
    }

    /// Whether the error comes from validating user input rather than from
    /// the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidImage(_) | Error::UnsupportedFormat(_) | Error::UnsupportedLocale(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Catalog(e) => write!(f, "Catalog Error: {}", e),
            Error::Dataset(e) => write!(f, "Dataset Error: {}", e),
            Error::InvalidImage(e) => write!(f, "Invalid image: {}", e),
            Error::UnsupportedFormat(e) => write!(f, "Unsupported image format: {}", e),
            Error::UnsupportedLocale(e) => write!(f, "Unsupported locale: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        match err {
            image_rs::ImageError::IoError(e) => Error::Io(e.to_string()),
            image_rs::ImageError::Unsupported(e) => Error::UnsupportedFormat(e.to_string()),
            other => Error::InvalidImage(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
