// SPDX-License-Identifier: MPL-2.0
//! `animal_lens` identifies pets in photos through a remote vision-language
//! model and ships a small, localized animal encyclopedia.
//!
//! The library is the whole core; user interfaces sit on top of four calls:
//!
//! - [`identify::IdentificationClient::identify`] turns a decoded photo and a
//!   [`i18n::Locale`] into an [`identify::IdentificationOutcome`]
//! - [`encyclopedia::EncyclopediaStore::by_category`] and
//!   [`encyclopedia::EncyclopediaStore::detail`] browse the encyclopedia
//! - [`i18n::Catalog::resolve`] localizes interface messages
//!
//! Uploaded files are validated with [`media::upload`] before they reach
//! identification.

#![doc(html_root_url = "https://docs.rs/animal_lens/0.1.0")]

pub mod config;
pub mod encyclopedia;
pub mod error;
pub mod i18n;
pub mod identify;
pub mod media;

pub use error::{Error, Result};
pub use i18n::Locale;
pub use identify::{IdentificationClient, IdentificationOutcome};
