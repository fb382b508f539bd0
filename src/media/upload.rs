// SPDX-License-Identifier: MPL-2.0
//! Validation of uploaded photos before they enter identification.
//!
//! Uploads are accepted in the formats a phone or browser usually produces
//! (PNG, JPEG and WebP). Anything else, or anything that does not decode, is
//! rejected here with a validation error.

use crate::error::{Error, Result};
use image_rs::{DynamicImage, ImageFormat};
use std::fs;
use std::path::Path;

/// Formats accepted for upload.
pub const ACCEPTED_FORMATS: [ImageFormat; 3] =
    [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP];

/// File extensions matching [`ACCEPTED_FORMATS`], for file pickers.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Decodes uploaded bytes into an image.
///
/// # Errors
///
/// - [`Error::InvalidImage`] if the bytes are not a recognizable image
/// - [`Error::UnsupportedFormat`] if the image is in a format uploads do not
///   accept
pub fn decode_upload(bytes: &[u8]) -> Result<DynamicImage> {
    let format = image_rs::guess_format(bytes)
        .map_err(|e| Error::InvalidImage(format!("unrecognized image data: {e}")))?;

    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(Error::UnsupportedFormat(format!("{format:?}")));
    }

    image_rs::load_from_memory_with_format(bytes, format)
        .map_err(|e| Error::InvalidImage(e.to_string()))
}

/// Reads and decodes an uploaded file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, otherwise the same
/// errors as [`decode_upload`].
pub fn load_upload<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let bytes = fs::read(path.as_ref())?;
    decode_upload(&bytes)
}
