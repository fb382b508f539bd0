// SPDX-License-Identifier: MPL-2.0
//! Re-encoding of decoded images into a self-describing `data:` URL.
//!
//! # Policy
//!
//! Every image is normalized to 8-bit RGBA and written as PNG. PNG is
//! lossless, so the transmitted image has exactly the source's width and
//! height; forcing the alpha channel makes the output independent of the
//! source's color type.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image_rs::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

/// Media type of every [`EncodedImage`].
pub const PNG_MEDIA_TYPE: &str = "image/png";

/// An image serialized for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    media_type: &'static str,
    payload: Vec<u8>,
    width: u32,
    height: u32,
}

impl EncodedImage {
    pub fn media_type(&self) -> &'static str {
        self.media_type
    }

    /// The encoded file bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Renders `data:<media type>;base64,<payload>`, usable directly as an
    /// image reference in a remote API request.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, STANDARD.encode(&self.payload))
    }
}

/// Encodes `image` as RGBA PNG.
///
/// # Errors
///
/// Returns [`Error::InvalidImage`] if the PNG encoder rejects the image
/// (for example a zero-sized buffer).
pub fn encode(image: &DynamicImage) -> Result<EncodedImage> {
    let (width, height) = image.dimensions();
    let rgba = DynamicImage::ImageRgba8(image.to_rgba8());

    let mut payload = Vec::new();
    rgba.write_to(&mut Cursor::new(&mut payload), ImageFormat::Png)
        .map_err(|e| Error::InvalidImage(e.to_string()))?;

    Ok(EncodedImage {
        media_type: PNG_MEDIA_TYPE,
        payload,
        width,
        height,
    })
}

/// Decodes a base64 `data:` URL back into an image.
///
/// # Errors
///
/// Returns [`Error::InvalidImage`] when the URL is not a base64 data URL or
/// its payload is not a decodable image.
pub fn decode_data_url(url: &str) -> Result<DynamicImage> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| Error::InvalidImage("missing data: scheme".into()))?;
    let (header, encoded) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidImage("missing payload separator".into()))?;
    let media_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| Error::InvalidImage("payload is not base64 encoded".into()))?;
    if !media_type.starts_with("image/") {
        return Err(Error::InvalidImage(format!(
            "unexpected media type: {media_type}"
        )));
    }

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| Error::InvalidImage(e.to_string()))?;
    image_rs::load_from_memory(&bytes).map_err(|e| Error::InvalidImage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{ColorType, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn encode_preserves_dimensions_through_data_url() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(7, 3, Rgba([10, 20, 30, 255])));

        let encoded = encode(&image).expect("encode should succeed");
        let decoded = decode_data_url(&encoded.data_url()).expect("decode should succeed");

        assert_eq!(encoded.dimensions(), (7, 3));
        assert_eq!(decoded.dimensions(), (7, 3));
    }

    #[test]
    fn encode_forces_alpha_channel() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 5, Rgb([200, 100, 50])));

        let encoded = encode(&image).expect("encode should succeed");
        let decoded = decode_data_url(&encoded.data_url()).expect("decode should succeed");

        assert_eq!(decoded.color(), ColorType::Rgba8);
        assert_eq!(decoded.to_rgba8().get_pixel(0, 0), &Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn encode_is_lossless_for_grayscale() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_fn(16, 9, |x, y| {
            Luma([((x * 13 + y * 7) % 256) as u8])
        }));

        let encoded = encode(&image).expect("encode should succeed");
        let decoded = decode_data_url(&encoded.data_url()).expect("decode should succeed");

        assert_eq!(decoded.to_rgba8(), image.to_rgba8());
    }

    #[test]
    fn data_url_has_png_header() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(1, 1));
        let encoded = encode(&image).expect("encode should succeed");

        assert_eq!(encoded.media_type(), PNG_MEDIA_TYPE);
        assert!(encoded.data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert!(encoded.payload().starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn decode_rejects_malformed_urls() {
        for url in [
            "image/png;base64,AAAA",
            "data:image/png;base64",
            "data:image/png,AAAA",
            "data:text/plain;base64,aGVsbG8=",
            "data:image/png;base64,!!!not-base64!!!",
            "data:image/png;base64,aGVsbG8=",
        ] {
            assert!(
                matches!(decode_data_url(url), Err(Error::InvalidImage(_))),
                "{url} should be rejected"
            );
        }
    }
}
