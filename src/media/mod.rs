// SPDX-License-Identifier: MPL-2.0
//! Image handling for identification: upload validation and re-encoding
//! for transmission.

pub mod codec;
pub mod upload;

// Re-export commonly used types
pub use codec::{decode_data_url, encode, EncodedImage, PNG_MEDIA_TYPE};
pub use upload::{decode_upload, load_upload, ACCEPTED_EXTENSIONS};
