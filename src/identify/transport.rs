// SPDX-License-Identifier: MPL-2.0
//! The seam between identification and the remote vision model.

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// One completion request: a single user turn with an image and a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    /// Self-describing `data:` URL of the photo.
    pub image_url: String,
    pub prompt: String,
}

/// Everything that can go wrong talking to the remote model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Connection, DNS or TLS failure, or an interrupted body.
    Transport(String),
    /// The service answered with a non-success status (auth, quota, ...).
    Status { status: u16, body: String },
    /// The response did not contain a completion.
    MalformedResponse(String),
    /// No answer arrived within the configured bound.
    Timeout(Duration),
    /// The photo could not be prepared for sending.
    Encoding(String),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Transport(msg) => write!(f, "Transport error: {msg}"),
            RemoteError::Status { status, body } if body.is_empty() => {
                write!(f, "Remote service returned HTTP {status}")
            }
            RemoteError::Status { status, body } => {
                write!(f, "Remote service returned HTTP {status}: {body}")
            }
            RemoteError::MalformedResponse(msg) => write!(f, "Malformed response: {msg}"),
            RemoteError::Timeout(limit) => {
                write!(f, "No response within {} seconds", limit.as_secs_f32())
            }
            RemoteError::Encoding(msg) => write!(f, "Could not encode image: {msg}"),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Sends a completion request and returns the model's text.
///
/// Implementations make exactly one attempt per call.
pub trait VisionTransport {
    fn complete(
        &self,
        credential: &str,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send;
}

impl<T: VisionTransport + Sync> VisionTransport for &T {
    fn complete(
        &self,
        credential: &str,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send {
        (**self).complete(credential, request)
    }
}
