// SPDX-License-Identifier: MPL-2.0
//! Pet identification through a remote vision-language model.
//!
//! [`IdentificationClient::identify`] always returns an
//! [`IdentificationOutcome`]; it never fails and never retries:
//!
//! 1. No credential configured: [`IdentificationOutcome::NoCredential`],
//!    without touching the network.
//! 2. Otherwise the photo is encoded as a PNG `data:` URL, paired with the
//!    locale's prompt, and sent once through the [`VisionTransport`].
//! 3. The model's text comes back untouched as
//!    [`IdentificationOutcome::Success`]; any failure, including the
//!    configured timeout expiring, becomes
//!    [`IdentificationOutcome::RemoteFailure`] with a readable diagnostic.

pub mod http;
pub mod prompt;
pub mod transport;

pub use http::HttpTransport;
pub use transport::{CompletionRequest, RemoteError, VisionTransport};

use crate::config::Config;
use crate::i18n::Locale;
use crate::media::codec;
use image_rs::DynamicImage;
use std::time::Duration;

/// Result of one identification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentificationOutcome {
    /// The model's answer, exactly as received.
    Success { text: String },
    /// No credential is configured; the application runs in demo mode.
    NoCredential,
    /// The remote call failed; `message` describes why.
    RemoteFailure { message: String },
}

impl IdentificationOutcome {
    /// Returns the i18n message key a user-facing layer shows for this outcome.
    pub fn message_key(&self) -> &'static str {
        match self {
            IdentificationOutcome::Success { .. } => "pet_result",
            IdentificationOutcome::NoCredential => "no_key_demo",
            IdentificationOutcome::RemoteFailure { .. } => "identify_unavailable",
        }
    }

    fn from_remote(result: Result<String, RemoteError>) -> Self {
        match result {
            Ok(text) => IdentificationOutcome::Success { text },
            Err(err) => IdentificationOutcome::RemoteFailure {
                message: err.to_string(),
            },
        }
    }
}

/// Identifies animals in photos. Holds no per-request state, so one client
/// can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct IdentificationClient<T> {
    credential: Option<String>,
    model: String,
    timeout: Duration,
    transport: T,
}

impl IdentificationClient<HttpTransport> {
    /// Builds a client that talks HTTP to the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Transport`] if the HTTP client cannot be built.
    pub fn http(config: &Config) -> Result<Self, RemoteError> {
        Ok(Self::new(config, HttpTransport::new(&config.remote)?))
    }
}

/// Identifies `image` over HTTP with the settings in `config`.
///
/// Demo mode is decided before any HTTP client is built, so a missing
/// credential is always [`IdentificationOutcome::NoCredential`]. A client
/// that cannot be initialized is a [`IdentificationOutcome::RemoteFailure`].
pub async fn identify_over_http(
    config: &Config,
    image: &DynamicImage,
    locale: Locale,
) -> IdentificationOutcome {
    if config.remote.credential().is_none() {
        return IdentificationOutcome::NoCredential;
    }
    match IdentificationClient::http(config) {
        Ok(client) => client.identify(image, locale).await,
        Err(err) => IdentificationOutcome::from_remote(Err(err)),
    }
}

impl<T: VisionTransport> IdentificationClient<T> {
    pub fn new(config: &Config, transport: T) -> Self {
        Self {
            credential: config.remote.credential().map(str::to_string),
            model: config.remote.model.clone(),
            timeout: config.remote.timeout(),
            transport,
        }
    }

    /// Whether identification will run in demo mode.
    pub fn is_demo_mode(&self) -> bool {
        self.credential.is_none()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Identifies the animal in `image`, answering in `locale`.
    pub async fn identify(&self, image: &DynamicImage, locale: Locale) -> IdentificationOutcome {
        let Some(credential) = self.credential.as_deref() else {
            return IdentificationOutcome::NoCredential;
        };

        let encoded = match codec::encode(image) {
            Ok(encoded) => encoded,
            Err(err) => {
                return IdentificationOutcome::from_remote(Err(RemoteError::Encoding(
                    err.to_string(),
                )))
            }
        };

        let request = CompletionRequest {
            model: self.model.clone(),
            image_url: encoded.data_url(),
            prompt: prompt::build(locale).to_string(),
        };

        let result = tokio::time::timeout(
            self.timeout,
            self.transport.complete(credential, &request),
        )
        .await
        .unwrap_or(Err(RemoteError::Timeout(self.timeout)));

        IdentificationOutcome::from_remote(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemoteConfig;
    use image_rs::{Rgba, RgbaImage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a canned result and records every request.
    struct StubTransport {
        result: Result<String, RemoteError>,
        delay: Option<Duration>,
        calls: AtomicUsize,
        last: Mutex<Option<(String, CompletionRequest)>>,
    }

    impl StubTransport {
        fn replying(result: Result<String, RemoteError>) -> Self {
            Self {
                result,
                delay: None,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl VisionTransport for StubTransport {
        async fn complete(
            &self,
            credential: &str,
            request: &CompletionRequest,
        ) -> Result<String, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((credential.to_string(), request.clone()));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.result.clone()
        }
    }

    fn config_with_key(key: Option<&str>) -> Config {
        Config {
            remote: RemoteConfig {
                api_key: key.map(str::to_string),
                timeout_secs: 1,
                ..RemoteConfig::default()
            },
            ..Config::default()
        }
    }

    fn photo() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 2, Rgba([90, 60, 30, 255])))
    }

    #[tokio::test]
    async fn no_credential_short_circuits_for_every_locale() {
        let stub = StubTransport::replying(Ok("unused".into()));
        for key in [None, Some(""), Some("   ")] {
            let client = IdentificationClient::new(&config_with_key(key), &stub);
            assert!(client.is_demo_mode());
            for locale in Locale::ALL {
                assert_eq!(
                    client.identify(&photo(), locale).await,
                    IdentificationOutcome::NoCredential
                );
            }
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn success_passes_text_through_unmodified() {
        let text = "  1) Tabby cat\n\n2) Striped coat  \n";
        let stub = StubTransport::replying(Ok(text.to_string()));
        let client = IdentificationClient::new(&config_with_key(Some("sk-test")), &stub);

        let outcome = client.identify(&photo(), Locale::En).await;

        assert_eq!(
            outcome,
            IdentificationOutcome::Success {
                text: text.to_string()
            }
        );
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn request_carries_model_image_and_locale_prompt() {
        let stub = StubTransport::replying(Ok("ok".into()));
        let client = IdentificationClient::new(&config_with_key(Some(" sk-test ")), &stub);

        client.identify(&photo(), Locale::Zh).await;

        let (credential, request) = stub.last.lock().unwrap().clone().expect("request recorded");
        assert_eq!(credential, "sk-test");
        assert_eq!(request.model, crate::config::DEFAULT_MODEL);
        assert_eq!(request.prompt, prompt::build(Locale::Zh));
        let sent = codec::decode_data_url(&request.image_url).expect("valid data url");
        assert_eq!((sent.width(), sent.height()), (3, 2));
    }

    #[tokio::test]
    async fn transport_error_becomes_remote_failure() {
        let stub = StubTransport::replying(Err(RemoteError::Status {
            status: 401,
            body: "invalid api key".into(),
        }));
        let client = IdentificationClient::new(&config_with_key(Some("sk-bad")), &stub);

        match client.identify(&photo(), Locale::Ko).await {
            IdentificationOutcome::RemoteFailure { message } => {
                assert!(message.contains("401"));
            }
            other => panic!("expected RemoteFailure, got {other:?}"),
        }
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_transport_times_out_into_remote_failure() {
        let mut stub = StubTransport::replying(Ok("too late".into()));
        stub.delay = Some(Duration::from_secs(30));
        let client = IdentificationClient::new(&config_with_key(Some("sk-test")), &stub);

        match client.identify(&photo(), Locale::En).await {
            IdentificationOutcome::RemoteFailure { message } => {
                assert!(message.contains("No response within"));
            }
            other => panic!("expected RemoteFailure, got {other:?}"),
        }
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn over_http_without_credential_is_demo_mode() {
        for key in [None, Some(" ")] {
            let mut config = config_with_key(key);
            config.remote.base_url = "not a url".to_string();
            assert_eq!(
                identify_over_http(&config, &photo(), Locale::Ko).await,
                IdentificationOutcome::NoCredential
            );
        }
    }

    #[test]
    fn message_keys_cover_every_outcome() {
        assert_eq!(
            IdentificationOutcome::Success { text: "x".into() }.message_key(),
            "pet_result"
        );
        assert_eq!(IdentificationOutcome::NoCredential.message_key(), "no_key_demo");
        assert_eq!(
            IdentificationOutcome::RemoteFailure {
                message: "x".into()
            }
            .message_key(),
            "identify_unavailable"
        );
    }
}
