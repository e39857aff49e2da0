//! Provider selection and result assembly.

use crate::config::AppConfig;
use crate::error::{ArtGenError, Result};
use crate::provider::ImageProvider;
use crate::providers::{MockProvider, StabilityProvider};
use crate::types::{GenerationRequest, GenerationResult, ProviderKind};
use image::RgbImage;
use std::time::Duration;

// Image fetches are small downloads, not generation; keep the bound tight.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// What one generation attempt produced: a decoded image when everything
/// worked, and always a single-line status describing provenance or failure.
#[derive(Debug)]
pub struct GenerationOutcome {
    /// The decoded image, absent on any failure.
    pub image: Option<RgbImage>,
    /// Human-readable provenance or error line.
    pub status: String,
}

/// Orchestrates one provider selected at startup.
///
/// Holds exactly one provider instance, read-only after construction, plus
/// an HTTP client for fetching URL-based results. Calls are serial; no
/// mutual exclusion is provided, and behavior under concurrent
/// `generate_image` calls on one instance is unspecified.
pub struct Generator {
    provider: Box<dyn ImageProvider>,
    fetch_client: reqwest::Client,
}

impl Generator {
    /// Creates a generator around an explicit provider.
    pub fn new(provider: Box<dyn ImageProvider>) -> Self {
        Self {
            provider,
            fetch_client: reqwest::Client::new(),
        }
    }

    /// Selects a provider from configuration, once.
    ///
    /// Unknown provider names and a Stability provider that fails to build
    /// (typically a missing credential) fall back to the mock provider; the
    /// fallback is logged rather than silent. Construct [`StabilityProvider`]
    /// directly when a missing credential should be fatal.
    pub fn from_config(config: &AppConfig) -> Self {
        let provider: Box<dyn ImageProvider> = match ProviderKind::from_name(&config.provider) {
            Some(ProviderKind::Mock) => Box::new(MockProvider::new()),
            Some(ProviderKind::Stability) => {
                let mut builder = StabilityProvider::builder();
                if let Some(key) = &config.api_key {
                    builder = builder.api_key(key);
                }
                match builder.build() {
                    Ok(provider) => Box::new(provider),
                    Err(e) => {
                        tracing::warn!("stability provider unavailable, falling back to mock: {e}");
                        Box::new(MockProvider::new())
                    }
                }
            }
            None => {
                tracing::warn!(provider = %config.provider, "unknown provider, falling back to mock");
                Box::new(MockProvider::new())
            }
        };
        Self::new(provider)
    }

    /// Returns the kind of the selected provider.
    pub fn provider_kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    /// Generates one image and assembles it for display.
    ///
    /// This is the sole entry point the presentation layer calls. Every
    /// failure mode is folded into the status line; nothing here aborts
    /// the process.
    pub async fn generate_image(&self, request: &GenerationRequest) -> GenerationOutcome {
        let result = match self.provider.generate(request).await {
            Ok(result) => result,
            Err(e) => {
                return GenerationOutcome {
                    image: None,
                    status: format!("Provider error: {e}"),
                }
            }
        };

        match self.assemble(&result).await {
            Ok((image, source)) => GenerationOutcome {
                image: Some(image),
                status: format!(
                    "provider: {} | model: {} | source: {}",
                    result.meta_or_unknown("provider"),
                    result.meta_or_unknown("model"),
                    source
                ),
            },
            Err(e) => GenerationOutcome {
                image: None,
                status: format!("Image assembly error: {e}"),
            },
        }
    }

    /// Turns a provider result into a decoded RGB image and a source tag.
    /// Bytes win over a URL when both are present.
    async fn assemble(&self, result: &GenerationResult) -> Result<(RgbImage, String)> {
        if let Some(bytes) = result.image_bytes.as_deref() {
            let image = image::load_from_memory(bytes)?.to_rgb8();
            return Ok((image, format!("{} (bytes)", self.provider.kind())));
        }

        if let Some(url) = result.url.as_deref() {
            tracing::debug!(url, "fetching url-based result");
            let response = self
                .fetch_client
                .get(url)
                .timeout(FETCH_TIMEOUT)
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ArtGenError::Api {
                    status: status.as_u16(),
                    message: format!("failed to fetch image from {url}"),
                });
            }
            let bytes = response.bytes().await?;
            let image = image::load_from_memory(&bytes)?.to_rgb8();
            return Ok((image, "url fetch".to_string()));
        }

        Err(ArtGenError::UnexpectedResponse(
            "result carried neither image bytes nor a url".into(),
        ))
    }
}
