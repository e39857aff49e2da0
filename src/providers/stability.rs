//! Stability AI text-to-image provider.

use crate::error::{ArtGenError, Result};
use crate::provider::ImageProvider;
use crate::types::{GenerationRequest, GenerationResult, ProviderKind};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.stability.ai";

/// Model identifier reported in result metadata.
pub const MODEL_ID: &str = "sdxl-1.0";

const ENGINE_PATH: &str = "/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image";

// Generation is slow; the request must fail rather than hang.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Builder for [`StabilityProvider`].
#[derive(Debug, Clone)]
pub struct StabilityProviderBuilder {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl Default for StabilityProviderBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl StabilityProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to the `STABILITY_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the API base URL (mainly for tests).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the provider, resolving the API key.
    ///
    /// Fails with [`ArtGenError::Auth`] when no non-empty key is available;
    /// this provider cannot be used unconfigured.
    pub fn build(self) -> Result<StabilityProvider> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("STABILITY_API_KEY").ok().filter(|k| !k.is_empty()))
            .ok_or_else(|| {
                ArtGenError::Auth("STABILITY_API_KEY not set and no API key provided".into())
            })?;

        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        Ok(StabilityProvider {
            client,
            api_key,
            base_url: self.base_url,
        })
    }
}

/// Stability AI text-to-image provider.
///
/// Translates a generation request into a single synchronous call to the
/// SDXL text-to-image endpoint and decodes the first returned artifact.
pub struct StabilityProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl StabilityProvider {
    /// Creates a new `StabilityProviderBuilder`.
    pub fn builder() -> StabilityProviderBuilder {
        StabilityProviderBuilder::new()
    }
}

#[async_trait]
impl ImageProvider for StabilityProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let url = format!("{}{}", self.base_url, ENGINE_PATH);
        let body = StabilityRequest::from_generation_request(request);

        tracing::debug!(size = %request.size, seed = ?request.seed, "submitting generation request");

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ArtGenError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let api_response: StabilityResponse = response.json().await?;

        let artifact = api_response.artifacts.into_iter().next().ok_or_else(|| {
            ArtGenError::UnexpectedResponse("no artifacts in Stability response".into())
        })?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&artifact.base64)
            .map_err(|e| ArtGenError::Decode(e.to_string()))?;

        tracing::debug!(bytes = bytes.len(), "decoded artifact");

        let mut meta = HashMap::new();
        meta.insert("provider".to_string(), "stability".to_string());
        meta.insert("model".to_string(), MODEL_ID.to_string());

        Ok(GenerationResult::from_bytes(bytes, meta))
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Stability
    }
}

#[derive(Debug, Serialize)]
struct TextPrompt {
    text: String,
    weight: i32,
}

#[derive(Debug, Serialize)]
struct StabilityRequest {
    text_prompts: Vec<TextPrompt>,
    cfg_scale: u32,
    height: u32,
    width: u32,
    samples: u32,
    steps: u32,
    /// Omitted entirely when no seed was requested; the API treats a
    /// missing field differently from zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,
}

impl StabilityRequest {
    fn from_generation_request(req: &GenerationRequest) -> Self {
        let mut text_prompts = vec![TextPrompt {
            text: req.prompt.clone(),
            weight: 1,
        }];
        if let Some(negative) = req.negative_prompt.as_deref().filter(|n| !n.is_empty()) {
            text_prompts.push(TextPrompt {
                text: negative.to_string(),
                weight: -1,
            });
        }

        Self {
            text_prompts,
            cfg_scale: 7,
            height: req.size.height,
            width: req.size.width,
            samples: 1,
            steps: 30,
            seed: req.seed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StabilityResponse {
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    base64: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageSize;
    use httpmock::{Method::POST, MockServer};

    fn provider_for(server: &MockServer) -> StabilityProvider {
        StabilityProvider::builder()
            .api_key("sk-test")
            .base_url(server.base_url())
            .build()
            .unwrap()
    }

    fn png_base64() -> (Vec<u8>, String) {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30]));
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        let bytes = buf.into_inner();
        let b64 = base64::engine::general_purpose::STANDARD.encode(&bytes);
        (bytes, b64)
    }

    #[test]
    fn test_builder_with_explicit_key() {
        let provider = StabilityProviderBuilder::new().api_key("sk-test").build();
        assert!(provider.is_ok());
    }

    #[test]
    fn test_builder_rejects_empty_key() {
        // An empty explicit key must not masquerade as configured.
        std::env::remove_var("STABILITY_API_KEY");
        let provider = StabilityProviderBuilder::new().api_key("").build();
        assert!(matches!(provider, Err(ArtGenError::Auth(_))));
    }

    #[test]
    fn test_request_maps_size() {
        let req = GenerationRequest::new("a castle").with_size(ImageSize::new(768, 768).unwrap());
        let body = StabilityRequest::from_generation_request(&req);

        assert_eq!(body.width, 768);
        assert_eq!(body.height, 768);
    }

    #[test]
    fn test_request_fixed_parameters() {
        let body = StabilityRequest::from_generation_request(&GenerationRequest::new("a castle"));

        assert_eq!(body.cfg_scale, 7);
        assert_eq!(body.samples, 1);
        assert_eq!(body.steps, 30);
    }

    #[test]
    fn test_request_serialization_omits_missing_seed() {
        let req = GenerationRequest::new("a castle");
        let body = StabilityRequest::from_generation_request(&req);
        let json = serde_json::to_value(&body).unwrap();

        assert!(json.get("seed").is_none());
    }

    #[test]
    fn test_request_serialization_with_seed() {
        let req = GenerationRequest::new("a castle").with_seed(42);
        let body = StabilityRequest::from_generation_request(&req);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json.get("seed").and_then(|s| s.as_i64()), Some(42));
    }

    #[test]
    fn test_request_single_prompt_without_negative() {
        let req = GenerationRequest::new("a castle");
        let body = StabilityRequest::from_generation_request(&req);
        assert_eq!(body.text_prompts.len(), 1);
        assert_eq!(body.text_prompts[0].weight, 1);

        // Empty negative prompt counts as absent.
        let req = GenerationRequest::new("a castle").with_negative_prompt("");
        let body = StabilityRequest::from_generation_request(&req);
        assert_eq!(body.text_prompts.len(), 1);
    }

    #[test]
    fn test_request_negative_prompt_weighted_negative() {
        let req = GenerationRequest::new("a castle").with_negative_prompt("low quality, blurry");
        let body = StabilityRequest::from_generation_request(&req);

        assert_eq!(body.text_prompts.len(), 2);
        assert_eq!(body.text_prompts[1].text, "low quality, blurry");
        assert_eq!(body.text_prompts[1].weight, -1);
    }

    #[tokio::test]
    async fn test_generate_decodes_first_artifact() {
        let (bytes, b64) = png_base64();

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(ENGINE_PATH)
                    .header("Authorization", "Bearer sk-test")
                    .header("Accept", "application/json")
                    .body_includes("\"cfg_scale\":7")
                    .body_includes("\"steps\":30");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(
                        serde_json::json!({ "artifacts": [{ "base64": b64, "seed": 42 }] })
                            .to_string(),
                    );
            })
            .await;

        let provider = provider_for(&server);
        let result = provider
            .generate(&GenerationRequest::new("a castle"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.image_bytes.as_deref(), Some(bytes.as_slice()));
        assert!(result.url.is_none());
        assert_eq!(result.meta_or_unknown("provider"), "stability");
        assert_eq!(result.meta_or_unknown("model"), MODEL_ID);
        assert!(image::load_from_memory(result.image_bytes.as_ref().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_generate_error_carries_status_and_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(ENGINE_PATH);
                then.status(401).body("invalid api key");
            })
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(&GenerationRequest::new("a castle"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("invalid api key"));
        match err {
            ArtGenError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid api key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_empty_artifacts_is_unexpected_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(ENGINE_PATH);
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"artifacts": []}"#);
            })
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(&GenerationRequest::new("a castle"))
            .await
            .unwrap_err();

        assert!(matches!(err, ArtGenError::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn test_generate_bad_base64_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(ENGINE_PATH);
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"artifacts": [{"base64": "!!not-base64!!"}]}"#);
            })
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(&GenerationRequest::new("a castle"))
            .await
            .unwrap_err();

        assert!(matches!(err, ArtGenError::Decode(_)));
    }
}
