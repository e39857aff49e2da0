//! Deterministic placeholder provider.

use crate::error::Result;
use crate::provider::ImageProvider;
use crate::types::{GenerationRequest, GenerationResult, ProviderKind};
use async_trait::async_trait;
use std::collections::HashMap;

/// Fixed placeholder image reference returned for every request.
pub const PLACEHOLDER_URL: &str = "https://picsum.photos/seed/demo/1024/1024";

/// Provider that always succeeds with a fixed placeholder URL.
///
/// Ignores the prompt, size, negative prompt and seed entirely. Used as the
/// default backend so the system stays runnable without any credentials; the
/// placeholder URL is only fetched at assembly time.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProvider;

impl MockProvider {
    /// Creates a new mock provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageProvider for MockProvider {
    async fn generate(&self, _request: &GenerationRequest) -> Result<GenerationResult> {
        let mut meta = HashMap::new();
        meta.insert("provider".to_string(), "mock".to_string());
        meta.insert("note".to_string(), "placeholder image".to_string());
        Ok(GenerationResult::from_url(PLACEHOLDER_URL, meta))
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Mock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_always_returns_placeholder_url() {
        let provider = MockProvider::new();
        let result = provider
            .generate(&GenerationRequest::new("ignored"))
            .await
            .unwrap();

        assert_eq!(result.url.as_deref(), Some(PLACEHOLDER_URL));
        assert!(result.image_bytes.is_none());
        assert_eq!(result.meta_or_unknown("provider"), "mock");
        assert_eq!(result.meta_or_unknown("note"), "placeholder image");
    }

    #[tokio::test]
    async fn test_mock_ignores_request_contents() {
        let provider = MockProvider::new();
        let fancy = GenerationRequest::new("")
            .with_size("1x1".parse().unwrap())
            .with_negative_prompt("anything")
            .with_seed(i64::MIN);

        let result = provider.generate(&fancy).await.unwrap();
        assert_eq!(result.url.as_deref(), Some(PLACEHOLDER_URL));
    }

    #[test]
    fn test_mock_kind() {
        assert_eq!(MockProvider::new().kind(), ProviderKind::Mock);
    }
}
