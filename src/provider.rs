//! Image provider trait.

use crate::error::Result;
use crate::types::{GenerationRequest, GenerationResult, ProviderKind};
use async_trait::async_trait;

/// Trait for image generation providers.
///
/// A failed generation is always an `Err`; implementations never return a
/// result that carries neither bytes nor a URL.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generates an image from the given request.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult>;

    /// Returns the kind of this provider.
    fn kind(&self) -> ProviderKind;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str {
        match self.kind() {
            ProviderKind::Mock => "Mock (placeholder)",
            ProviderKind::Stability => "Stability AI (SDXL)",
        }
    }
}
