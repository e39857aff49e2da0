#![warn(missing_docs)]
//! artgen - text-to-image generation over pluggable providers.
//!
//! A caller submits a prompt (plus optional size, negative prompt and seed),
//! the provider selected at startup is invoked, and the returned image
//! (bytes or URL) is decoded and paired with a status line describing where
//! it came from. Two providers ship: a deterministic mock returning a fixed
//! placeholder reference, and a Stability AI SDXL client.
//!
//! # Quick Start
//!
//! ```no_run
//! use artgen::{AppConfig, GenerationRequest, Generator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let generator = Generator::from_config(&AppConfig::from_env());
//!     let request = GenerationRequest::new("A serene watercolor landscape at sunset")
//!         .with_size("768x768".parse().unwrap());
//!     let outcome = generator.generate_image(&request).await;
//!     println!("{}", outcome.status);
//! }
//! ```
//!
//! # Configuration
//!
//! - `PROVIDER`: `mock` (default) or `stability`
//! - `STABILITY_API_KEY`: bearer credential for the Stability provider
//!
//! Selection happens once; unknown or unconfigured providers fall back to
//! mock with a warning. Building a [`StabilityProvider`] directly without a
//! credential is an error instead.

mod config;
mod error;
mod generator;
mod provider;
pub mod providers;
mod types;

pub use config::AppConfig;
pub use error::{ArtGenError, Result};
pub use generator::{GenerationOutcome, Generator};
pub use provider::ImageProvider;
pub use providers::{MockProvider, StabilityProvider, StabilityProviderBuilder};
pub use types::{GenerationRequest, GenerationResult, ImageSize, ProviderKind};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::error::{ArtGenError, Result};
    pub use crate::generator::{GenerationOutcome, Generator};
    pub use crate::provider::ImageProvider;
    pub use crate::providers::{MockProvider, StabilityProvider};
    pub use crate::types::{GenerationRequest, GenerationResult, ImageSize, ProviderKind};
}
