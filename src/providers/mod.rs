//! Image generation providers.

mod mock;
mod stability;

pub use mock::{MockProvider, PLACEHOLDER_URL};
pub use stability::{StabilityProvider, StabilityProviderBuilder, DEFAULT_BASE_URL, MODEL_ID};
