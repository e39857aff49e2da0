//! Process configuration.
//!
//! The crate consumes the provider name and credential as plain strings; it
//! does not own how they are stored. `from_env` is the one loader shipped,
//! matching the `PROVIDER` / `STABILITY_API_KEY` environment contract.

/// Configuration consumed by [`crate::Generator::from_config`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Provider name, e.g. `"mock"` or `"stability"`.
    pub provider: String,
    /// Credential for the remote provider, if any.
    pub api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            api_key: None,
        }
    }
}

impl AppConfig {
    /// Reads `PROVIDER` (default `"mock"`) and `STABILITY_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            provider: std::env::var("PROVIDER")
                .map(|p| p.to_lowercase())
                .unwrap_or_else(|_| "mock".to_string()),
            api_key: std::env::var("STABILITY_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
        }
    }
}
