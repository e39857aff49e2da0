//! Core types for image generation.

use crate::error::{ArtGenError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Image provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Deterministic placeholder provider, no external dependencies.
    Mock,
    /// Stability AI text-to-image API.
    Stability,
}

impl ProviderKind {
    /// Parses a provider name as found in configuration (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "mock" => Some(Self::Mock),
            "stability" => Some(Self::Stability),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mock => write!(f, "mock"),
            Self::Stability => write!(f, "stability"),
        }
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    /// Width in pixels, always positive.
    pub width: u32,
    /// Height in pixels, always positive.
    pub height: u32,
}

impl ImageSize {
    /// Creates a size, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ArtGenError::InvalidRequest(format!(
                "size dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
        }
    }
}

impl FromStr for ImageSize {
    type Err = ArtGenError;

    /// Parses `"WxH"`, e.g. `"768x768"`.
    fn from_str(s: &str) -> Result<Self> {
        let (w, h) = s.split_once('x').ok_or_else(|| {
            ArtGenError::InvalidRequest(format!("size must be \"WxH\", got {s:?}"))
        })?;
        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|_| ArtGenError::InvalidRequest(format!("bad width in size {s:?}")))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|_| ArtGenError::InvalidRequest(format!("bad height in size {s:?}")))?;
        Self::new(width, height)
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A request to generate an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// Desired output dimensions.
    pub size: ImageSize,
    /// What the image should avoid; forwarded with negative weight.
    pub negative_prompt: Option<String>,
    /// Seed for deterministic generation. `None` means the field is
    /// omitted from the outbound payload, which is not the same as zero.
    pub seed: Option<i64>,
}

impl GenerationRequest {
    /// Creates a new request with the given prompt and default 1024x1024 size.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            size: ImageSize::default(),
            negative_prompt: None,
            seed: None,
        }
    }

    /// Sets the desired dimensions.
    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = size;
        self
    }

    /// Sets the negative prompt.
    pub fn with_negative_prompt(mut self, negative: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative.into());
        self
    }

    /// Sets the seed for deterministic generation.
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// One generation outcome, as reported by a provider.
///
/// A well-formed result carries at least one of `image_bytes` or `url`;
/// assembly prefers bytes when both are present. `provider_meta` is
/// diagnostic only and never structurally required.
#[derive(Debug, Clone, Default)]
#[must_use = "generation result should be assembled into an image"]
pub struct GenerationResult {
    /// Raw encoded image bytes.
    pub image_bytes: Option<Vec<u8>>,
    /// Fetchable reference to the image.
    pub url: Option<String>,
    /// Free-form diagnostics (provider name, model id, notes).
    pub provider_meta: HashMap<String, String>,
}

impl GenerationResult {
    /// Creates a result holding raw image bytes.
    pub fn from_bytes(bytes: Vec<u8>, provider_meta: HashMap<String, String>) -> Self {
        Self {
            image_bytes: Some(bytes),
            url: None,
            provider_meta,
        }
    }

    /// Creates a result holding a fetchable URL.
    pub fn from_url(url: impl Into<String>, provider_meta: HashMap<String, String>) -> Self {
        Self {
            image_bytes: None,
            url: Some(url.into()),
            provider_meta,
        }
    }

    /// Returns true if the result carries something assembly can display.
    pub fn is_well_formed(&self) -> bool {
        self.image_bytes.is_some() || self.url.is_some()
    }

    /// Looks up a metadata value, or `"?"` when absent.
    pub fn meta_or_unknown(&self, key: &str) -> &str {
        self.provider_meta.get(key).map(String::as_str).unwrap_or("?")
    }
}
