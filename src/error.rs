//! Error types for image generation.

/// Errors that can occur while generating or assembling an image.
#[derive(Debug, thiserror::Error)]
pub enum ArtGenError {
    /// API key missing or invalid.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// Raw response body, kept verbatim for diagnosis.
        message: String,
    },

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// Image bytes could not be decoded into a picture.
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    /// Response was well-formed HTTP but not the shape we expected.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Result type alias for image generation operations.
pub type Result<T> = std::result::Result<T, ArtGenError>;
