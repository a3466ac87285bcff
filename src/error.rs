//! Error types for the try-on renderer.
//!
//! Tracking loss is deliberately absent here: it is a [`TrackingPhase`](crate::TrackingPhase)
//! with its own recovery path, not a failure.

use thiserror::Error;

use crate::state::GarmentId;

/// Errors surfaced by the compositing, quantization, and state operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected at the boundary before touching any state.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation referenced a garment that was never registered.
    #[error("unknown garment: {0}")]
    MissingGarment(GarmentId),

    /// An external resource (image decode, pose source) could not be used.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),
}

impl Error {
    /// Creates an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates a resource unavailable error.
    pub fn resource_unavailable(msg: impl Into<String>) -> Self {
        Self::ResourceUnavailable(msg.into())
    }

    /// Returns true for errors that are logged and ignored rather than shown to the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::MissingGarment(_))
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Self::ResourceUnavailable(format!("failed to decode image: {err}"))
    }
}

/// Result type for try-on renderer operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_garment_is_silent() {
        let err = Error::MissingGarment(GarmentId::from("T-Shirt 3"));
        assert!(err.is_silent());
        assert_eq!(err.to_string(), "unknown garment: T-Shirt 3");
    }

    #[test]
    fn user_facing_errors_are_not_silent() {
        assert!(!Error::invalid_input("not an image").is_silent());
        assert!(!Error::resource_unavailable("camera").is_silent());
    }
}
