//! Typed errors for every stage of the weather pipeline.
//!
//! Each variant carries a `user_message()` suitable for direct display;
//! nothing here is ever allowed to surface as a panic.

use thiserror::Error;

/// Errors from acquiring a location fix.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location services are disabled")]
    Disabled,

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Timed out after {0} seconds waiting for a location fix")]
    Timeout(u64),
}

impl LocationError {
    /// User-friendly message for UI display.
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::Disabled => {
                "Your location provider is turned off. Please turn it on."
            }
            LocationError::PermissionDenied => {
                "Location permission was denied. Enable it in the application settings."
            }
            LocationError::Timeout(_) => "Could not determine your location. Please try again.",
        }
    }

    /// True when the user must act outside the app before a retry can help.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LocationError::PermissionDenied)
    }
}

/// Errors from fetching and decoding a weather payload.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No internet connection available")]
    NoConnectivity,

    #[error("Weather request rejected (400)")]
    BadRequest,

    #[error("Weather resource not found (404)")]
    NotFound,

    #[error("Weather server returned status {0}")]
    Server(u16),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Malformed weather payload: {0}")]
    Parse(String),
}

impl FetchError {
    /// User-friendly message for UI display.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::NoConnectivity => "No internet connection available.",
            FetchError::BadRequest | FetchError::NotFound => {
                "The weather service rejected the request. Please try again later."
            }
            FetchError::Server(_) => {
                "The weather service is experiencing issues. Please try again later."
            }
            FetchError::Transport(_) => "Network error. Check your connection and try again.",
            FetchError::Parse(_) => "Received an unexpected response. Please try again.",
        }
    }
}

/// Errors from the local cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl CacheError {
    /// User-friendly message for UI display.
    pub fn user_message(&self) -> &'static str {
        "Weather data may be outdated."
    }
}

/// Top-level pipeline error surfaced to the presentation layer.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("A refresh is already in progress")]
    RefreshInProgress,
}

impl PipelineError {
    /// User-friendly message for UI display.
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::Location(e) => e.user_message(),
            PipelineError::Fetch(e) => e.user_message(),
            PipelineError::RefreshInProgress => "Already refreshing.",
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors: Vec<&str> = vec![
            LocationError::Disabled.user_message(),
            LocationError::PermissionDenied.user_message(),
            LocationError::Timeout(30).user_message(),
            FetchError::NoConnectivity.user_message(),
            FetchError::BadRequest.user_message(),
            FetchError::NotFound.user_message(),
            FetchError::Server(503).user_message(),
            FetchError::Transport("reset".into()).user_message(),
            FetchError::Parse("eof".into()).user_message(),
            CacheError::Serialization("oops".into()).user_message(),
            PipelineError::RefreshInProgress.user_message(),
        ];
        for message in errors {
            assert!(!message.is_empty());
        }
    }

    #[test]
    fn test_permission_denial_is_terminal() {
        assert!(LocationError::PermissionDenied.is_terminal());
        assert!(!LocationError::Disabled.is_terminal());
        assert!(!LocationError::Timeout(10).is_terminal());
    }

    #[test]
    fn test_pipeline_error_conversion() {
        let err: PipelineError = LocationError::Disabled.into();
        assert!(matches!(err, PipelineError::Location(LocationError::Disabled)));

        let err: PipelineError = FetchError::NotFound.into();
        assert!(matches!(err, PipelineError::Fetch(FetchError::NotFound)));
    }

    #[test]
    fn test_pipeline_user_message_delegates() {
        let err = PipelineError::Location(LocationError::Disabled);
        assert_eq!(err.user_message(), LocationError::Disabled.user_message());
    }
}
