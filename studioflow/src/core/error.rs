use thiserror::Error;

/// Core error type for the studioflow workflow tracker.
///
/// This error type uses `thiserror` with proper `#[source]` annotations
/// to preserve error chains for debugging and error handling.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// Serialization failed when encoding a value to JSON.
    #[error("serialization failed")]
    Serialization(#[source] serde_json::Error),

    /// Deserialization failed when decoding JSON into a value.
    #[error("deserialization failed")]
    Deserialization(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
