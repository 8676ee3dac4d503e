//! Suggestion providers for the designer's "enhance" and "suggest tags"
//! buttons
//!
//! The product ships no real model here. [`Suggester`] is the seam a real
//! provider would plug into; [`KeywordSuggester`] is a deterministic
//! stand-in driven by a keyword table.
//!
//! # Example
//!
//! ```
//! use studioflow::assist::{KeywordSuggester, Suggester};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let suggester = KeywordSuggester::default();
//! let tags = suggester.suggest("portrait shoot in studio").await?;
//! assert!(tags.iter().any(|s| s.label == "people"));
//! # Ok(())
//! # }
//! ```

mod keyword;

pub use keyword::KeywordSuggester;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from a suggestion provider
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssistError {
    /// Nothing to suggest from
    #[error("input is empty")]
    EmptyInput,

    /// The provider failed
    #[error("suggestion provider failed: {0}")]
    Provider(String),
}

/// Result type for suggestion providers
pub type AssistResult<T> = Result<T, AssistError>;

/// One suggested label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The suggested tag or phrase
    pub label: String,
    /// Provider confidence in `0.0..=1.0`
    pub confidence: f32,
}

impl Suggestion {
    /// Creates a suggestion, clamping confidence into range
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// A source of suggestions for free-text input
///
/// Implementations must be thread-safe. Using `async_trait` lets a real
/// provider call out over the network without blocking the caller.
#[async_trait]
pub trait Suggester: Send + Sync {
    /// Suggests labels for `input`, best first
    async fn suggest(&self, input: &str) -> AssistResult<Vec<Suggestion>>;
}
