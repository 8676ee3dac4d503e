//! Core types and utilities shared by the graph and the store.
//!
//! # Configuration
//! - [`GraphConfig`]: limits enforced by the workflow graph
//!
//! # Serialization
//! - [`serialize_value`] / [`serialize_pretty`]: Rust types to JSON
//! - [`deserialize_value`]: JSON back to Rust types
//! - [`fingerprint`]: stable hash of serialized bytes for snapshot comparison
//!
//! # Error Handling
//! - [`CoreError`]: core error type with proper error chains
//! - [`Result<T>`]: type alias for Results using CoreError

mod config;
mod error;
mod serialization;

pub use config::GraphConfig;
pub use error::{CoreError, Result};
pub use serialization::{deserialize_value, fingerprint, serialize_pretty, serialize_value};
