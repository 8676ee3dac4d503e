//! Graph configuration
//!
//! Limits applied by [`crate::graph::WorkflowGraph`] on every write. Hosts
//! can build a [`GraphConfig`] directly or decode it from JSON; missing
//! fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

/// Default maximum number of steps in one workflow.
const DEFAULT_MAX_STEPS: usize = 500;

/// Default maximum title length, in characters.
const DEFAULT_MAX_TITLE_LEN: usize = 120;

/// First id handed out by a fresh graph.
const DEFAULT_FIRST_ID: u64 = 1;

/// Configuration for a workflow graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Maximum number of steps the graph accepts.
    pub max_steps: usize,
    /// Maximum title length in characters.
    pub max_title_len: usize,
    /// Id assigned to the first step added to an empty graph.
    pub first_id: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            max_title_len: DEFAULT_MAX_TITLE_LEN,
            first_id: DEFAULT_FIRST_ID,
        }
    }
}
