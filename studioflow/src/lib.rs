//! Studioflow: workflow step graph for content-production tracking
//!
//! `studioflow` is the engine behind a production tracker's workflow
//! designer. A workflow is a set of steps (inputs, actions, approvals) with
//! two kinds of edges:
//!
//! - **dependencies** (`depends_on`): steps that must complete first; these
//!   must stay acyclic and determine execution order
//! - **branches**: alternate or rework transitions; these may loop
//!
//! # Features
//!
//! - **Validated writes**: every add, edit, delete, reorder and import either
//!   commits a fully valid graph or changes nothing
//! - **Deterministic ordering**: topological order with ties broken by
//!   display position
//! - **Cycle diagnostics**: the exact steps on a dependency cycle
//! - **Branch reachability**: safe on rework loops
//! - **Import/export**: JSON step records, plus named templates
//! - **Rendering support**: Graphviz DOT and dependency levels
//!
//! # Quick Start
//!
//! ```
//! use studioflow::prelude::*;
//!
//! let mut graph = WorkflowGraph::new();
//! graph.load_template(&Template::builtin("photography").unwrap()).unwrap();
//!
//! // Capture (3) waits for set preparation (2)
//! graph
//!     .update_step(StepId::new(3), StepPatch::default().with_dependencies([2u64]))
//!     .unwrap();
//!
//! // Closing the loop is rejected and leaves the graph unchanged
//! let err = graph
//!     .update_step(StepId::new(2), StepPatch::default().with_dependencies([3u64]))
//!     .unwrap_err();
//! assert!(matches!(err, GraphError::Cycle(_)));
//!
//! let order = graph.topological_order().unwrap();
//! assert_eq!(order.len(), 6);
//! ```
//!
//! # Module Organization
//!
//! - [`core`]: configuration, serialization helpers, core error type
//! - [`graph`]: the workflow graph, its step types, templates and rendering
//! - [`store`]: the single owner that applies UI intents and issues snapshots
//! - [`assist`]: pluggable suggestion providers

pub mod assist;
pub mod core;
pub mod graph;
pub mod store;

// Re-export commonly used types for convenience
pub use crate::core::{CoreError, GraphConfig};

pub use graph::{
    CycleError, EdgeKind, ErrorKind, GraphError, GraphResult, Step, StepFields, StepId, StepKind,
    StepPatch, Template, WorkflowGraph,
};

pub use store::{Intent, Outcome, Snapshot, WorkflowStore};

/// Prelude module for convenient glob imports
///
/// # Example
///
/// ```
/// use studioflow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::GraphConfig;

    pub use crate::graph::{
        CycleError, GraphError, GraphResult, Step, StepFields, StepId, StepKind, StepPatch,
        Template, WorkflowGraph,
    };

    pub use crate::store::{Intent, Outcome, Snapshot, WorkflowStore};

    pub use crate::assist::{KeywordSuggester, Suggester, Suggestion};
}
