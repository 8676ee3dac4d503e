//! Workflow step graph
//!
//! This module provides the data structures and algorithms behind the
//! workflow designer:
//!
//! - Steps with typed dependency (`depends_on`) and alternate-path
//!   (`branches`) edges
//! - Validation on every write: unique ids, no dangling edges, no self
//!   dependency, acyclic dependencies
//! - Deterministic topological ordering and dependency levels
//! - Branch reachability that tolerates rework loops
//! - JSON import/export, templates and DOT rendering
//!
//! # Design
//!
//! The graph owns its steps in an arena keyed by [`StepId`] and keeps the
//! display sequence separately. Callers never get mutable access to a step;
//! they go through [`WorkflowGraph`] operations, each of which either
//! commits a fully valid state or changes nothing.

mod error;
mod render;
mod step;
mod step_id;
mod template;
mod traversal;
mod validate;
mod workflow_graph;

pub use error::{CycleError, EdgeKind, ErrorKind, GraphError, GraphResult};
pub use step::{Step, StepFields, StepKind, StepPatch};
pub use step_id::StepId;
pub use template::Template;
pub use workflow_graph::WorkflowGraph;
