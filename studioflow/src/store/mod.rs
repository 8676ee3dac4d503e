//! The owned workflow store
//!
//! Replaces ambient, reassignable step arrays with one owner that has an
//! explicit mutation API:
//!
//! - [`WorkflowStore`]: owns the [`WorkflowGraph`](crate::graph::WorkflowGraph)
//!   and applies UI [`Intent`]s to it
//! - [`Snapshot`]: revisioned, fingerprinted copy for readers
//!
//! # Example
//!
//! ```
//! use studioflow::store::{Intent, Outcome, WorkflowStore};
//!
//! let mut store = WorkflowStore::new();
//! let outcome = store
//!     .apply(Intent::LoadTemplate { name: "photography".to_string() })
//!     .unwrap();
//! assert!(matches!(outcome, Outcome::TemplateLoaded { .. }));
//! assert_eq!(store.revision(), 1);
//! ```

mod intent;
mod workflow_store;

pub use intent::{Intent, Outcome};
pub use workflow_store::{Snapshot, WorkflowStore};
