//! Error types for graph operations
//!
//! Every failing graph operation leaves the graph exactly as it was, so all
//! of these are recoverable. [`GraphError::kind`] folds the variants into
//! the two categories the UI distinguishes: validation failures and missing
//! steps.

use super::StepId;
use crate::core::CoreError;
use std::error::Error as _;
use std::fmt;
use thiserror::Error;

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Which edge set a reference came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// A predecessor edge in `dependsOn`
    DependsOn,
    /// An alternate successor edge in `branches`
    Branch,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::DependsOn => f.write_str("dependsOn"),
            EdgeKind::Branch => f.write_str("branches"),
        }
    }
}

/// Coarse classification of a [`GraphError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed fields, dangling references, cycles, bad positions
    Validation,
    /// The operation named a step (or template) that does not exist
    NotFound,
}

/// The dependency graph contains a cycle
///
/// `cycle` lists the steps on one cycle in traversal order: each step
/// depends on the next, and the last depends on the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dependency cycle: {}", format_cycle(.cycle))]
pub struct CycleError {
    cycle: Vec<StepId>,
}

impl CycleError {
    /// Creates a cycle error from the steps on the cycle
    pub fn new(cycle: Vec<StepId>) -> Self {
        Self { cycle }
    }

    /// Returns the steps on the cycle
    pub fn cycle(&self) -> &[StepId] {
        &self.cycle
    }

    /// Returns true if `id` is on the reported cycle
    pub fn contains(&self, id: StepId) -> bool {
        self.cycle.contains(&id)
    }
}

fn format_cycle(cycle: &[StepId]) -> String {
    let mut path: Vec<String> = cycle.iter().map(ToString::to_string).collect();
    if let Some(first) = cycle.first() {
        path.push(first.to_string());
    }
    path.join(" -> ")
}

/// Errors that can occur during graph operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GraphError {
    /// Title is empty or whitespace only
    #[error("step title must not be empty")]
    EmptyTitle {
        /// The step being written, if it already has an id
        step_id: Option<StepId>,
    },

    /// Title exceeds the configured limit
    #[error("step title is {len} characters, limit is {max}")]
    TitleTooLong {
        /// The step being written, if it already has an id
        step_id: Option<StepId>,
        /// Title length in characters
        len: usize,
        /// Configured limit
        max: usize,
    },

    /// A kind string outside input/action/approval
    #[error("unknown step kind '{value}' (expected input, action or approval)")]
    InvalidKind {
        /// The rejected value
        value: String,
    },

    /// Two steps share an id
    #[error("duplicate step id: {step_id}")]
    DuplicateStep {
        /// The duplicated id
        step_id: StepId,
    },

    /// Step lists itself in its own dependencies
    #[error("step {step_id} cannot depend on itself")]
    SelfDependency {
        /// The offending step
        step_id: StepId,
    },

    /// An edge points at a step that does not exist
    #[error("step {step} lists {target} in {edge}, but no such step exists")]
    DanglingReference {
        /// The step holding the edge
        step: StepId,
        /// The missing target
        target: StepId,
        /// Which edge set holds the reference
        edge: EdgeKind,
    },

    /// The write would make the dependency graph cyclic
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// The write would exceed the configured step limit
    #[error("workflow is limited to {max} steps")]
    CapacityExceeded {
        /// Configured limit
        max: usize,
    },

    /// The id counter ran past `u64::MAX`
    #[error("no step ids left to assign")]
    IdsExhausted,

    /// A sequence position outside the current sequence
    #[error("position {index} is out of range for {len} steps")]
    PositionOutOfRange {
        /// The requested position
        index: usize,
        /// Current sequence length
        len: usize,
    },

    /// An import payload could not be decoded
    #[error("malformed workflow payload: {reason}")]
    Malformed {
        /// Decoder message
        reason: String,
    },

    /// A step was not found in the graph
    #[error("step not found: {step_id}")]
    StepNotFound {
        /// The step ID that was not found
        step_id: StepId,
    },

    /// No template with the given name
    #[error("template not found: {name}")]
    TemplateNotFound {
        /// The requested name
        name: String,
    },
}

impl GraphError {
    /// Creates a step not found error
    pub fn step_not_found(step_id: StepId) -> Self {
        Self::StepNotFound { step_id }
    }

    /// Creates a dangling reference error
    pub fn dangling(step: StepId, target: StepId, edge: EdgeKind) -> Self {
        Self::DanglingReference { step, target, edge }
    }

    /// Creates a duplicate step error
    pub fn duplicate_step(step_id: StepId) -> Self {
        Self::DuplicateStep { step_id }
    }

    /// Creates a self-dependency error
    pub fn self_dependency(step_id: StepId) -> Self {
        Self::SelfDependency { step_id }
    }

    /// Creates a malformed payload error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// Classifies the error as a validation failure or a missing step
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StepNotFound { .. } | Self::TemplateNotFound { .. } => ErrorKind::NotFound,
            _ => ErrorKind::Validation,
        }
    }

    /// Returns true for validation failures
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Returns true when the operation referenced a missing step or template
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Returns the step ids a caller should point the user at
    pub fn offending_ids(&self) -> Vec<StepId> {
        match self {
            Self::EmptyTitle { step_id } | Self::TitleTooLong { step_id, .. } => {
                step_id.iter().copied().collect()
            }
            Self::DuplicateStep { step_id }
            | Self::SelfDependency { step_id }
            | Self::StepNotFound { step_id } => vec![*step_id],
            Self::DanglingReference { step, target, .. } => vec![*step, *target],
            Self::Cycle(cycle) => cycle.cycle().to_vec(),
            _ => Vec::new(),
        }
    }
}

impl From<CoreError> for GraphError {
    fn from(err: CoreError) -> Self {
        match err.source() {
            Some(source) => Self::malformed(format!("{err}: {source}")),
            None => Self::malformed(err.to_string()),
        }
    }
}
