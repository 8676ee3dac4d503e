//! Step records and the field sets used to create and edit them
//!
//! [`Step`] is the stored node; its fields are private so that every write
//! goes through [`WorkflowGraph`](super::WorkflowGraph), which owns the
//! invariants. [`StepFields`] describes a step before it has an id, and
//! [`StepPatch`] carries a partial edit.

use super::error::GraphError;
use super::StepId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// What a step represents in the production workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// Material enters the workflow (samples, footage, briefs)
    #[serde(alias = "Input")]
    Input,
    /// Work performed on the material
    #[serde(alias = "Action")]
    Action,
    /// A sign-off gate
    #[serde(alias = "Approval")]
    Approval,
}

impl StepKind {
    /// All kinds, in display order
    pub const ALL: [StepKind; 3] = [StepKind::Input, StepKind::Action, StepKind::Approval];

    /// Returns the wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Input => "input",
            StepKind::Action => "action",
            StepKind::Approval => "approval",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GraphError::InvalidKind {
                value: s.to_string(),
            })
    }
}

/// A node in the workflow graph
///
/// Serializes to the import/export record
/// `{id, title, kind, description, conditional, dependsOn, branches}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    id: StepId,
    title: String,
    kind: StepKind,
    #[serde(default)]
    description: String,
    #[serde(default)]
    conditional: bool,
    /// Steps that must complete before this one may start
    #[serde(default)]
    depends_on: BTreeSet<StepId>,
    /// Alternate successors outside the default order
    #[serde(default)]
    branches: BTreeSet<StepId>,
}

impl Step {
    /// Creates a step with no description and no edges
    pub fn new(id: impl Into<StepId>, title: impl Into<String>, kind: StepKind) -> Self {
        Self::from_fields(id.into(), StepFields::new(title, kind))
    }

    pub(crate) fn from_fields(id: StepId, fields: StepFields) -> Self {
        let StepFields {
            title,
            kind,
            description,
            conditional,
            depends_on,
            branches,
        } = fields;
        Self {
            id,
            title,
            kind,
            description,
            conditional,
            depends_on,
            branches,
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the conditional flag
    pub fn with_conditional(mut self, conditional: bool) -> Self {
        self.conditional = conditional;
        self
    }

    /// Adds predecessor edges
    pub fn with_dependencies<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<StepId>,
    {
        self.depends_on.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Adds branch edges
    pub fn with_branches<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<StepId>,
    {
        self.branches.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Returns the step ID
    pub fn id(&self) -> StepId {
        self.id
    }

    /// Returns the title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the kind
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// Returns the description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns true if continuation depends on an external decision
    pub fn is_conditional(&self) -> bool {
        self.conditional
    }

    /// Returns the predecessors (dependencies)
    pub fn depends_on(&self) -> &BTreeSet<StepId> {
        &self.depends_on
    }

    /// Returns the alternate successors
    pub fn branches(&self) -> &BTreeSet<StepId> {
        &self.branches
    }

    /// Returns the field set of this step, without its id
    pub fn fields(&self) -> StepFields {
        StepFields {
            title: self.title.clone(),
            kind: self.kind,
            description: self.description.clone(),
            conditional: self.conditional,
            depends_on: self.depends_on.clone(),
            branches: self.branches.clone(),
        }
    }

    pub(crate) fn apply(&mut self, patch: StepPatch) {
        let StepPatch {
            title,
            kind,
            description,
            conditional,
            depends_on,
            branches,
        } = patch;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(kind) = kind {
            self.kind = kind;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(conditional) = conditional {
            self.conditional = conditional;
        }
        if let Some(depends_on) = depends_on {
            self.depends_on = depends_on;
        }
        if let Some(branches) = branches {
            self.branches = branches;
        }
    }

    /// Drops `id` from both edge sets; returns true if anything was removed
    pub(crate) fn strip_reference(&mut self, id: StepId) -> bool {
        let deps = self.depends_on.remove(&id);
        let branches = self.branches.remove(&id);
        deps || branches
    }

    pub(crate) fn set_conditional(&mut self, conditional: bool) {
        self.conditional = conditional;
    }
}

/// Fields for a step that does not have an id yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepFields {
    /// Display name, must not be empty
    pub title: String,
    /// Step kind
    pub kind: StepKind,
    /// Free text
    #[serde(default)]
    pub description: String,
    /// Approval whose continuation depends on an external decision
    #[serde(default)]
    pub conditional: bool,
    /// Predecessor edges
    #[serde(default)]
    pub depends_on: BTreeSet<StepId>,
    /// Alternate successor edges
    #[serde(default)]
    pub branches: BTreeSet<StepId>,
}

impl StepFields {
    /// Creates a field set with no description and no edges
    pub fn new(title: impl Into<String>, kind: StepKind) -> Self {
        Self {
            title: title.into(),
            kind,
            description: String::new(),
            conditional: false,
            depends_on: BTreeSet::new(),
            branches: BTreeSet::new(),
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the conditional flag
    pub fn with_conditional(mut self, conditional: bool) -> Self {
        self.conditional = conditional;
        self
    }

    /// Adds predecessor edges
    pub fn with_dependencies<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<StepId>,
    {
        self.depends_on.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Adds branch edges
    pub fn with_branches<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<StepId>,
    {
        self.branches.extend(ids.into_iter().map(Into::into));
        self
    }
}

/// A partial edit; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StepPatch {
    /// New title
    pub title: Option<String>,
    /// New kind
    pub kind: Option<StepKind>,
    /// New description
    pub description: Option<String>,
    /// New conditional flag
    pub conditional: Option<bool>,
    /// Replacement predecessor set
    pub depends_on: Option<BTreeSet<StepId>>,
    /// Replacement branch set
    pub branches: Option<BTreeSet<StepId>>,
}

impl StepPatch {
    /// Replaces the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the kind
    pub fn with_kind(mut self, kind: StepKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Replaces the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the conditional flag
    pub fn with_conditional(mut self, conditional: bool) -> Self {
        self.conditional = Some(conditional);
        self
    }

    /// Replaces the predecessor set
    pub fn with_dependencies<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<StepId>,
    {
        self.depends_on = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the branch set
    pub fn with_branches<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<StepId>,
    {
        self.branches = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
