use super::intent::{Intent, Outcome};
use crate::core::{fingerprint, serialize_value, GraphConfig};
use crate::graph::{GraphError, GraphResult, Step, Template, WorkflowGraph};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// The single owner of the workflow graph
///
/// The UI never holds its own copy of the steps. It reads through
/// [`graph`](Self::graph) or a [`Snapshot`], and writes by sending
/// [`Intent`]s to [`apply`](Self::apply). Each successful mutation bumps the
/// revision; a failed one changes neither the graph nor the revision.
#[derive(Debug, Clone, Default)]
pub struct WorkflowStore {
    graph: WorkflowGraph,
    revision: u64,
}

/// An immutable, revisioned copy of the store's steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    revision: u64,
    fingerprint: u64,
    steps: Vec<Step>,
}

impl Snapshot {
    /// Store revision the snapshot was taken at
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Stable hash of the exported steps
    ///
    /// Equal step lists give equal fingerprints regardless of revision, so
    /// a renderer can skip redraws after a no-op edit.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Steps in display order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl WorkflowStore {
    /// Creates a store with an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose graph uses the given configuration
    pub fn with_config(config: GraphConfig) -> Self {
        Self::from_graph(WorkflowGraph::with_config(config))
    }

    /// Takes ownership of an existing graph
    pub fn from_graph(graph: WorkflowGraph) -> Self {
        Self { graph, revision: 0 }
    }

    /// Read access to the graph
    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    /// Number of successful mutations so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Translates a UI intent into a graph operation
    #[instrument(level = "debug", skip_all, fields(intent = intent.name(), revision = self.revision))]
    pub fn apply(&mut self, intent: Intent) -> GraphResult<Outcome> {
        let outcome = match intent {
            Intent::Add { fields, position } => {
                let id = match position {
                    Some(position) => self.graph.insert_step(fields, position)?,
                    None => self.graph.add_step(fields)?,
                };
                Outcome::Added(id)
            }
            Intent::Edit { id, patch } => {
                self.graph.update_step(id, patch)?;
                Outcome::Updated(id)
            }
            Intent::Delete { id } => Outcome::Deleted(self.graph.delete_step(id)?),
            Intent::Reorder { from, to } => {
                self.graph.reorder(from, to)?;
                Outcome::Reordered { from, to }
            }
            Intent::SetConditional { id, conditional } => {
                self.graph.set_conditional(id, conditional)?;
                Outcome::Updated(id)
            }
            Intent::ImportFileSelected { payload } => {
                self.graph.import_json(&payload)?;
                Outcome::Imported {
                    steps: self.graph.len(),
                }
            }
            Intent::ExportRequested => Outcome::Exported(self.graph.export_json()?),
            Intent::LoadTemplate { name } => {
                let template =
                    Template::builtin(&name).ok_or(GraphError::TemplateNotFound { name })?;
                self.graph.load_template(&template)?;
                Outcome::TemplateLoaded {
                    name: template.name().to_string(),
                    steps: self.graph.len(),
                }
            }
        };

        if outcome.is_mutation() {
            self.revision += 1;
        }
        debug!(revision = self.revision, "intent applied");
        Ok(outcome)
    }

    /// Copies the current steps into a [`Snapshot`]
    pub fn snapshot(&self) -> GraphResult<Snapshot> {
        let steps = self.graph.export_graph();
        let bytes = serialize_value(&steps)?;
        Ok(Snapshot {
            revision: self.revision,
            fingerprint: fingerprint(&bytes),
            steps,
        })
    }

    /// Gives the graph back, ending the store
    pub fn into_graph(self) -> WorkflowGraph {
        self.graph
    }
}
