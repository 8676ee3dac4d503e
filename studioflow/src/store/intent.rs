use crate::graph::{Step, StepFields, StepId, StepPatch};
use serde::{Deserialize, Serialize};

/// A user action emitted by the workflow designer UI
///
/// Intents are plain data so the UI layer can send them across whatever
/// boundary it has (an event queue, a message port) as JSON:
///
/// ```
/// use studioflow::store::Intent;
///
/// let intent: Intent = serde_json::from_str(r#"{"type": "delete", "id": 3}"#).unwrap();
/// assert_eq!(intent.name(), "delete");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// Add a step, at the end unless a position is given
    Add {
        /// Fields of the new step
        fields: StepFields,
        /// Sequence position to insert at (`0..=len`)
        position: Option<usize>,
    },
    /// Edit fields of an existing step
    Edit {
        /// The step to edit
        id: StepId,
        /// Fields to replace
        patch: StepPatch,
    },
    /// Delete a step
    Delete {
        /// The step to delete
        id: StepId,
    },
    /// Move a step within the display sequence
    Reorder {
        /// Current position of the step
        from: usize,
        /// Position it should end up at
        to: usize,
    },
    /// Toggle the conditional flag
    SetConditional {
        /// The step to update
        id: StepId,
        /// New flag value
        conditional: bool,
    },
    /// The user picked a file to import
    ImportFileSelected {
        /// File contents, a JSON step array
        payload: String,
    },
    /// The user asked to download the workflow
    ExportRequested,
    /// The user picked a preset
    LoadTemplate {
        /// Template name, matched case-insensitively
        name: String,
    },
}

impl Intent {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Add { .. } => "add",
            Intent::Edit { .. } => "edit",
            Intent::Delete { .. } => "delete",
            Intent::Reorder { .. } => "reorder",
            Intent::SetConditional { .. } => "set_conditional",
            Intent::ImportFileSelected { .. } => "import_file_selected",
            Intent::ExportRequested => "export_requested",
            Intent::LoadTemplate { .. } => "load_template",
        }
    }
}

/// What an applied intent did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A step was added with this id
    Added(StepId),
    /// The step was edited
    Updated(StepId),
    /// The step was removed; carries the removed record
    Deleted(Step),
    /// A step was moved
    Reordered {
        /// Previous position
        from: usize,
        /// New position
        to: usize,
    },
    /// The graph was replaced by an import
    Imported {
        /// Number of steps after the import
        steps: usize,
    },
    /// The graph was replaced by a template
    TemplateLoaded {
        /// Canonical template name
        name: String,
        /// Number of steps loaded
        steps: usize,
    },
    /// JSON text for the download collaborator
    Exported(String),
}

impl Outcome {
    /// Returns true if the graph changed
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Outcome::Exported(_))
    }
}
