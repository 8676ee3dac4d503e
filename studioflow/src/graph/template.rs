//! Named workflow presets
//!
//! A template is a list of step field sets without edges. Loading one
//! replaces the current graph (see [`WorkflowGraph::load_template`]), and
//! any edges present in the field sets are dropped on load.
//!
//! [`WorkflowGraph::load_template`]: super::WorkflowGraph::load_template

use super::{StepFields, StepKind};
use serde::{Deserialize, Serialize};

const BUILTIN_NAMES: [&str; 3] = ["photography", "editing", "review"];

/// A named list of step field sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    name: String,
    steps: Vec<StepFields>,
}

impl Template {
    /// Creates a template from field sets
    pub fn new(name: impl Into<String>, steps: Vec<StepFields>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// Returns the template name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the step field sets in order
    pub fn steps(&self) -> &[StepFields] {
        &self.steps
    }

    /// Names of the built-in templates
    pub fn names() -> &'static [&'static str] {
        &BUILTIN_NAMES
    }

    /// Looks up a built-in template by name (case-insensitive)
    pub fn builtin(name: &str) -> Option<Self> {
        let steps = match name.trim().to_ascii_lowercase().as_str() {
            "photography" => photography(),
            "editing" => editing(),
            "review" => review(),
            _ => return None,
        };
        Some(Self::new(name.trim().to_ascii_lowercase(), steps))
    }
}

fn step(title: &str, kind: StepKind, description: &str) -> StepFields {
    StepFields::new(title, kind).with_description(description)
}

fn photography() -> Vec<StepFields> {
    vec![
        step("Sample check-in", StepKind::Input, "Log the sample and its owner"),
        step("Set preparation", StepKind::Action, "Lighting, backdrop and props"),
        step("Capture", StepKind::Action, "Shoot the required angles"),
        step("Retouch", StepKind::Action, "Clean-up and colour correction"),
        step("Art director approval", StepKind::Approval, "Sign-off before delivery")
            .with_conditional(true),
        step("Sample check-out", StepKind::Action, "Return the sample"),
    ]
}

fn editing() -> Vec<StepFields> {
    vec![
        step("Ingest footage", StepKind::Input, "Copy and back up source media"),
        step("Rough cut", StepKind::Action, "Assemble the story"),
        step("Fine cut", StepKind::Action, "Trim and pace"),
        step("Colour grade", StepKind::Action, "Match and grade shots"),
        step("Sound mix", StepKind::Action, "Dialogue, music and effects"),
        step("Producer approval", StepKind::Approval, "Approve or send back for changes")
            .with_conditional(true),
        step("Export masters", StepKind::Action, "Render delivery formats"),
    ]
}

fn review() -> Vec<StepFields> {
    vec![
        step("Upload asset", StepKind::Input, "Add the asset version to review"),
        step("Annotate", StepKind::Action, "Reviewers leave threaded comments"),
        step("Resolve comments", StepKind::Action, "Address feedback in a new version"),
        step("Final approval", StepKind::Approval, "Lock the approved version")
            .with_conditional(true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_resolves() {
        for name in Template::names() {
            let template = Template::builtin(name).unwrap();
            assert_eq!(template.name(), *name);
            assert!(!template.steps().is_empty());
        }
    }

    #[test]
    fn test_builtin_lookup_is_case_insensitive() {
        let template = Template::builtin(" Editing ").unwrap();
        assert_eq!(template.name(), "editing");
        assert!(Template::builtin("animation").is_none());
    }

    #[test]
    fn test_builtins_carry_no_edges() {
        for name in Template::names() {
            let template = Template::builtin(name).unwrap();
            assert!(template
                .steps()
                .iter()
                .all(|s| s.depends_on.is_empty() && s.branches.is_empty()));
        }
    }

    #[test]
    fn test_builtins_end_approval_with_conditional_flag() {
        let template = Template::builtin("review").unwrap();
        let approval = template
            .steps()
            .iter()
            .find(|s| s.kind == StepKind::Approval)
            .unwrap();
        assert!(approval.conditional);
    }
}
