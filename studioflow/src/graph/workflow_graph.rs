//! WorkflowGraph - the validated step arena behind the workflow designer
//!
//! Steps live in a map keyed by [`StepId`] plus a separate display
//! sequence. The sequence is purely presentational: execution order comes
//! from the `depends_on` edges via [`WorkflowGraph::topological_order`].
//!
//! Every write is all-or-nothing. A write that would break an invariant
//! (dangling edge, self dependency, dependency cycle, bad title, capacity)
//! returns an error and leaves the graph exactly as it was.

use super::error::{CycleError, GraphError, GraphResult};
use super::template::Template;
use super::traversal;
use super::validate;
use super::{Step, StepFields, StepId, StepPatch};
use crate::core::{deserialize_value, serialize_pretty, GraphConfig};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

/// A set of workflow steps with dependency and branch edges
///
/// # Example
///
/// ```
/// use studioflow::{StepFields, StepKind, WorkflowGraph};
///
/// let mut graph = WorkflowGraph::new();
///
/// let shoot = graph.add_step(StepFields::new("Shoot", StepKind::Action)).unwrap();
/// let retouch = graph
///     .add_step(StepFields::new("Retouch", StepKind::Action).with_dependencies([shoot]))
///     .unwrap();
/// let approve = graph
///     .add_step(
///         StepFields::new("Client approval", StepKind::Approval)
///             .with_dependencies([retouch])
///             .with_branches([retouch]),
///     )
///     .unwrap();
///
/// let order: Vec<_> = graph.topological_order().unwrap().iter().map(|s| s.id()).collect();
/// assert_eq!(order, vec![shoot, retouch, approve]);
/// ```
#[derive(Debug, Clone)]
pub struct WorkflowGraph {
    /// Map from step ID to step
    nodes: HashMap<StepId, Step>,
    /// Display order
    sequence: Vec<StepId>,
    /// Lower bound for the next assigned id; `None` once past `u64::MAX`
    next_id: Option<StepId>,
    config: GraphConfig,
}

/// Logs a rejected write and passes the error through
fn rejected(operation: &'static str) -> impl FnOnce(GraphError) -> GraphError {
    move |err| {
        warn!(
            operation,
            kind = ?err.kind(),
            ids = ?err.offending_ids(),
            "rejected workflow write: {}",
            err
        );
        err
    }
}

impl WorkflowGraph {
    /// Creates an empty graph with the default configuration
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Creates an empty graph with the given configuration
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            nodes: HashMap::new(),
            sequence: Vec::new(),
            next_id: Some(StepId::new(config.first_id)),
            config,
        }
    }

    /// Returns the configuration
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Returns the number of steps in the graph
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Returns true if the graph has no steps
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Returns true if the step exists in the graph
    pub fn contains(&self, id: StepId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns a reference to a step
    pub fn get(&self, id: StepId) -> Option<&Step> {
        self.nodes.get(&id)
    }

    /// Returns the position of a step in the display sequence
    pub fn position(&self, id: StepId) -> Option<usize> {
        self.sequence.iter().position(|s| *s == id)
    }

    /// Returns all step IDs in display order
    pub fn step_ids(&self) -> impl Iterator<Item = StepId> + '_ {
        self.sequence.iter().copied()
    }

    /// Returns all steps in display order
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.sequence.iter().filter_map(|id| self.nodes.get(id))
    }

    fn step_or_not_found(&self, id: StepId) -> GraphResult<&Step> {
        self.nodes.get(&id).ok_or_else(|| GraphError::step_not_found(id))
    }

    /// First id at or above the counter that no step uses
    fn peek_id(&self) -> GraphResult<StepId> {
        let mut id = self.next_id.ok_or(GraphError::IdsExhausted)?;
        while self.nodes.contains_key(&id) {
            id = id.next().ok_or(GraphError::IdsExhausted)?;
        }
        Ok(id)
    }

    /// Appends a step to the end of the sequence
    ///
    /// Edges may only reference steps already in the graph. Returns the new
    /// step's id.
    pub fn add_step(&mut self, fields: StepFields) -> GraphResult<StepId> {
        let position = self.sequence.len();
        self.insert_step(fields, position)
    }

    /// Inserts a step at `position` in the sequence (`0..=len`)
    pub fn insert_step(&mut self, fields: StepFields, position: usize) -> GraphResult<StepId> {
        self.try_insert(fields, position).map_err(rejected("insert_step"))
    }

    fn try_insert(&mut self, fields: StepFields, position: usize) -> GraphResult<StepId> {
        if position > self.sequence.len() {
            return Err(GraphError::PositionOutOfRange {
                index: position,
                len: self.sequence.len(),
            });
        }
        if self.sequence.len() >= self.config.max_steps {
            return Err(GraphError::CapacityExceeded {
                max: self.config.max_steps,
            });
        }

        validate::check_title(&fields.title, None, &self.config)?;

        let id = self.peek_id()?;
        let step = Step::from_fields(id, fields);
        validate::check_edges(&step, |target| self.nodes.contains_key(&target))?;

        // Nothing can depend on a fresh id, so the dependency graph stays
        // acyclic without a traversal.
        self.next_id = id.next();
        self.sequence.insert(position, id);
        self.nodes.insert(id, step);

        debug!(step_id = %id, position, "step added");
        Ok(id)
    }

    /// Replaces the fields named in `patch`
    ///
    /// Fails with [`GraphError::StepNotFound`] if `id` is absent. If the
    /// edited step would break referential integrity or close a dependency
    /// cycle, the edit is rejected and the graph is unchanged.
    pub fn update_step(&mut self, id: StepId, patch: StepPatch) -> GraphResult<()> {
        self.try_update(id, patch).map_err(rejected("update_step"))
    }

    fn try_update(&mut self, id: StepId, patch: StepPatch) -> GraphResult<()> {
        let mut candidate = self.step_or_not_found(id)?.clone();
        let rewires = patch.depends_on.is_some();
        candidate.apply(patch);

        validate::check_title(candidate.title(), Some(id), &self.config)?;
        validate::check_edges(&candidate, |target| self.nodes.contains_key(&target))?;

        // Swap the candidate in, then roll back if it closes a cycle.
        let previous = self.nodes.insert(id, candidate);
        if rewires {
            if let Err(cycle) = validate::check_acyclic(&self.nodes, &self.sequence) {
                if let Some(previous) = previous {
                    self.nodes.insert(id, previous);
                }
                return Err(cycle.into());
            }
        }

        debug!(step_id = %id, "step updated");
        Ok(())
    }

    /// Sets or clears the conditional flag of a step
    pub fn set_conditional(&mut self, id: StepId, conditional: bool) -> GraphResult<()> {
        let step = self
            .nodes
            .get_mut(&id)
            .ok_or_else(|| GraphError::step_not_found(id))
            .map_err(rejected("set_conditional"))?;
        step.set_conditional(conditional);
        debug!(step_id = %id, conditional, "conditional flag set");
        Ok(())
    }

    /// Removes a step and every reference to it
    ///
    /// The id is stripped from all other steps' `depends_on` and `branches`
    /// sets. Returns the removed step.
    pub fn delete_step(&mut self, id: StepId) -> GraphResult<Step> {
        let step = self
            .nodes
            .remove(&id)
            .ok_or_else(|| GraphError::step_not_found(id))
            .map_err(rejected("delete_step"))?;
        self.sequence.retain(|s| *s != id);

        let stripped = self
            .nodes
            .values_mut()
            .map(|other| other.strip_reference(id))
            .filter(|removed| *removed)
            .count();

        debug!(step_id = %id, stripped, "step deleted");
        Ok(step)
    }

    /// Moves the step at `from` so that it ends up at `to`
    ///
    /// Only the display sequence changes; dependencies are untouched.
    pub fn reorder(&mut self, from: usize, to: usize) -> GraphResult<()> {
        let len = self.sequence.len();
        for index in [from, to] {
            if index >= len {
                return Err(rejected("reorder")(GraphError::PositionOutOfRange {
                    index,
                    len,
                }));
            }
        }

        let id = self.sequence.remove(from);
        self.sequence.insert(to, id);
        debug!(step_id = %id, from, to, "step moved");
        Ok(())
    }

    /// Replaces the whole graph with the given steps
    ///
    /// The records are kept in the order given. If any invariant fails
    /// (duplicate ids, dangling edges, self dependency, dependency cycle,
    /// bad title, capacity) the previous graph stays in place.
    pub fn import_graph(&mut self, steps: impl IntoIterator<Item = Step>) -> GraphResult<()> {
        let (nodes, sequence) = validate::build_arena(steps.into_iter().collect(), &self.config)
            .map_err(rejected("import_graph"))?;

        let floor = StepId::new(self.config.first_id);
        self.next_id = match sequence.iter().max() {
            Some(highest) => highest.next().map(|next| next.max(floor)),
            None => Some(floor),
        };
        self.nodes = nodes;
        self.sequence = sequence;

        debug!(steps = self.sequence.len(), "workflow imported");
        Ok(())
    }

    /// Decodes a JSON step array and imports it
    ///
    /// A payload that does not decode is reported as
    /// [`GraphError::Malformed`]; the graph is left untouched.
    pub fn import_json(&mut self, payload: &str) -> GraphResult<()> {
        let steps: Vec<Step> = deserialize_value(payload.as_bytes())
            .map_err(GraphError::from)
            .map_err(rejected("import_json"))?;
        self.import_graph(steps)
    }

    /// Replaces the graph with a template's steps
    ///
    /// Steps get ids counting up from the configured first id, and every
    /// edge set is emptied.
    pub fn load_template(&mut self, template: &Template) -> GraphResult<()> {
        let first = self.config.first_id;
        let steps = template
            .steps()
            .iter()
            .enumerate()
            .map(|(offset, fields)| {
                let raw = u64::try_from(offset)
                    .ok()
                    .and_then(|offset| first.checked_add(offset))
                    .ok_or(GraphError::IdsExhausted)?;
                let mut fields = fields.clone();
                fields.depends_on.clear();
                fields.branches.clear();
                Ok(Step::from_fields(StepId::new(raw), fields))
            })
            .collect::<GraphResult<Vec<_>>>()
            .map_err(rejected("load_template"))?;
        self.import_graph(steps)?;
        debug!(template = template.name(), "template loaded");
        Ok(())
    }

    /// Returns a snapshot of all steps in display order
    pub fn export_graph(&self) -> Vec<Step> {
        self.steps().cloned().collect()
    }

    /// Returns the export as indented JSON
    pub fn export_json(&self) -> GraphResult<String> {
        Ok(serialize_pretty(&self.export_graph())?)
    }

    /// Removes all steps and resets the id counter
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.sequence.clear();
        self.next_id = Some(StepId::new(self.config.first_id));
    }

    /// Returns a valid execution order of all steps
    ///
    /// Every step comes after all of its dependencies. Among steps with no
    /// ordering constraint between them, the one earlier in the display
    /// sequence comes first.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError`] naming the steps of a dependency cycle.
    pub fn topological_order(&self) -> Result<Vec<&Step>, CycleError> {
        let order = traversal::topological_order(&self.nodes, &self.sequence)?;
        Ok(order.iter().filter_map(|id| self.nodes.get(id)).collect())
    }

    /// Returns one dependency cycle, if the graph has any
    ///
    /// Uses a three-color depth-first search. Graphs built through this
    /// type never contain one; this is for diagnostics.
    pub fn find_dependency_cycle(&self) -> Option<Vec<StepId>> {
        traversal::find_dependency_cycle(&self.nodes, &self.sequence)
    }

    /// Returns true if the dependency graph contains a cycle
    pub fn has_cycle(&self) -> bool {
        self.find_dependency_cycle().is_some()
    }

    /// Returns every step reachable from `id` over `branches` edges
    ///
    /// Branch cycles are allowed, so `id` itself is included when a branch
    /// path leads back to it.
    pub fn reachable_branches(&self, id: StepId) -> GraphResult<BTreeSet<StepId>> {
        self.step_or_not_found(id)?;
        Ok(traversal::reachable_branches(&self.nodes, id))
    }

    /// Groups steps into dependency levels for layered drawing
    ///
    /// Level 0 holds steps with no dependencies; every other step sits one
    /// level below its deepest dependency.
    pub fn dependency_levels(&self) -> Result<Vec<Vec<StepId>>, CycleError> {
        traversal::dependency_levels(&self.nodes, &self.sequence)
    }

    /// Returns steps with no dependencies, in display order
    ///
    /// These are the steps that can start immediately.
    pub fn root_steps(&self) -> Vec<StepId> {
        self.steps()
            .filter(|step| step.depends_on().is_empty())
            .map(Step::id)
            .collect()
    }

    /// Returns steps nothing depends on, in display order
    pub fn leaf_steps(&self) -> Vec<StepId> {
        let depended_on: HashSet<StepId> = self
            .nodes
            .values()
            .flat_map(|step| step.depends_on().iter().copied())
            .collect();
        self.step_ids()
            .filter(|id| !depended_on.contains(id))
            .collect()
    }

    /// Returns the steps that list `id` as a dependency, in display order
    pub fn dependents(&self, id: StepId) -> GraphResult<Vec<StepId>> {
        self.step_or_not_found(id)?;
        Ok(self
            .steps()
            .filter(|step| step.depends_on().contains(&id))
            .map(Step::id)
            .collect())
    }

    /// Returns steps that can start given the completed ones
    ///
    /// A step is runnable when it has not completed and all of its
    /// dependencies have. Results are in display order.
    pub fn runnable(&self, completed: &HashSet<StepId>) -> Vec<StepId> {
        self.steps()
            .filter(|step| !completed.contains(&step.id()))
            .filter(|step| step.depends_on().iter().all(|dep| completed.contains(dep)))
            .map(Step::id)
            .collect()
    }

    /// Runs the full invariant check over the current graph
    pub fn validate(&self) -> GraphResult<()> {
        validate::check_arena(&self.nodes, &self.sequence, &self.config)
    }
}

impl Default for WorkflowGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Graphs are equal when their step sequences are equal
impl PartialEq for WorkflowGraph {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence && self.steps().eq(other.steps())
    }
}

impl Eq for WorkflowGraph {}

/// Serializes as the export record array
impl Serialize for WorkflowGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.steps())
    }
}

/// Deserializes the record array and validates it like an import
impl<'de> Deserialize<'de> for WorkflowGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let steps = Vec::<Step>::deserialize(deserializer)?;
        let mut graph = WorkflowGraph::new();
        graph.import_graph(steps).map_err(serde::de::Error::custom)?;
        Ok(graph)
    }
}
