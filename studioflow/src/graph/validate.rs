//! Invariant checks shared by every write path

use super::error::{CycleError, EdgeKind, GraphError, GraphResult};
use super::traversal;
use super::{Step, StepId};
use crate::core::GraphConfig;
use std::collections::HashMap;

/// Checks that a title is present and within the configured length
pub(crate) fn check_title(
    title: &str,
    step_id: Option<StepId>,
    config: &GraphConfig,
) -> GraphResult<()> {
    if title.trim().is_empty() {
        return Err(GraphError::EmptyTitle { step_id });
    }

    let len = title.chars().count();
    if len > config.max_title_len {
        return Err(GraphError::TitleTooLong {
            step_id,
            len,
            max: config.max_title_len,
        });
    }

    Ok(())
}

/// Checks a step's edges: no self dependency, and every target exists
///
/// A step may branch to itself; `exists` is not consulted for that case.
pub(crate) fn check_edges(step: &Step, exists: impl Fn(StepId) -> bool) -> GraphResult<()> {
    let id = step.id();

    if step.depends_on().contains(&id) {
        return Err(GraphError::self_dependency(id));
    }

    for &target in step.depends_on() {
        if !exists(target) {
            return Err(GraphError::dangling(id, target, EdgeKind::DependsOn));
        }
    }

    for &target in step.branches() {
        if target != id && !exists(target) {
            return Err(GraphError::dangling(id, target, EdgeKind::Branch));
        }
    }

    Ok(())
}

/// Checks that the `depends_on` relation is acyclic
pub(crate) fn check_acyclic(
    nodes: &HashMap<StepId, Step>,
    sequence: &[StepId],
) -> Result<(), CycleError> {
    match traversal::find_dependency_cycle(nodes, sequence) {
        Some(cycle) => Err(CycleError::new(cycle)),
        None => Ok(()),
    }
}

/// Runs every invariant over a complete arena
pub(crate) fn check_arena(
    nodes: &HashMap<StepId, Step>,
    sequence: &[StepId],
    config: &GraphConfig,
) -> GraphResult<()> {
    if sequence.len() > config.max_steps {
        return Err(GraphError::CapacityExceeded {
            max: config.max_steps,
        });
    }

    for id in sequence {
        let step = nodes.get(id).ok_or_else(|| GraphError::step_not_found(*id))?;
        check_title(step.title(), Some(*id), config)?;
    }

    for id in sequence {
        if let Some(step) = nodes.get(id) {
            check_edges(step, |target| nodes.contains_key(&target))?;
        }
    }

    check_acyclic(nodes, sequence)?;
    Ok(())
}

/// Builds an arena from imported records, rejecting any invariant violation
pub(crate) fn build_arena(
    steps: Vec<Step>,
    config: &GraphConfig,
) -> GraphResult<(HashMap<StepId, Step>, Vec<StepId>)> {
    if steps.len() > config.max_steps {
        return Err(GraphError::CapacityExceeded {
            max: config.max_steps,
        });
    }

    let mut nodes = HashMap::with_capacity(steps.len());
    let mut sequence = Vec::with_capacity(steps.len());
    for step in steps {
        let id = step.id();
        if nodes.contains_key(&id) {
            return Err(GraphError::duplicate_step(id));
        }
        sequence.push(id);
        nodes.insert(id, step);
    }

    check_arena(&nodes, &sequence, config)?;
    Ok((nodes, sequence))
}
