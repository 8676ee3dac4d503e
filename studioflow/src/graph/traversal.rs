//! Graph traversals over the step arena
//!
//! These work on the raw `nodes`/`sequence` pair rather than on
//! [`WorkflowGraph`](super::WorkflowGraph) so that the graph can run them
//! against a tentatively written state before deciding to keep it.
//!
//! Edges are read as `step -> dependency` for cycle detection and as
//! `dependency -> step` for ordering. References to ids that are not in
//! `nodes` are ignored; referential integrity is checked separately.

use super::error::CycleError;
use super::{Step, StepId};
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap, VecDeque};

/// DFS marking. Absent from the map means unvisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Finds one cycle in the `depends_on` relation
///
/// Roots are tried in sequence order and dependencies in ascending id
/// order, so the reported cycle is deterministic. The returned path starts
/// at the step that was re-entered; each step depends on the next and the
/// last depends on the first.
pub(crate) fn find_dependency_cycle(
    nodes: &HashMap<StepId, Step>,
    sequence: &[StepId],
) -> Option<Vec<StepId>> {
    let mut marks = HashMap::with_capacity(nodes.len());
    let mut stack = Vec::new();

    for &id in sequence {
        if !marks.contains_key(&id) {
            if let Some(cycle) = visit(id, nodes, &mut marks, &mut stack) {
                return Some(cycle);
            }
        }
    }

    None
}

fn visit(
    id: StepId,
    nodes: &HashMap<StepId, Step>,
    marks: &mut HashMap<StepId, Mark>,
    stack: &mut Vec<StepId>,
) -> Option<Vec<StepId>> {
    marks.insert(id, Mark::InProgress);
    stack.push(id);

    if let Some(step) = nodes.get(&id) {
        for &dependency in step.depends_on() {
            if !nodes.contains_key(&dependency) {
                continue;
            }
            match marks.get(&dependency) {
                None => {
                    if let Some(cycle) = visit(dependency, nodes, marks, stack) {
                        return Some(cycle);
                    }
                }
                Some(Mark::InProgress) => {
                    // Back edge: the cycle is the stack from `dependency` up.
                    let start = stack.iter().position(|s| *s == dependency).unwrap_or(0);
                    return Some(stack[start..].to_vec());
                }
                Some(Mark::Done) => {}
            }
        }
    }

    stack.pop();
    marks.insert(id, Mark::Done);
    None
}

/// Returns a dependency-respecting order of all steps
///
/// Kahn's algorithm with a min-heap keyed by sequence position: whenever
/// several steps have all of their dependencies placed, the one earliest in
/// the sequence goes next. Identical input always yields identical output.
///
/// # Errors
///
/// Returns a [`CycleError`] naming the steps of one dependency cycle.
pub(crate) fn topological_order(
    nodes: &HashMap<StepId, Step>,
    sequence: &[StepId],
) -> Result<Vec<StepId>, CycleError> {
    let position: HashMap<StepId, usize> = sequence
        .iter()
        .enumerate()
        .map(|(index, id)| (*id, index))
        .collect();

    let mut pending: HashMap<StepId, usize> = HashMap::with_capacity(sequence.len());
    let mut dependents: HashMap<StepId, Vec<StepId>> = HashMap::new();
    for &id in sequence {
        let Some(step) = nodes.get(&id) else {
            continue;
        };
        let mut count = 0;
        for dependency in step.depends_on() {
            if position.contains_key(dependency) {
                dependents.entry(*dependency).or_default().push(id);
                count += 1;
            }
        }
        pending.insert(id, count);
    }

    let mut ready: BinaryHeap<Reverse<usize>> = sequence
        .iter()
        .enumerate()
        .filter(|(_, id)| pending.get(*id) == Some(&0))
        .map(|(index, _)| Reverse(index))
        .collect();

    let mut order = Vec::with_capacity(pending.len());
    while let Some(Reverse(index)) = ready.pop() {
        let id = sequence[index];
        order.push(id);

        for dependent in dependents.get(&id).into_iter().flatten() {
            if let Some(count) = pending.get_mut(dependent) {
                *count -= 1;
                if *count == 0 {
                    if let Some(&index) = position.get(dependent) {
                        ready.push(Reverse(index));
                    }
                }
            }
        }
    }

    if order.len() != pending.len() {
        let cycle = find_dependency_cycle(nodes, sequence).unwrap_or_else(|| {
            sequence
                .iter()
                .filter(|id| pending.get(*id).is_some_and(|count| *count > 0))
                .copied()
                .collect()
        });
        return Err(CycleError::new(cycle));
    }

    Ok(order)
}

/// Groups steps by the length of their longest dependency chain
///
/// Level 0 holds steps with no dependencies; a step sits one level below
/// its deepest dependency. Steps within a level keep sequence order.
pub(crate) fn dependency_levels(
    nodes: &HashMap<StepId, Step>,
    sequence: &[StepId],
) -> Result<Vec<Vec<StepId>>, CycleError> {
    let order = topological_order(nodes, sequence)?;

    let mut depth: HashMap<StepId, usize> = HashMap::with_capacity(order.len());
    for id in &order {
        let level = nodes
            .get(id)
            .into_iter()
            .flat_map(|step| step.depends_on())
            .filter_map(|dependency| depth.get(dependency))
            .map(|d| d + 1)
            .max()
            .unwrap_or(0);
        depth.insert(*id, level);
    }

    let mut levels: Vec<Vec<StepId>> = Vec::new();
    for id in sequence {
        if let Some(&level) = depth.get(id) {
            if levels.len() <= level {
                levels.resize_with(level + 1, Vec::new);
            }
            levels[level].push(*id);
        }
    }

    Ok(levels)
}

/// Collects every step reachable from `start` over `branches` edges
///
/// Branch cycles are allowed, so this is a visited-set BFS. `start` itself
/// is only in the result if some branch path leads back to it.
pub(crate) fn reachable_branches(nodes: &HashMap<StepId, Step>, start: StepId) -> BTreeSet<StepId> {
    let mut reached = BTreeSet::new();
    let mut queue: VecDeque<StepId> = nodes
        .get(&start)
        .map(|step| step.branches().iter().copied().collect())
        .unwrap_or_default();

    while let Some(id) = queue.pop_front() {
        if !reached.insert(id) {
            continue;
        }
        if let Some(step) = nodes.get(&id) {
            queue.extend(
                step.branches()
                    .iter()
                    .copied()
                    .filter(|target| !reached.contains(target)),
            );
        }
    }

    reached
}
