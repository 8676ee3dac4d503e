//! Workflow graph behaviour through the public API
//!
//! This test verifies that:
//! 1. A dependency chain orders as written
//! 2. Edits that would close a dependency cycle are rejected atomically
//! 3. Imports with dangling references add nothing
//! 4. Add/delete and export/import are inverse pairs
//! 5. Deletion never leaves dangling references
//! 6. Branch reachability terminates on rework loops

use std::collections::{BTreeSet, HashMap};
use studioflow::prelude::*;

fn id(raw: u64) -> StepId {
    StepId::new(raw)
}

fn ids(graph: &WorkflowGraph) -> Vec<StepId> {
    graph.step_ids().collect()
}

fn order_ids(graph: &WorkflowGraph) -> Vec<StepId> {
    graph
        .topological_order()
        .unwrap()
        .iter()
        .map(|step| step.id())
        .collect()
}

/// Steps 1..=4 where each depends on the previous one
fn chain() -> WorkflowGraph {
    let mut graph = WorkflowGraph::new();
    graph
        .import_graph(vec![
            Step::new(1u64, "Sample check-in", StepKind::Input),
            Step::new(2u64, "Capture", StepKind::Action).with_dependencies([1u64]),
            Step::new(3u64, "Retouch", StepKind::Action).with_dependencies([2u64]),
            Step::new(4u64, "Approval", StepKind::Approval).with_dependencies([3u64]),
        ])
        .unwrap();
    graph
}

/// A wider graph with a diamond, an independent step and branch loops
fn production() -> WorkflowGraph {
    let mut graph = WorkflowGraph::new();
    graph
        .import_graph(vec![
            Step::new(1u64, "Brief", StepKind::Input),
            Step::new(2u64, "Capture", StepKind::Action).with_dependencies([1u64]),
            Step::new(3u64, "Interview", StepKind::Action).with_dependencies([1u64]),
            Step::new(4u64, "Edit", StepKind::Action)
                .with_dependencies([2u64, 3])
                .with_branches([2u64]),
            Step::new(5u64, "Music licence", StepKind::Input),
            Step::new(6u64, "Producer approval", StepKind::Approval)
                .with_dependencies([4u64, 5])
                .with_branches([4u64, 6])
                .with_conditional(true),
        ])
        .unwrap();
    graph
}

fn assert_respects_dependencies(graph: &WorkflowGraph) {
    let order = order_ids(graph);
    let position: HashMap<StepId, usize> =
        order.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut sorted = order.clone();
    sorted.sort();
    let mut expected = ids(graph);
    expected.sort();
    assert_eq!(sorted, expected, "order must be a permutation of all steps");

    for step in graph.steps() {
        for dependency in step.depends_on() {
            assert!(
                position[dependency] < position[&step.id()],
                "{} must come before {}",
                dependency,
                step.id()
            );
        }
    }
}

#[test]
fn test_chain_orders_one_to_four() {
    let graph = chain();
    assert_eq!(order_ids(&graph), vec![id(1), id(2), id(3), id(4)]);
}

#[test]
fn test_cycle_edit_rejected_and_graph_unchanged() {
    let mut graph = chain();
    let before = graph.export_graph();

    let err = graph
        .update_step(id(2), StepPatch::default().with_dependencies([3u64]))
        .unwrap_err();

    assert!(err.is_validation());
    let offending: BTreeSet<StepId> = err.offending_ids().into_iter().collect();
    assert_eq!(offending, BTreeSet::from([id(2), id(3)]));
    assert_eq!(graph.export_graph(), before);
    assert_eq!(order_ids(&graph), vec![id(1), id(2), id(3), id(4)]);
}

#[test]
fn test_import_with_dangling_dependency_adds_nothing() {
    let mut graph = WorkflowGraph::new();
    let err = graph
        .import_graph(vec![
            Step::new(1u64, "Capture", StepKind::Action).with_dependencies([99u64]),
            Step::new(2u64, "Retouch", StepKind::Action),
        ])
        .unwrap_err();

    assert!(err.is_validation());
    assert!(err.offending_ids().contains(&id(99)));
    assert!(err.to_string().contains("99"));
    assert!(graph.is_empty());
}

#[test]
fn test_import_json_dangling_branch() {
    let mut graph = chain();
    let before = graph.clone();
    let err = graph
        .import_json(r#"[{"id": 1, "title": "Edit", "kind": "action", "branches": [7]}]"#)
        .unwrap_err();
    assert!(matches!(
        err,
        GraphError::DanglingReference {
            edge: studioflow::EdgeKind::Branch,
            ..
        }
    ));
    assert_eq!(graph, before);
}

#[test]
fn test_import_duplicate_ids_rejected() {
    let mut graph = WorkflowGraph::new();
    let err = graph
        .import_json(
            r#"[{"id": 3, "title": "a", "kind": "input"}, {"id": 3, "title": "b", "kind": "action"}]"#,
        )
        .unwrap_err();
    assert_eq!(err.offending_ids(), vec![id(3)]);
    assert!(graph.is_empty());
}

#[test]
fn test_add_then_delete_restores_graph() {
    for base in [WorkflowGraph::new(), chain(), production()] {
        let mut graph = base.clone();
        let existing = ids(&graph);

        let added = graph
            .insert_step(
                StepFields::new("Extra pass", StepKind::Action)
                    .with_dependencies(existing.first().copied())
                    .with_branches(existing.last().copied()),
                existing.len() / 2,
            )
            .unwrap();
        assert_ne!(graph, base);

        graph.delete_step(added).unwrap();
        assert_eq!(graph, base);
        assert_eq!(graph.export_graph(), base.export_graph());
    }
}

#[test]
fn test_export_import_round_trip() {
    for source in [WorkflowGraph::new(), chain(), production()] {
        let mut copy = WorkflowGraph::new();
        copy.import_graph(source.export_graph()).unwrap();
        assert_eq!(copy, source);

        let mut from_json = WorkflowGraph::new();
        from_json
            .import_json(&source.export_json().unwrap())
            .unwrap();
        assert_eq!(from_json, source);
    }
}

#[test]
fn test_delete_leaves_no_dangling_references() {
    let template = production();
    for victim in ids(&template) {
        let mut graph = template.clone();
        graph.delete_step(victim).unwrap();

        for step in graph.steps() {
            assert!(!step.depends_on().contains(&victim));
            assert!(!step.branches().contains(&victim));
        }
        graph.validate().unwrap();
        assert_respects_dependencies(&graph);
    }
}

#[test]
fn test_acyclic_orders_respect_dependencies() {
    assert_respects_dependencies(&chain());
    assert_respects_dependencies(&production());

    let mut shuffled = production();
    shuffled.reorder(5, 0).unwrap();
    shuffled.reorder(1, 4).unwrap();
    assert_respects_dependencies(&shuffled);
}

#[test]
fn test_ties_follow_display_position() {
    let graph = production();
    assert_eq!(
        order_ids(&graph),
        vec![id(1), id(2), id(3), id(4), id(5), id(6)]
    );

    let mut moved = production();
    // Music licence has no dependencies, so moving it to the front puts it first.
    moved.reorder(4, 0).unwrap();
    assert_eq!(
        order_ids(&moved),
        vec![id(5), id(1), id(2), id(3), id(4), id(6)]
    );
}

#[test]
fn test_reachable_branches_on_loop() {
    let mut graph = WorkflowGraph::new();
    graph
        .import_graph(vec![
            Step::new(1u64, "Draft", StepKind::Action).with_branches([2u64]),
            Step::new(2u64, "Review", StepKind::Approval).with_branches([1u64]),
        ])
        .unwrap();

    assert_eq!(
        graph.reachable_branches(id(1)).unwrap(),
        BTreeSet::from([id(1), id(2)])
    );
}

#[test]
fn test_reachable_branches_in_production_graph() {
    let graph = production();
    assert_eq!(
        graph.reachable_branches(id(6)).unwrap(),
        BTreeSet::from([id(2), id(4), id(6)])
    );
    assert_eq!(
        graph.reachable_branches(id(4)).unwrap(),
        BTreeSet::from([id(2)])
    );
}

#[test]
fn test_dependency_levels() {
    let levels = production().dependency_levels().unwrap();
    assert_eq!(
        levels,
        vec![
            vec![id(1), id(5)],
            vec![id(2), id(3)],
            vec![id(4)],
            vec![id(6)],
        ]
    );
}

#[test]
fn test_template_load_replaces_graph() {
    let mut graph = production();
    graph
        .load_template(&Template::builtin("editing").unwrap())
        .unwrap();

    assert_eq!(graph.len(), 7);
    assert_eq!(graph.root_steps().len(), 7);
    assert_eq!(graph.step_ids().next(), Some(id(1)));
    assert_eq!(
        graph
            .add_step(StepFields::new("Archive", StepKind::Action))
            .unwrap(),
        id(8)
    );
}

#[test]
fn test_config_limits_apply() {
    let mut graph = WorkflowGraph::with_config(GraphConfig {
        max_title_len: 10,
        first_id: 100,
        ..GraphConfig::default()
    });
    assert_eq!(
        graph
            .add_step(StepFields::new("Capture", StepKind::Action))
            .unwrap(),
        id(100)
    );
    assert!(matches!(
        graph.add_step(StepFields::new("Colour grading session", StepKind::Action)),
        Err(GraphError::TitleTooLong { max: 10, .. })
    ));
}

#[test]
fn test_ids_exhausted_after_importing_max_id() {
    let mut graph = WorkflowGraph::new();
    graph
        .import_json(r#"[{"id": 18446744073709551615, "title": "Archive", "kind": "action"}]"#)
        .unwrap();
    assert!(graph.contains(id(u64::MAX)));

    let err = graph
        .add_step(StepFields::new("Publish", StepKind::Action))
        .unwrap_err();
    assert!(matches!(err, GraphError::IdsExhausted));
    assert!(err.is_validation());
    assert_eq!(graph.len(), 1);
}

#[test]
fn test_template_ids_past_max_are_rejected() {
    let mut graph = WorkflowGraph::with_config(GraphConfig {
        first_id: u64::MAX,
        ..GraphConfig::default()
    });
    let review = Template::builtin("review").unwrap();
    assert!(matches!(
        graph.load_template(&review),
        Err(GraphError::IdsExhausted)
    ));
    assert!(graph.is_empty());
}
