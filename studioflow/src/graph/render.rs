//! Drawing support for the workflow designer
//!
//! The designer draws dependency connectors as solid lines and branch
//! connectors as dashed ones. [`WorkflowGraph::to_dot`] produces the same
//! picture as Graphviz text, built with petgraph.

use super::{StepKind, WorkflowGraph};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use std::collections::HashMap;
use std::fmt;

struct DotNode {
    label: String,
    kind: StepKind,
    conditional: bool,
}

impl fmt::Display for DotNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Connector {
    Dependency,
    Branch,
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connector::Dependency => f.write_str("depends"),
            Connector::Branch => f.write_str("branch"),
        }
    }
}

type DotGraph = DiGraph<DotNode, Connector>;

fn edge_attributes(_: &DotGraph, edge: EdgeReference<'_, Connector>) -> String {
    match edge.weight() {
        Connector::Branch => "style=dashed".to_string(),
        Connector::Dependency => String::new(),
    }
}

fn node_attributes(_: &DotGraph, (_, node): (NodeIndex, &DotNode)) -> String {
    let shape = match node.kind {
        StepKind::Input => "shape=box",
        StepKind::Action => "shape=ellipse",
        StepKind::Approval => "shape=diamond",
    };
    if node.conditional {
        format!("{shape} style=dashed")
    } else {
        shape.to_string()
    }
}

impl WorkflowGraph {
    /// Renders the graph as Graphviz DOT text
    ///
    /// Nodes are labelled `"{id}: {title}"`; approvals are diamonds and
    /// conditional steps are dashed. Dependency edges run from dependency to
    /// dependent; branch edges are dashed.
    ///
    /// ```ignore
    /// std::fs::write("workflow.dot", graph.to_dot())?;
    /// // dot -Tpng workflow.dot -o workflow.png
    /// ```
    pub fn to_dot(&self) -> String {
        let mut graph = DotGraph::new();
        let mut indices = HashMap::new();

        for step in self.steps() {
            let index = graph.add_node(DotNode {
                label: format!("{}: {}", step.id(), step.title()),
                kind: step.kind(),
                conditional: step.is_conditional(),
            });
            indices.insert(step.id(), index);
        }

        for step in self.steps() {
            let Some(&node) = indices.get(&step.id()) else {
                continue;
            };
            for dependency in step.depends_on() {
                if let Some(&source) = indices.get(dependency) {
                    graph.add_edge(source, node, Connector::Dependency);
                }
            }
            for branch in step.branches() {
                if let Some(&target) = indices.get(branch) {
                    graph.add_edge(node, target, Connector::Branch);
                }
            }
        }

        Dot::with_attr_getters(
            &graph,
            &[Config::EdgeNoLabel],
            &edge_attributes,
            &node_attributes,
        )
        .to_string()
    }
}
