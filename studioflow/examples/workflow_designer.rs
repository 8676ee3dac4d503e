//! Workflow designer walkthrough
//!
//! Drives a `WorkflowStore` the way the designer UI would: load a preset,
//! wire dependencies, try an edit that would close a loop, then export.
//!
//! Run with:
//!   cargo run --example workflow_designer
//!   RUST_LOG=studioflow=debug cargo run --example workflow_designer

use studioflow::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();
}

fn print_order(graph: &WorkflowGraph) -> Result<(), CycleError> {
    let order = graph.topological_order()?;
    for (i, step) in order.iter().enumerate() {
        println!("  {:>2}. [{}] {} ({})", i + 1, step.id(), step.title(), step.kind());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut store = WorkflowStore::new();

    // =========================================================================
    // Preset
    // =========================================================================
    let outcome = store.apply(Intent::LoadTemplate {
        name: "photography".to_string(),
    })?;
    info!(?outcome, "template loaded");

    // Check-in -> preparation -> capture -> retouch -> approval -> check-out
    for (id, dependency) in [(2u64, 1u64), (3, 2), (4, 3), (5, 4), (6, 5)] {
        store.apply(Intent::Edit {
            id: StepId::new(id),
            patch: StepPatch::default().with_dependencies([dependency]),
        })?;
    }

    // Rejected approval sends the shot back to retouching
    store.apply(Intent::Edit {
        id: StepId::new(5),
        patch: StepPatch::default().with_branches([4u64]),
    })?;

    // =========================================================================
    // Rejected edit
    // =========================================================================
    let rejected = store.apply(Intent::Edit {
        id: StepId::new(1),
        patch: StepPatch::default().with_dependencies([6u64]),
    });
    if let Err(err) = rejected {
        warn!(error = %err, ids = ?err.offending_ids(), "edit rejected");
    }

    println!("\nExecution order (revision {}):", store.revision());
    print_order(store.graph())?;

    let rework = store.graph().reachable_branches(StepId::new(5))?;
    println!("\nBranch targets reachable from step 5: {rework:?}");

    println!("\nDependency levels:");
    for (level, ids) in store.graph().dependency_levels()?.iter().enumerate() {
        println!("  level {level}: {ids:?}");
    }

    println!("\nGraphviz:\n{}", store.graph().to_dot());

    // =========================================================================
    // Export / snapshot
    // =========================================================================
    if let Outcome::Exported(json) = store.apply(Intent::ExportRequested)? {
        println!("Export is {} bytes", json.len());
    }
    let snapshot = store.snapshot()?;
    info!(
        revision = snapshot.revision(),
        fingerprint = format!("{:016x}", snapshot.fingerprint()),
        steps = snapshot.steps().len(),
        "snapshot taken"
    );

    // =========================================================================
    // Suggestions
    // =========================================================================
    let suggester = KeywordSuggester::default().with_limit(3);
    let suggestions = suggester.suggest("retouch the product shot").await?;
    println!("\nSuggested tags:");
    for suggestion in suggestions {
        println!("  {} ({:.2})", suggestion.label, suggestion.confidence);
    }

    Ok(())
}
