// src/lib.rs

//! `rund`: a DAG task scheduler.
//!
//! Register [`operator::Operator`]s as named nodes, declare which nodes must
//! finish before others start, and [`Rund::run`] executes everything in
//! parallel topological order, failing fast on the first error.

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod operator;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

pub use crate::engine::{NodeName, RunReport, Rund};
pub use crate::errors::RundError;
pub use crate::operator::{CmdOperator, FnOperator, NoopOperator, Operator};
pub use crate::types::RunStatus;

use crate::cli::CliArgs;
use crate::config::{default_graph_path, load_graph};

/// High-level entry point used by `main.rs`.
///
/// Loads the graph file, then either prints it (`--dry-run`, `--dot`) or
/// runs it to completion.
pub async fn run(args: CliArgs) -> Result<()> {
    let graph_path = args.graph.unwrap_or_else(default_graph_path);
    let rund = load_graph(&graph_path)?;
    debug!(path = %graph_path.display(), nodes = rund.graph().len(), "graph loaded");

    if args.dot {
        print!("{}", rund.to_dot());
        return Ok(());
    }

    if args.dry_run {
        print_dry_run(&rund)?;
        return Ok(());
    }

    let report = rund.run().await;
    info!(status = %report.status, completed = report.completed.len(), "rund finished");
    report.into_result()?;
    Ok(())
}

/// Dry-run output: the canonical order plus each node's direct successors.
fn print_dry_run(rund: &Rund) -> Result<()> {
    let order = rund.deterministic_order()?;

    println!("rund dry-run");
    println!("nodes ({}):", order.len());
    for (i, name) in order.iter().enumerate() {
        println!("  {:>3}. {name}", i + 1);
        let successors = rund.graph().successors_of(name);
        if !successors.is_empty() {
            println!("       then: {:?}", successors);
        }
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
