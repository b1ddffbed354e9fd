//! # Build Orchestration
//!
//! Wires one run together: first pass, graph construction, cycle check,
//! second pass, execution. Structural validation always finishes before any
//! action text is read, and before anything is spawned.

use crate::{
    core::{action_loader, graph::TaskGraph, task_executor, task_store},
    system::executor::ActionRunner,
};
use anyhow::{Result, anyhow};
use log::info;
use std::path::PathBuf;

/// Everything one invocation needs to know.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Path of the task file, already resolved against the working directory.
    pub task_file: PathBuf,
    /// The requested task. `None` selects the first task declared in the file.
    pub target: Option<String>,
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// The task that was requested, or the implicit first one.
    pub root: String,
    /// Satisfied tasks, in the order they finished.
    pub satisfied: Vec<String>,
}

/// Runs the requested task and its transitive dependencies.
pub fn run_build(request: &BuildRequest, runner: &mut dyn ActionRunner) -> Result<BuildReport> {
    let path = request.task_file.as_path();

    // First pass: structure only.
    let mut store = task_store::load_task_store(path)?;
    let root = match &request.target {
        Some(target) => target.clone(),
        None => store
            .first_declared()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("File \"{}\" is empty.", path.display()))?,
    };
    info!("Requested task: '{}'", root);

    let mut graph = TaskGraph::build(&root, &store)?;
    graph.ensure_acyclic()?;

    // Second pass: actions for the tasks that will run.
    action_loader::load_actions(path, &graph, &mut store)?;

    let satisfied = task_executor::satisfy_task(&mut graph, &store, runner)?;
    Ok(BuildReport { root, satisfied })
}
