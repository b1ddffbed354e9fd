use crate::{
    core::graph::TaskGraph,
    models::{NodeId, TaskStore},
    system::executor::{ActionRunner, ExecutionError},
};
use colored::*;

// --- Main Public Function ---

/// Satisfies the root of a validated `graph`: every dependency first, in
/// declared order, then the task's own actions. Each node runs at most once.
///
/// Stops at the first failing action. The failing task is left unsatisfied and
/// nothing else is started afterwards.
///
/// Returns the names of the tasks satisfied by this call, in the order they finished.
pub fn satisfy_task(
    graph: &mut TaskGraph,
    store: &TaskStore,
    runner: &mut dyn ActionRunner,
) -> Result<Vec<String>, ExecutionError> {
    let mut finished = Vec::new();
    let root = graph.root();
    if graph.node(root).satisfied {
        return Ok(finished);
    }

    announce_started(&graph.node(root).name);
    // Each frame is a node and the index of the next child to check.
    let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];

    while let Some(frame) = stack.last_mut() {
        let (current, next_child) = *frame;

        if let Some(&child) = graph.node(current).children.get(next_child) {
            frame.1 += 1;
            if !graph.node(child).satisfied {
                announce_started(&graph.node(child).name);
                stack.push((child, 0));
            }
            continue;
        }

        // All children are satisfied: run this task's own actions.
        let name = graph.node(current).name.clone();
        execute_actions(&name, store.actions(&name), runner)?;
        graph.node_mut(current).satisfied = true;
        announce_finished(&name);
        finished.push(name);
        stack.pop();
    }

    Ok(finished)
}

// --- Execution Helpers ---

fn execute_actions(
    task_name: &str,
    actions: &[String],
    runner: &mut dyn ActionRunner,
) -> Result<(), ExecutionError> {
    for action in actions {
        log::debug!("[{}] {}", task_name, action);
        runner.run_action(action)?;
    }
    Ok(())
}

fn announce_started(name: &str) {
    println!("\"{}\" task is started.", name.bold());
}

fn announce_finished(name: &str) {
    println!("{} \"{}\" task is finished.", "✓".green(), name.bold());
}
