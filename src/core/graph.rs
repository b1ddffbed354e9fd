//! # Dependency Graph
//!
//! Materializes the transitive closure of the requested task as an arena of
//! [`GraphNode`]s. Every distinct task name gets exactly one node; a task that
//! several others depend on is shared by id, so a diamond still runs it once.
//!
//! The graph may contain cycles right after [`TaskGraph::build`]. It must pass
//! [`TaskGraph::ensure_acyclic`] before anything is executed.

use crate::models::{GraphNode, NodeId, TaskStore, VisitState};
use log::{debug, trace};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

/// Structural errors found while building or validating the graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The root or a dependency names a task that is not declared.
    #[error("No declaration for task \"{0}\" found.")]
    UndeclaredTask(String),
    #[error(
        "Cannot determine the order of execution: circular dependency found ({}).",
        .cycle.join(" -> ")
    )]
    /// The graph reachable from the root contains a cycle.
    CircularDependency {
        /// Task names along the cycle, first and last being the same.
        cycle: Vec<String>,
    },
}

/// The tasks reachable from one root, stored as an arena indexed by [`NodeId`].
#[derive(Debug)]
pub struct TaskGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<String, NodeId>,
    root: NodeId,
}

impl TaskGraph {
    /// Builds the graph reachable from `root_name`, breadth-first.
    pub fn build(root_name: &str, store: &TaskStore) -> Result<Self, GraphError> {
        if !store.contains(root_name) {
            return Err(GraphError::UndeclaredTask(root_name.to_string()));
        }

        let mut graph = Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            root: NodeId(0),
        };
        graph.root = graph.add_node(root_name);

        let mut pending = VecDeque::from([graph.root]);
        while let Some(current) = pending.pop_front() {
            let name = graph.node(current).name.clone();
            let entry = store
                .get(&name)
                .ok_or_else(|| GraphError::UndeclaredTask(name.clone()))?;

            let mut children = Vec::with_capacity(entry.dependency_names.len());
            for dependency in &entry.dependency_names {
                let child = match graph.index.get(dependency) {
                    Some(&existing) => existing,
                    None => {
                        if !store.contains(dependency) {
                            return Err(GraphError::UndeclaredTask(dependency.clone()));
                        }
                        let created = graph.add_node(dependency);
                        pending.push_back(created);
                        created
                    }
                };
                children.push(child);
            }
            trace!("Node '{}' has {} child(ren)", name, children.len());
            graph.node_mut(current).children = children;
        }

        debug!(
            "Dependency graph for '{}' has {} node(s)",
            root_name,
            graph.len()
        );
        Ok(graph)
    }

    fn add_node(&mut self, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(GraphNode::new(name));
        self.index.insert(name.to_string(), id);
        id
    }

    /// The requested task.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether `name` is reachable from the root.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The node id of `name`, if it is reachable from the root.
    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// The node behind `id`.
    ///
    /// Ids are only handed out by this graph, so every lookup hits.
    #[allow(clippy::indexing_slicing)]
    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.0]
    }

    /// Mutable access to the node behind `id`.
    #[allow(clippy::indexing_slicing)]
    pub fn node_mut(&mut self, id: NodeId) -> &mut GraphNode {
        &mut self.nodes[id.0]
    }

    // --- Cycle detection ---

    /// Three-colour depth-first search from the root, using an explicit stack.
    ///
    /// On failure the error lists the cycle, starting and ending at the same task.
    pub fn ensure_acyclic(&mut self) -> Result<(), GraphError> {
        // Each frame is a node and the index of the next child to look at.
        let mut stack: Vec<(NodeId, usize)> = Vec::new();
        let root = self.root;
        if self.node(root).visit_state == VisitState::Unvisited {
            self.node_mut(root).visit_state = VisitState::InProgress;
            stack.push((root, 0));
        }

        while let Some(frame) = stack.last_mut() {
            let (current, next_child) = *frame;
            let Some(&child) = self.node(current).children.get(next_child) else {
                self.node_mut(current).visit_state = VisitState::Done;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match self.node(child).visit_state {
                VisitState::Done => {}
                VisitState::InProgress => {
                    let cycle = self.cycle_path(&stack, child);
                    debug!("Cycle detected: {}", cycle.join(" -> "));
                    return Err(GraphError::CircularDependency { cycle });
                }
                VisitState::Unvisited => {
                    self.node_mut(child).visit_state = VisitState::InProgress;
                    stack.push((child, 0));
                }
            }
        }
        Ok(())
    }

    /// The in-progress part of the stack from `back_edge_target` upwards, closed on itself.
    fn cycle_path(&self, stack: &[(NodeId, usize)], back_edge_target: NodeId) -> Vec<String> {
        let start = stack
            .iter()
            .position(|&(id, _)| id == back_edge_target)
            .unwrap_or_default();
        stack
            .iter()
            .skip(start)
            .map(|&(id, _)| id)
            .chain(std::iter::once(back_edge_target))
            .map(|id| self.node(id).name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskDeclaration;

    fn store(decls: &[(&str, &[&str])]) -> TaskStore {
        let mut store = TaskStore::new();
        for (name, deps) in decls {
            store
                .insert(TaskDeclaration {
                    name: name.to_string(),
                    dependency_names: deps.iter().map(|d| d.to_string()).collect(),
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn test_diamond_shares_one_node() {
        let store = store(&[("A", &["B", "C"]), ("B", &["D"]), ("C", &["D"]), ("D", &[])]);
        let mut graph = TaskGraph::build("A", &store).unwrap();
        assert_eq!(graph.len(), 4);

        let b = graph.id_of("B").unwrap();
        let c = graph.id_of("C").unwrap();
        assert_eq!(graph.node(b).children, graph.node(c).children);
        assert!(graph.ensure_acyclic().is_ok());
    }

    #[test]
    fn test_only_reachable_tasks_are_materialized() {
        let store = store(&[("A", &["B"]), ("B", &[]), ("unused", &["A"])]);
        let graph = TaskGraph::build("A", &store).unwrap();
        assert_eq!(graph.len(), 2);
        assert!(!graph.contains("unused"));
    }

    #[test]
    fn test_children_keep_declared_order() {
        let store = store(&[("all", &["z", "a", "m"]), ("z", &[]), ("a", &[]), ("m", &[])]);
        let graph = TaskGraph::build("all", &store).unwrap();
        let names: Vec<_> = graph
            .node(graph.root())
            .children
            .iter()
            .map(|&id| graph.node(id).name.as_str())
            .collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_undeclared_root() {
        let store = store(&[("A", &[])]);
        let err = TaskGraph::build("missing", &store).unwrap_err();
        assert_eq!(err, GraphError::UndeclaredTask("missing".to_string()));
    }

    #[test]
    fn test_undeclared_dependency_is_named() {
        let store = store(&[("A", &["B"]), ("B", &["X"])]);
        let err = TaskGraph::build("A", &store).unwrap_err();
        assert_eq!(err, GraphError::UndeclaredTask("X".to_string()));
        assert!(err.to_string().contains("\"X\""));
    }

    #[test]
    fn test_direct_cycle() {
        let store = store(&[("A", &["B"]), ("B", &["A"])]);
        let mut graph = TaskGraph::build("A", &store).unwrap();
        let err = graph.ensure_acyclic().unwrap_err();
        assert_eq!(
            err,
            GraphError::CircularDependency {
                cycle: vec!["A".to_string(), "B".to_string(), "A".to_string()]
            }
        );
        assert!(err.to_string().contains("circular dependency"));
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let store = store(&[("A", &["A"])]);
        let mut graph = TaskGraph::build("A", &store).unwrap();
        assert!(matches!(
            graph.ensure_acyclic(),
            Err(GraphError::CircularDependency { cycle }) if cycle == ["A", "A"]
        ));
    }

    #[test]
    fn test_cycle_below_the_root_reports_only_the_loop() {
        let store = store(&[("top", &["x"]), ("x", &["y"]), ("y", &["z"]), ("z", &["x"])]);
        let mut graph = TaskGraph::build("top", &store).unwrap();
        let err = graph.ensure_acyclic().unwrap_err();
        assert_eq!(
            err,
            GraphError::CircularDependency {
                cycle: ["x", "y", "z", "x"].iter().map(|s| s.to_string()).collect()
            }
        );
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let names: Vec<String> = (0..100_000).map(|i| format!("t{i}")).collect();
        let mut store = TaskStore::new();
        for (i, name) in names.iter().enumerate() {
            let dependency_names = names.get(i + 1).cloned().into_iter().collect();
            store
                .insert(TaskDeclaration {
                    name: name.clone(),
                    dependency_names,
                })
                .unwrap();
        }
        let mut graph = TaskGraph::build("t0", &store).unwrap();
        assert_eq!(graph.len(), 100_000);
        assert!(graph.ensure_acyclic().is_ok());
    }
}
