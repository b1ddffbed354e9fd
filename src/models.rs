// src/models.rs

//! Data shared by the task file passes, the graph and the executor.

use std::collections::HashMap;

// --- TASK FILE MODELS ---
// What the parser and the two file passes produce.

/// One `<name>: <deps...>` line, as parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDeclaration {
    /// The task name before the colon.
    pub name: String,
    /// Dependency names in declared order. This order is the visiting order.
    pub dependency_names: Vec<String>,
}

/// The stored description of a declared task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEntry {
    /// Dependency names in declared order.
    pub dependency_names: Vec<String>,
    /// Filled by the action loader, and only for tasks reachable from the root.
    pub actions: Vec<String>,
}

/// Every task declared in the task file, keyed by name.
#[derive(Debug, Default)]
pub struct TaskStore {
    entries: HashMap<String, TaskEntry>,
    declaration_order: Vec<String>,
}

impl TaskStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a declaration. Returns the declaration back if the name is already taken.
    pub fn insert(&mut self, declaration: TaskDeclaration) -> Result<(), TaskDeclaration> {
        if self.entries.contains_key(&declaration.name) {
            return Err(declaration);
        }
        self.declaration_order.push(declaration.name.clone());
        self.entries.insert(
            declaration.name,
            TaskEntry {
                dependency_names: declaration.dependency_names,
                actions: Vec::new(),
            },
        );
        Ok(())
    }

    /// The entry declared under `name`.
    pub fn get(&self, name: &str) -> Option<&TaskEntry> {
        self.entries.get(name)
    }

    /// Whether `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Attaches the action lines of a task. Returns `false` if the task is unknown.
    pub fn set_actions(&mut self, name: &str, actions: Vec<String>) -> bool {
        match self.entries.get_mut(name) {
            Some(entry) => {
                entry.actions = actions;
                true
            }
            None => false,
        }
    }

    /// The actions of `name`; empty for unknown tasks and tasks without actions.
    pub fn actions(&self, name: &str) -> &[String] {
        self.entries
            .get(name)
            .map(|entry| entry.actions.as_slice())
            .unwrap_or_default()
    }

    /// The first task declared in the file, used when no target is requested.
    pub fn first_declared(&self) -> Option<&str> {
        self.declaration_order.first().map(String::as_str)
    }

    /// Number of declared tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no task is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// --- DEPENDENCY GRAPH MODELS ---

/// Stable index of a node inside a `TaskGraph` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Three-colour marking used by the cycle detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitState {
    /// Not reached yet.
    #[default]
    Unvisited,
    /// On the current depth-first path.
    InProgress,
    /// Fully explored, no cycle through it.
    Done,
}

/// One task in the dependency graph. Children are shared by id, so a task
/// reached through several parents is still a single node.
#[derive(Debug, Clone)]
pub struct GraphNode {
    /// Task name.
    pub name: String,
    /// Dependencies, in declared order.
    pub children: Vec<NodeId>,
    /// Cycle-detection mark.
    pub visit_state: VisitState,
    /// Set once the task and all its dependencies have run.
    pub satisfied: bool,
}

impl GraphNode {
    /// A fresh, unvisited and unsatisfied node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            visit_state: VisitState::Unvisited,
            satisfied: false,
        }
    }
}
