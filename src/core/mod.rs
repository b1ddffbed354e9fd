// src/core/mod.rs

//! Build logic, from reading the task file to running the actions.

pub mod action_loader;
pub mod graph;
pub mod line_cursor;
pub mod orchestrator;
pub mod parser;
/// Post-order execution of a validated graph.
pub mod task_executor;
pub mod task_store;
