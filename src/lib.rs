//! makeshift: run a task from a `makefile`-like task file, together with its
//! transitive dependencies, each exactly once and in dependency order.

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
