// src/cli.rs

//! Command-line definition.

use crate::constants::{DEFAULT_TASK_FILENAME, DIRECTORY_ENV, TASK_FILE_ENV};
use clap::Parser;
use std::path::PathBuf;

/// makeshift: run a task and everything it depends on, exactly once, in order.
///
/// Tasks are read from a task file (`makefile` by default). Each task is a
/// `name: dependencies...` line followed by indented action lines:
///
/// ```text
/// build: compile test
///     echo building
/// ```
///
/// Without a TASK, the first task declared in the file is run.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The task to run.
    ///
    /// At most one task may be given. Extra arguments are collected here so the
    /// usage complaint can be printed instead of a parser error.
    #[arg(value_name = "TASK")]
    pub tasks: Vec<String>,

    /// The task file to read.
    #[arg(short, long, env = TASK_FILE_ENV, default_value = DEFAULT_TASK_FILENAME)]
    pub file: PathBuf,

    /// Resolve the task file against, and run every action in, this directory.
    #[arg(short = 'C', long, env = DIRECTORY_ENV)]
    pub directory: Option<PathBuf>,

    /// Print diagnostic logging (equivalent to `RUST_LOG=debug`).
    #[arg(short, long)]
    pub verbose: bool,
}

/// What the positional arguments ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelection {
    /// No task given: run the first declared task.
    FirstDeclared,
    /// Run this task.
    Named(String),
    /// More than one task given.
    TooManyArguments(usize),
}

impl Cli {
    /// Interprets the positional arguments.
    pub fn target_selection(&self) -> TargetSelection {
        match self.tasks.as_slice() {
            [] => TargetSelection::FirstDeclared,
            [task] => TargetSelection::Named(task.clone()),
            more => TargetSelection::TooManyArguments(more.len()),
        }
    }

    /// The task file path, resolved against `--directory` when one is given.
    pub fn task_file_path(&self) -> PathBuf {
        match &self.directory {
            Some(dir) => dunce::simplified(&dir.join(&self.file)).to_path_buf(),
            None => self.file.clone(),
        }
    }
}
