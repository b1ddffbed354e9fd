//! # Task Store (first pass)
//!
//! Reads every declaration in the task file and records its dependencies.
//! Action blocks are skipped here; they are only read later, by the action
//! loader, for the tasks that will actually run.

use crate::{
    core::{
        line_cursor::LineCursor,
        parser::{self, ParseError},
    },
    models::TaskStore,
};
use log::{debug, trace};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, ErrorKind},
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors raised while scanning the task file, in either pass.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The task file does not exist.
    #[error("File \"{}\" doesn't exist.", path.display())]
    FileNotFound {
        /// Path of the task file.
        path: PathBuf,
    },
    /// The task file has no declarations.
    #[error("File \"{}\" is empty.", path.display())]
    EmptyFile {
        /// Path of the task file.
        path: PathBuf,
    },
    /// Opening or reading the task file failed.
    #[error("I/O error while reading \"{}\": {source}", path.display())]
    Io {
        /// Path of the task file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A task name is declared twice.
    #[error("Task \"{name}\" declaration occurs more than one time (line {line_number}).")]
    DuplicateTask {
        /// The repeated task name.
        name: String,
        /// 1-based line number of the second declaration.
        line_number: usize,
    },
    /// A declaration line does not follow the grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Opens the task file for one pass. The file is closed when the cursor is dropped.
pub fn open_task_file(path: &Path) -> Result<LineCursor<BufReader<File>>, ScanError> {
    match File::open(path) {
        Ok(file) => Ok(LineCursor::new(BufReader::new(file))),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ScanError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(ScanError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Runs the first pass over the task file at `path`.
pub fn load_task_store(path: &Path) -> Result<TaskStore, ScanError> {
    debug!("Scanning declarations in '{}'", path.display());
    let mut cursor = open_task_file(path)?;
    scan_declarations(&mut cursor, path)
}

/// Builds the [`TaskStore`] from every declaration read through `cursor`.
///
/// `origin` is only used in error messages.
pub fn scan_declarations<R: BufRead>(
    cursor: &mut LineCursor<R>,
    origin: &Path,
) -> Result<TaskStore, ScanError> {
    let io_error = |source| ScanError::Io {
        path: origin.to_path_buf(),
        source,
    };

    let mut store = TaskStore::new();
    while let Some(line) = cursor.next_non_blank().map_err(io_error)? {
        let line_number = cursor.line_number();
        let declaration =
            parser::parse_declaration(&line).map_err(|e| e.at_line(line_number))?;
        trace!(
            "Line {}: task '{}' depends on {:?}",
            line_number, declaration.name, declaration.dependency_names
        );

        store
            .insert(declaration)
            .map_err(|duplicate| ScanError::DuplicateTask {
                name: duplicate.name,
                line_number,
            })?;

        cursor.take_action_block(false).map_err(io_error)?;
    }

    if store.is_empty() {
        return Err(ScanError::EmptyFile {
            path: origin.to_path_buf(),
        });
    }

    debug!("Found {} task declaration(s)", store.len());
    Ok(store)
}
