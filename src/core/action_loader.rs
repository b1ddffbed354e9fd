// src/core/action_loader.rs

//! Second pass over the task file: attaches action blocks to the tasks that
//! are part of the validated dependency graph and skips all the others.

use crate::{
    core::{
        graph::TaskGraph,
        line_cursor::LineCursor,
        parser,
        task_store::{self, ScanError},
    },
    models::TaskStore,
};
use log::{debug, trace};
use std::{io::BufRead, path::Path};

/// Re-reads the task file at `path` and stores the actions of every task in `graph`.
pub fn load_actions(path: &Path, graph: &TaskGraph, store: &mut TaskStore) -> Result<(), ScanError> {
    debug!("Reading actions from '{}'", path.display());
    let mut cursor = task_store::open_task_file(path)?;
    let attached = attach_actions(&mut cursor, path, graph, store)?;
    debug!("Attached actions to {} task(s)", attached);
    Ok(())
}

/// Returns how many action blocks were attached.
pub fn attach_actions<R: BufRead>(
    cursor: &mut LineCursor<R>,
    origin: &Path,
    graph: &TaskGraph,
    store: &mut TaskStore,
) -> Result<usize, ScanError> {
    let io_error = |source| ScanError::Io {
        path: origin.to_path_buf(),
        source,
    };

    let mut attached = 0;
    while let Some(line) = cursor.next_non_blank().map_err(io_error)? {
        let line_number = cursor.line_number();
        let declaration =
            parser::parse_declaration(&line).map_err(|e| e.at_line(line_number))?;

        let wanted = graph.contains(&declaration.name);
        let actions = cursor.take_action_block(wanted).map_err(io_error)?;
        if wanted {
            trace!("Task '{}' has {} action(s)", declaration.name, actions.len());
            store.set_actions(&declaration.name, actions);
            attached += 1;
        }
    }
    Ok(attached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::task_store::scan_declarations;
    use std::io::Cursor;

    const TASKS: &str = "\
all: lib
    echo linking
\techo done

lib:
  cc -c lib.c
unused:
  rm -rf /
";

    fn cursor(text: &str) -> LineCursor<Cursor<Vec<u8>>> {
        LineCursor::new(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn test_actions_are_attached_only_to_graph_tasks() {
        let origin = Path::new("makefile");
        let mut store = scan_declarations(&mut cursor(TASKS), origin).unwrap();
        let graph = TaskGraph::build("all", &store).unwrap();

        let attached = attach_actions(&mut cursor(TASKS), origin, &graph, &mut store).unwrap();
        assert_eq!(attached, 2);
        assert_eq!(store.actions("all"), ["echo linking", "echo done"]);
        assert_eq!(store.actions("lib"), ["cc -c lib.c"]);
        assert!(store.actions("unused").is_empty());
    }

    #[test]
    fn test_task_without_actions() {
        let origin = Path::new("makefile");
        let text = "setup: \nbuild: setup\n  echo build\n";
        let mut store = scan_declarations(&mut cursor(text), origin).unwrap();
        let graph = TaskGraph::build("build", &store).unwrap();

        attach_actions(&mut cursor(text), origin, &graph, &mut store).unwrap();
        assert!(store.actions("setup").is_empty());
        assert_eq!(store.actions("build"), ["echo build"]);
    }
}
