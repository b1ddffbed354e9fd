// src/constants.rs

//! Fixed names shared by the CLI and the process layer.

/// The name of the task file looked up in the working directory when none is given.
pub const DEFAULT_TASK_FILENAME: &str = "makefile";

/// Environment variable that overrides the task file name.
pub const TASK_FILE_ENV: &str = "MAKESHIFT_FILE";

/// Environment variable that overrides the working directory.
pub const DIRECTORY_ENV: &str = "MAKESHIFT_DIRECTORY";

/// The command interpreter used to run actions on non-Unix hosts.
pub const WINDOWS_SHELL: &str = "cmd.exe";

/// The interpreter flag that runs a single command and exits.
pub const WINDOWS_SHELL_RUN_FLAG: &str = "/C";
