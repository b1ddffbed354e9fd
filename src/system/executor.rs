// src/system/executor.rs

//! Turns action lines into processes and their exit status into results.

use crate::constants::{WINDOWS_SHELL, WINDOWS_SHELL_RUN_FLAG};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Output, Stdio};
use thiserror::Error;

/// Errors raised while running a single action.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The process ran and exited unsuccessfully.
    #[error("Executing of \"{action}\" ended up with non-zero return value ({}).", describe_exit(.code))]
    NonZeroExitStatus {
        /// The action text, verbatim.
        action: String,
        /// Exit code, or `None` when a signal ended the process.
        code: Option<i32>,
    },
    /// The process could not be started.
    #[error("OS error while executing \"{action}\": {source}.")]
    LaunchFailed {
        /// The action text, verbatim.
        action: String,
        /// The error reported by the OS.
        #[source]
        source: io::Error,
    },
    /// The captured output could not be written to our standard output.
    #[error("Could not forward the output of \"{action}\": {source}")]
    ForwardOutput {
        /// The action text, verbatim.
        action: String,
        /// The write error.
        #[source]
        source: io::Error,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by a signal".to_string(),
    }
}

/// How an action line is turned into a process on the current host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// The action is split into a program and its arguments and run directly.
    Unix,
    /// Any other host: the action is handed to `cmd.exe /C`.
    Windows,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(unix) { Self::Unix } else { Self::Windows }
    }
}

/// Runs a single action and reports whether it succeeded.
///
/// The task executor only talks to this trait, which keeps process spawning
/// out of its ordering logic.
pub trait ActionRunner {
    /// Runs `action` to completion.
    fn run_action(&mut self, action: &str) -> Result<(), ExecutionError>;
}

/// Splits an action at its first space into the program and the raw argument string.
///
/// The argument string keeps its leading space. Without a space the whole
/// action is the program and the arguments are empty.
pub fn split_action(action: &str) -> (&str, &str) {
    match action.find(' ') {
        Some(at) => action.split_at(at),
        None => (action, ""),
    }
}

/// Splits a raw argument string into argv words.
///
/// Words are separated by whitespace and a double-quoted run groups a word,
/// the quotes themselves being dropped. Every other character is kept as is:
/// there are no comments, no escapes and no single-quote grouping. A double
/// quote left open runs to the end of the string.
pub fn split_arguments(raw_args: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in raw_args.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            c => {
                word.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(word);
    }
    words
}

/// Builds the process for `action` without spawning it.
pub fn build_command(action: &str, platform: Platform) -> StdCommand {
    match platform {
        Platform::Unix => {
            let (program, raw_args) = split_action(action);
            let mut command = StdCommand::new(program);
            command.args(split_arguments(raw_args));
            command
        }
        Platform::Windows => {
            let mut command = StdCommand::new(WINDOWS_SHELL);
            command.arg(WINDOWS_SHELL_RUN_FLAG);
            pass_to_interpreter(&mut command, action);
            command
        }
    }
}

#[cfg(windows)]
fn pass_to_interpreter(command: &mut StdCommand, action: &str) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    // cmd.exe parses its own command line; re-quoting would change the action.
    command.raw_arg(action).creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn pass_to_interpreter(command: &mut StdCommand, action: &str) {
    command.arg(action);
}

/// Spawns one process per action, waits for it, then forwards its captured
/// stdout and stderr (in that order) to our own standard output.
#[derive(Debug)]
pub struct ShellRunner {
    platform: Platform,
    working_dir: Option<PathBuf>,
}

impl ShellRunner {
    /// A runner using the inherited working directory.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            working_dir: None,
        }
    }

    /// Runs every action inside `dir` instead of the inherited working directory.
    pub fn with_working_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dunce::simplified(dir).to_path_buf());
        self
    }

    fn forward(action: &str, output: &Output) -> Result<(), ExecutionError> {
        let forward_error = |source| ExecutionError::ForwardOutput {
            action: action.to_string(),
            source,
        };
        let mut stdout = io::stdout().lock();
        stdout.write_all(&output.stdout).map_err(forward_error)?;
        stdout.write_all(&output.stderr).map_err(forward_error)?;
        stdout.flush().map_err(forward_error)
    }
}

impl ActionRunner for ShellRunner {
    fn run_action(&mut self, action: &str) -> Result<(), ExecutionError> {
        let mut command = build_command(action, self.platform);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        log::debug!("Spawning {:?}", command);
        let output = command.output().map_err(|e| ExecutionError::LaunchFailed {
            action: action.to_string(),
            source: e,
        })?;
        log::trace!("'{}' finished with {}", action, output.status);

        Self::forward(action, &output)?;

        if !output.status.success() {
            return Err(ExecutionError::NonZeroExitStatus {
                action: action.to_string(),
                code: output.status.code(),
            });
        }
        Ok(())
    }
}
