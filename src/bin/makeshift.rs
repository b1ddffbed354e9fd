// src/bin/makeshift.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use makeshift::{
    cli::{Cli, TargetSelection},
    core::orchestrator::{self, BuildRequest},
    system::executor::{Platform, ShellRunner},
};

/// The main entry point of `makeshift`.
/// It sets up logging, parses arguments, runs the build and reports the first error.
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run_cli(cli) {
        // Status and errors share standard output; exactly one message per failed run.
        println!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let target = match cli.target_selection() {
        TargetSelection::FirstDeclared => None,
        TargetSelection::Named(task) => Some(task),
        TargetSelection::TooManyArguments(count) => {
            println!(
                "Too many arguments ({count}). Usage: makeshift [OPTIONS] [TASK]"
            );
            return Ok(());
        }
    };

    let request = BuildRequest {
        task_file: cli.task_file_path(),
        target,
    };

    let mut runner = ShellRunner::new(Platform::current());
    if let Some(dir) = &cli.directory {
        runner = runner.with_working_dir(dir);
    }

    let report = orchestrator::run_build(&request, &mut runner)?;
    println!(
        "{} \"{}\" is up to date ({} task(s) satisfied).",
        "Done:".green().bold(),
        report.root,
        report.satisfied.len()
    );
    Ok(())
}
