//! toml-cli binary.

#![deny(missing_docs)]

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use std::process::ExitCode;

use toml_cli::cli;
use toml_cli::commands;
use toml_cli::error::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE, TomlCliError};
use toml_cli::logging;

fn main() -> ExitCode {
    let args = match cli::Cli::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version land here too and are not failures.
            let _ = err.print();
            return exit_code(if err.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS });
        }
    };
    logging::init(args.verbose, args.quiet);

    match run(args) {
        Ok(()) => exit_code(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            let code = err
                .downcast_ref::<TomlCliError>()
                .map_or(EXIT_ERROR, TomlCliError::exit_code);
            exit_code(code)
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn run(args: cli::Cli) -> anyhow::Result<()> {
    // No subcommand: show help and succeed.
    let Some(command) = args.command else {
        cli::Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let name = command.name();
    if let Some(out) = commands::dispatch(command).with_context(|| format!("{name} failed"))? {
        println!("{out}");
    }
    Ok(())
}
