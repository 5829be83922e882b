//! Diagnostic output for toml-cli.

#![deny(missing_docs)]

use std::io::IsTerminal;
use tracing::level_filters::LevelFilter;

/// Map the `-v`/`-q` flags to a level filter. Warnings show by default.
pub fn level_filter(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber. Output goes to stderr; stdout carries
/// command results only.
pub fn init(verbose: u8, quiet: bool) {
    tracing_subscriber::fmt()
        .with_max_level(level_filter(verbose, quiet))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}
