//! CLI argument parser for toml-cli.

#![deny(missing_docs)]

use crate::coerce::Coercion;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Read and edit TOML configuration files.
#[derive(Parser, Debug)]
#[command(
    name = "toml",
    version,
    about = "Read and edit TOML configuration files",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Set verbosity level: -v=1, -v=2, -v=3
    #[arg(
        short = 'v',
        long = "verbose",
        value_name = "LEVEL",
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=3),
        global = true
    )]
    pub verbose: u8,

    /// Silence all diagnostics (overrides -v).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run. Help is printed when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Location of the document to operate on.
#[derive(Args, Debug, Clone)]
pub struct TomlPathArg {
    /// TOML file to read and rewrite.
    #[arg(long, value_name = "PATH", default_value = "config.toml")]
    pub toml_path: PathBuf,
}

/// Type conversion applied by `set`. At most one may be given.
#[derive(Args, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct CoercionArgs {
    /// Store the value as an integer.
    #[arg(long)]
    pub to_int: bool,

    /// Store the value as a float.
    #[arg(long)]
    pub to_float: bool,

    /// Store the value as a boolean (true, yes, y, 1 are true).
    #[arg(long)]
    pub to_bool: bool,

    /// Parse the value as JSON.
    #[arg(long)]
    pub to_json: bool,
}

impl CoercionArgs {
    /// The single conversion selected by the flags.
    pub fn coercion(&self) -> Coercion {
        if self.to_int {
            Coercion::Int
        } else if self.to_float {
            Coercion::Float
        } else if self.to_bool {
            Coercion::Bool
        } else if self.to_json {
            Coercion::Json
        } else {
            Coercion::Text
        }
    }
}

/// Top-level subcommands supported by the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Get a value from a toml file
    Get {
        /// Key path, one segment per argument. Empty prints the whole file.
        key: Vec<String>,

        /// Document location.
        #[command(flatten)]
        file: TomlPathArg,
    },

    /// Set a value to a toml file
    Set {
        /// Value to store.
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Key path, one segment per argument.
        #[arg(required = true)]
        key: Vec<String>,

        /// Document location.
        #[command(flatten)]
        file: TomlPathArg,

        /// Type conversion for `value`.
        #[command(flatten)]
        coercion: CoercionArgs,
    },

    /// Add a section with the given key
    #[command(name = "add_section", alias = "add-section")]
    AddSection {
        /// Dotted section name, e.g. `address.work`.
        key: String,

        /// Document location.
        #[command(flatten)]
        file: TomlPathArg,
    },

    /// Unset a value from a toml file
    Unset {
        /// Key path, one segment per argument.
        #[arg(required = true)]
        key: Vec<String>,

        /// Document location.
        #[command(flatten)]
        file: TomlPathArg,
    },
}

impl Commands {
    /// Name the command is invoked by.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Get { .. } => "get",
            Commands::Set { .. } => "set",
            Commands::AddSection { .. } => "add_section",
            Commands::Unset { .. } => "unset",
        }
    }
}
