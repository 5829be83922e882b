//! Error handling for toml-cli.

#![deny(missing_docs)]

use std::path::PathBuf;
use thiserror::Error;

/// Successful execution.
pub const EXIT_SUCCESS: i32 = 0;
/// Unclassified failure.
pub const EXIT_ERROR: i32 = 1;
/// Reserved for command-line usage errors reported by clap.
pub const EXIT_USAGE: i32 = 2;
/// A key path segment did not resolve.
pub const EXIT_KEY_NOT_FOUND: i32 = 3;
/// A raw value could not be converted to the requested type.
pub const EXIT_TYPE_COERCION: i32 = 4;
/// Malformed TOML document or malformed JSON value.
pub const EXIT_PARSE_ERROR: i32 = 5;
/// The file could not be read or written.
pub const EXIT_IO_ERROR: i32 = 6;
/// A scalar was found where a table or array was required.
pub const EXIT_NOT_A_TABLE: i32 = 7;

/// Errors raised while reading or editing a TOML document.
#[derive(Debug, Error)]
pub enum TomlCliError {
    /// Traversal hit an absent key or index.
    #[error("key not found: {key} (in {path})")]
    KeyNotFound {
        /// The segment that failed to resolve.
        key: String,
        /// The full key path being resolved.
        path: String,
    },

    /// A raw command-line value could not be converted.
    #[error("cannot convert {value:?} to {target}: {reason}")]
    TypeCoercion {
        /// The raw value.
        value: String,
        /// Name of the requested type.
        target: &'static str,
        /// Why the conversion failed.
        reason: String,
    },

    /// The document is not valid TOML.
    #[error("failed to parse {}: {source}", .file.display())]
    TomlParse {
        /// The file being parsed.
        file: PathBuf,
        /// Parser diagnostic.
        #[source]
        source: toml_edit::TomlError,
    },

    /// The value passed with `--to-json` is not valid JSON.
    #[error("invalid JSON value {value:?}: {source}")]
    JsonParse {
        /// The raw value.
        value: String,
        /// Parser diagnostic.
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the file failed.
    #[error("cannot {action} {}: {source}", .file.display())]
    Io {
        /// `read` or `write`.
        action: &'static str,
        /// The file involved.
        file: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Traversal or mutation reached a value that holds no keys.
    #[error("{key} is not a table (in {path})")]
    NotATable {
        /// The segment whose value is not a container.
        key: String,
        /// The full key path being resolved.
        path: String,
    },
}

impl TomlCliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            TomlCliError::KeyNotFound { .. } => EXIT_KEY_NOT_FOUND,
            TomlCliError::TypeCoercion { .. } => EXIT_TYPE_COERCION,
            TomlCliError::TomlParse { .. } | TomlCliError::JsonParse { .. } => EXIT_PARSE_ERROR,
            TomlCliError::Io { .. } => EXIT_IO_ERROR,
            TomlCliError::NotATable { .. } => EXIT_NOT_A_TABLE,
        }
    }
}

/// Result alias used across the library.
pub type TomlResult<T> = Result<T, TomlCliError>;
