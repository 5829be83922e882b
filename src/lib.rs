//! toml-cli library: get, set, add and remove values in TOML files.

#![deny(missing_docs)]

pub mod cli;
pub mod coerce;
pub mod commands;
pub mod document;
pub mod error;
pub mod json;
pub mod key_path;
pub mod logging;
