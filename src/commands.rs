//! Command dispatch for toml-cli.

#![deny(missing_docs)]

use crate::cli::Commands;
use crate::document::TomlFile;
use crate::error::TomlResult;
use crate::key_path::{IndexPolicy, KeyPath};
use tracing::debug;

/// Run one command against its file. Returns text destined for stdout.
pub fn dispatch(command: Commands) -> TomlResult<Option<String>> {
    debug!(command = command.name(), "dispatching");
    match command {
        Commands::Get { key, file } => {
            let path = KeyPath::from_words(&key, IndexPolicy::KeysOnly);
            let doc = TomlFile::load(&file.toml_path)?;
            Ok(Some(doc.get(&path)?.to_string()))
        }
        Commands::Set {
            value,
            key,
            file,
            coercion,
        } => {
            let path = KeyPath::from_words(&key, IndexPolicy::IntermediateIndices);
            let mut doc = TomlFile::load(&file.toml_path)?;
            doc.set(&path, &value, coercion.coercion())?;
            doc.save()?;
            Ok(None)
        }
        Commands::AddSection { key, file } => {
            let path = KeyPath::from_dotted(&key);
            let mut doc = TomlFile::load(&file.toml_path)?;
            doc.add_section(&path)?;
            doc.save()?;
            Ok(None)
        }
        Commands::Unset { key, file } => {
            let path = KeyPath::from_words(&key, IndexPolicy::KeysOnly);
            let mut doc = TomlFile::load(&file.toml_path)?;
            doc.unset(&path)?;
            doc.save()?;
            Ok(None)
        }
    }
}
