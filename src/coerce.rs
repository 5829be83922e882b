//! Conversion of raw command-line values into typed TOML values.

#![deny(missing_docs)]

use crate::error::{TomlCliError, TomlResult};
use crate::json::json_to_item;
use toml_edit::{Item, Value};

/// Words accepted as `true` by [`Coercion::Bool`], compared case-insensitively.
pub const TRUTHY: [&str; 4] = ["true", "yes", "y", "1"];

/// Requested conversion for a value given to `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coercion {
    /// Store the raw text as a string.
    #[default]
    Text,
    /// Parse as a 64-bit signed integer.
    Int,
    /// Parse as a float.
    Float,
    /// Map to a boolean by membership in [`TRUTHY`].
    Bool,
    /// Parse as JSON.
    Json,
}

/// A raw value with its coercion already applied.
#[derive(Debug, Clone)]
pub enum NewValue {
    /// A plain scalar.
    Scalar(Value),
    /// A parsed JSON document, shaped when its destination is known.
    Json(serde_json::Value),
}

impl Coercion {
    /// Apply the coercion to `raw`.
    pub fn apply(self, raw: &str) -> TomlResult<NewValue> {
        let scalar = match self {
            Coercion::Text => Value::from(raw),
            Coercion::Int => Value::from(parse_int(raw)?),
            Coercion::Float => Value::from(parse_float(raw)?),
            Coercion::Bool => Value::from(is_truthy(raw)),
            Coercion::Json => {
                let json =
                    serde_json::from_str(raw).map_err(|source| TomlCliError::JsonParse {
                        value: raw.to_string(),
                        source,
                    })?;
                return Ok(NewValue::Json(json));
            }
        };
        Ok(NewValue::Scalar(scalar))
    }
}

impl NewValue {
    /// Build the node to store. `standard` is true when the destination is a
    /// `[table]` section rather than an inline table.
    pub fn into_item(self, standard: bool) -> TomlResult<Item> {
        match self {
            NewValue::Scalar(v) => Ok(Item::Value(v)),
            NewValue::Json(j) => json_to_item(&j, standard),
        }
    }
}

/// True when `raw` is one of the [`TRUTHY`] words.
pub fn is_truthy(raw: &str) -> bool {
    TRUTHY.iter().any(|t| raw.eq_ignore_ascii_case(t))
}

fn parse_int(raw: &str) -> TomlResult<i64> {
    digits(raw)
        .parse::<i64>()
        .map_err(|e| coercion_error(raw, "integer", e.to_string()))
}

fn parse_float(raw: &str) -> TomlResult<f64> {
    digits(raw)
        .parse::<f64>()
        .map_err(|e| coercion_error(raw, "float", e.to_string()))
}

// Surrounding whitespace and `_` separators are tolerated, as in `1_000`.
fn digits(raw: &str) -> String {
    raw.trim().replace('_', "")
}

fn coercion_error(raw: &str, target: &'static str, reason: String) -> TomlCliError {
    TomlCliError::TypeCoercion {
        value: raw.to_string(),
        target,
        reason,
    }
}
