//! Conversions between `toml_edit` nodes and JSON values.

#![deny(missing_docs)]

use crate::error::{TomlCliError, TomlResult};
use serde_json::{Map, Number, Value as Json};
use toml_edit::{Array, ArrayOfTables, InlineTable, Item, Table, Value};

/// Render any document node as JSON.
pub fn item_to_json(item: &Item) -> Json {
    match item {
        Item::None => Json::Null,
        Item::Value(v) => value_to_json(v),
        Item::Table(t) => table_to_json(t),
        Item::ArrayOfTables(a) => Json::Array(a.iter().map(table_to_json).collect()),
    }
}

fn table_to_json(table: &Table) -> Json {
    let mut map = Map::new();
    for (k, v) in table.iter() {
        map.insert(k.to_string(), item_to_json(v));
    }
    Json::Object(map)
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::String(s) => Json::String(s.value().clone()),
        Value::Integer(i) => Json::from(*i.value()),
        Value::Float(f) => float_to_json(*f.value()),
        Value::Boolean(b) => Json::Bool(*b.value()),
        Value::Datetime(d) => Json::String(d.value().to_string()),
        Value::Array(a) => Json::Array(a.iter().map(value_to_json).collect()),
        Value::InlineTable(t) => {
            let mut map = Map::new();
            for (k, v) in t.iter() {
                map.insert(k.to_string(), value_to_json(v));
            }
            Json::Object(map)
        }
    }
}

// JSON has no spelling for non-finite floats; use TOML's.
fn float_to_json(f: f64) -> Json {
    match Number::from_f64(f) {
        Some(n) => Json::Number(n),
        None if f.is_nan() => Json::String("nan".into()),
        None if f.is_sign_negative() => Json::String("-inf".into()),
        None => Json::String("inf".into()),
    }
}

/// Convert a JSON value into a document node.
///
/// With `standard` set, objects become `[table]` sections and non-empty
/// arrays of objects become `[[array.of.tables]]`. Otherwise everything is
/// written inline.
pub fn json_to_item(json: &Json, standard: bool) -> TomlResult<Item> {
    if !standard {
        return json_to_value(json).map(Item::Value);
    }
    match json {
        Json::Object(map) => {
            let mut table = Table::new();
            for (k, v) in map {
                table.insert(k.as_str(), json_to_item(v, true)?);
            }
            Ok(Item::Table(table))
        }
        Json::Array(items) if !items.is_empty() && items.iter().all(Json::is_object) => {
            let mut aot = ArrayOfTables::new();
            for v in items {
                if let Item::Table(t) = json_to_item(v, true)? {
                    aot.push(t);
                }
            }
            Ok(Item::ArrayOfTables(aot))
        }
        other => json_to_value(other).map(Item::Value),
    }
}

fn json_to_value(json: &Json) -> TomlResult<Value> {
    match json {
        Json::Null => Err(unrepresentable(json, "TOML has no null value")),
        Json::Bool(b) => Ok(Value::from(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if n.is_u64() {
                Err(unrepresentable(json, "integer exceeds the signed 64-bit range"))
            } else {
                n.as_f64()
                    .map(Value::from)
                    .ok_or_else(|| unrepresentable(json, "number is not representable"))
            }
        }
        Json::String(s) => Ok(Value::from(s.as_str())),
        Json::Array(items) => {
            let mut array = Array::new();
            for v in items {
                array.push(json_to_value(v)?);
            }
            Ok(Value::Array(array))
        }
        Json::Object(map) => {
            let mut table = InlineTable::new();
            for (k, v) in map {
                table.insert(k.as_str(), json_to_value(v)?);
            }
            Ok(Value::InlineTable(table))
        }
    }
}

fn unrepresentable(json: &Json, reason: &str) -> TomlCliError {
    TomlCliError::TypeCoercion {
        value: json.to_string(),
        target: "toml",
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use toml_edit::DocumentMut;

    fn doc(s: &str) -> DocumentMut {
        s.parse().unwrap()
    }

    #[test]
    fn tables_keep_document_order() {
        let d = doc("[person]\nname = \"MyName\"\nage = 12\n\n[person.education]\nname = \"University\"\n");
        let j = item_to_json(d.as_item());
        assert_eq!(
            j.to_string(),
            r#"{"person":{"name":"MyName","age":12,"education":{"name":"University"}}}"#
        );
    }

    #[test]
    fn scalars_and_inline_structures() {
        let d = doc("a = 1.5\nb = true\nc = [1, \"x\"]\nd = { e = 2 }\nt = 1979-05-27T07:32:00Z\n");
        assert_eq!(
            item_to_json(d.as_item()),
            json!({"a": 1.5, "b": true, "c": [1, "x"], "d": {"e": 2}, "t": "1979-05-27T07:32:00Z"})
        );
    }

    #[test]
    fn non_finite_floats_use_toml_spelling() {
        let d = doc("a = nan\nb = inf\nc = -inf\n");
        assert_eq!(item_to_json(d.as_item()), json!({"a": "nan", "b": "inf", "c": "-inf"}));
    }

    #[test]
    fn array_of_tables_is_a_json_array() {
        let d = doc("[[srv]]\nhost = \"a\"\n[[srv]]\nhost = \"b\"\n");
        assert_eq!(item_to_json(&d["srv"]), json!([{"host": "a"}, {"host": "b"}]));
    }

    #[test]
    fn objects_become_sections_only_in_standard_position() {
        let j = json!({"k": 1, "sub": {"x": "y"}});
        assert!(json_to_item(&j, true).unwrap().is_table());
        assert!(json_to_item(&j, false).unwrap().is_inline_table());
    }

    #[test]
    fn arrays_of_objects_become_array_of_tables() {
        let j = json!([{"a": 1}, {"a": 2}]);
        assert!(json_to_item(&j, true).unwrap().is_array_of_tables());
        assert!(json_to_item(&json!([]), true).unwrap().is_array());
        assert!(json_to_item(&json!([1, {"a": 2}]), true).unwrap().is_array());
    }

    #[test]
    fn null_and_huge_integers_are_rejected() {
        assert!(matches!(
            json_to_item(&json!(null), true),
            Err(TomlCliError::TypeCoercion { .. })
        ));
        assert!(matches!(
            json_to_item(&json!(u64::MAX), false),
            Err(TomlCliError::TypeCoercion { .. })
        ));
        assert!(matches!(
            json_to_item(&json!([1, null]), false),
            Err(TomlCliError::TypeCoercion { .. })
        ));
    }
}
