//! Loading, editing and saving a TOML file.

#![deny(missing_docs)]

use crate::coerce::Coercion;
use crate::error::{TomlCliError, TomlResult};
use crate::json::item_to_json;
use crate::key_path::{KeyPath, Segment};
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item, Table};
use tracing::{debug, info, warn};

/// A parsed TOML file and the path it is written back to.
#[derive(Debug)]
pub struct TomlFile {
    path: PathBuf,
    doc: DocumentMut,
}

impl TomlFile {
    /// Read and parse `path`.
    pub fn load(path: &Path) -> TomlResult<Self> {
        debug!(path = %path.display(), "reading document");
        let text = fs::read_to_string(path).map_err(|source| TomlCliError::Io {
            action: "read",
            file: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Parse `text` as the contents of `path` without touching the disk.
    pub fn parse(path: &Path, text: &str) -> TomlResult<Self> {
        let doc = text
            .parse::<DocumentMut>()
            .map_err(|source| TomlCliError::TomlParse {
                file: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            doc,
        })
    }

    /// Serialized document text.
    pub fn render(&self) -> String {
        self.doc.to_string()
    }

    /// Rewrite the whole file from the in-memory document.
    pub fn save(&self) -> TomlResult<()> {
        debug!(path = %self.path.display(), "writing document");
        fs::write(&self.path, self.render()).map_err(|source| TomlCliError::Io {
            action: "write",
            file: self.path.clone(),
            source,
        })
    }

    /// The node at `path` as JSON. An empty path yields the whole document.
    pub fn get(&self, path: &KeyPath) -> TomlResult<serde_json::Value> {
        if path.is_empty() {
            debug!("reading whole document");
        }
        let mut node = self.doc.as_item();
        for seg in path.segments() {
            node = child(node, seg).ok_or_else(|| not_found(seg, path))?;
        }
        Ok(item_to_json(node))
    }

    /// Store `raw`, converted by `coercion`, at `path`, replacing any existing
    /// value.
    ///
    /// Every segment but the last must already exist. The path is resolved
    /// before `raw` is converted.
    pub fn set(&mut self, path: &KeyPath, raw: &str, coercion: Coercion) -> TomlResult<()> {
        let (last, parents) = path.split_last().ok_or_else(|| root_not_allowed(path))?;
        let mut node = self.doc.as_item_mut();
        for seg in parents {
            node = child_mut(node, seg).ok_or_else(|| not_found(seg, path))?;
        }

        let mut item = coercion.apply(raw)?.into_item(node.is_table())?;
        let key = last.as_key();
        let table = node
            .as_table_like_mut()
            .ok_or_else(|| not_a_table(parents.last(), path))?;
        // Keep a trailing comment on the value being replaced.
        if let (Some(old), Item::Value(new)) = (table.get(&key).and_then(Item::as_value), &mut item)
        {
            *new.decor_mut() = old.decor().clone();
        }
        table.insert(&key, item);
        info!(key = %path, "value set");
        Ok(())
    }

    /// Create every missing table along `path`. Existing tables are left alone.
    pub fn add_section(&mut self, path: &KeyPath) -> TomlResult<()> {
        let mut node = self.doc.as_item_mut();
        for (i, seg) in path.segments().iter().enumerate() {
            let key = seg.as_key();
            let table = node
                .as_table_like_mut()
                .ok_or_else(|| not_a_table(i.checked_sub(1).map(|p| &path.segments()[p]), path))?;
            if !table.contains_key(&key) {
                debug!(key = %key, "creating table");
                let mut created = Table::new();
                // A header directly under a bare parent header needs no gap.
                if i > 0 && !table.iter().any(|(_, v)| v.is_value()) {
                    created.decor_mut().set_prefix("");
                }
                table.insert(&key, Item::Table(created));
            }
            node = table.get_mut(&key).ok_or_else(|| not_found(seg, path))?;
        }
        if node.as_table_like().is_none() {
            return Err(not_a_table(path.segments().last(), path));
        }
        info!(key = %path, "section ensured");
        Ok(())
    }

    /// Remove the key at `path` together with everything below it.
    ///
    /// A missing intermediate key is reported as a warning and the walk
    /// continues from the table reached so far; the final key is then looked
    /// up there.
    pub fn unset(&mut self, path: &KeyPath) -> TomlResult<()> {
        let (last, parents) = path.split_last().ok_or_else(|| root_not_allowed(path))?;
        let mut node = self.doc.as_item_mut();
        for seg in parents {
            if child(node, seg).is_some() {
                node = child_mut(node, seg).ok_or_else(|| not_found(seg, path))?;
            } else {
                warn!("Key {path} can not unset");
            }
        }

        let key = last.as_key();
        node.as_table_like_mut()
            .ok_or_else(|| not_a_table(parents.last(), path))?
            .remove(&key)
            .ok_or_else(|| not_found(last, path))?;
        info!(key = %path, "value removed");
        Ok(())
    }
}

fn is_sequence(item: &Item) -> bool {
    item.is_array() || item.is_array_of_tables()
}

// Index segments select array elements and fall back to a key lookup in tables.
fn child<'a>(item: &'a Item, seg: &Segment) -> Option<&'a Item> {
    match seg {
        Segment::Index(i) if is_sequence(item) => item.get(*i),
        _ => item.as_table_like()?.get(&seg.as_key()),
    }
}

fn child_mut<'a>(item: &'a mut Item, seg: &Segment) -> Option<&'a mut Item> {
    match seg {
        Segment::Index(i) if is_sequence(item) => item.get_mut(*i),
        _ => item.as_table_like_mut()?.get_mut(&seg.as_key()),
    }
}

fn not_found(seg: &Segment, path: &KeyPath) -> TomlCliError {
    TomlCliError::KeyNotFound {
        key: seg.to_string(),
        path: path.to_string(),
    }
}

fn not_a_table(parent: Option<&Segment>, path: &KeyPath) -> TomlCliError {
    TomlCliError::NotATable {
        key: parent.map_or_else(|| "<root>".to_string(), Segment::to_string),
        path: path.to_string(),
    }
}

fn root_not_allowed(path: &KeyPath) -> TomlCliError {
    TomlCliError::KeyNotFound {
        key: String::new(),
        path: path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_path::IndexPolicy;
    use serde_json::json;

    const PERSON: &str = r#"
[person]
name = "MyName"
happy = false
age = 12

[person.education]
name = "University"
"#;

    fn file(text: &str) -> TomlFile {
        TomlFile::parse(Path::new("test.toml"), text).unwrap()
    }

    fn keys(words: &[&str]) -> KeyPath {
        KeyPath::from_words(words, IndexPolicy::KeysOnly)
    }

    fn set_path(words: &[&str]) -> KeyPath {
        KeyPath::from_words(words, IndexPolicy::IntermediateIndices)
    }

    #[test]
    fn get_walks_tables() {
        let f = file(PERSON);
        assert_eq!(
            f.get(&keys(&["person", "education", "name"])).unwrap(),
            json!("University")
        );
        assert_eq!(f.get(&keys(&["person", "age"])).unwrap(), json!(12));
        assert_eq!(
            f.get(&keys(&["person", "education"])).unwrap(),
            json!({"name": "University"})
        );
    }

    #[test]
    fn get_missing_key_fails() {
        let err = file(PERSON).get(&keys(&["person", "height"])).unwrap_err();
        assert!(matches!(err, TomlCliError::KeyNotFound { ref key, .. } if key == "height"));
    }

    #[test]
    fn get_keys_only_does_not_index_arrays() {
        let f = file("ports = [80, 443]\n");
        assert!(f.get(&keys(&["ports", "1"])).is_err());
    }

    #[test]
    fn set_plain_string_then_int() {
        let mut f = file(PERSON);
        let age = set_path(&["person", "age"]);
        f.set(&age, "15", Coercion::Text).unwrap();
        assert!(f.render().contains("age = \"15\""));
        f.set(&age, "15", Coercion::Int).unwrap();
        assert!(f.render().contains("age = 15\n"));
        assert_eq!(f.get(&age).unwrap(), json!(15));
    }

    #[test]
    fn set_new_key_appends_after_existing_values() {
        let mut f = file(PERSON);
        f.set(&set_path(&["person", "gender"]), "male", Coercion::Text)
            .unwrap();
        assert!(f.render().contains("age = 12\ngender = \"male\""));
    }

    #[test]
    fn set_keeps_trailing_comment() {
        let mut f = file("port = 80 # http\n");
        f.set(&set_path(&["port"]), "8080", Coercion::Int)
            .unwrap();
        assert_eq!(f.render(), "port = 8080 # http\n");
    }

    #[test]
    fn set_requires_existing_parents() {
        let mut f = file(PERSON);
        let err = f
            .set(&set_path(&["nobody", "age"]), "1", Coercion::Int)
            .unwrap_err();
        assert!(matches!(err, TomlCliError::KeyNotFound { .. }));
        assert_eq!(f.render(), PERSON);
    }

    #[test]
    fn set_resolves_path_before_converting() {
        let mut f = file(PERSON);
        let err = f
            .set(&set_path(&["nobody", "age"]), "twelve", Coercion::Int)
            .unwrap_err();
        assert!(matches!(err, TomlCliError::KeyNotFound { .. }));

        let err = f
            .set(&set_path(&["person", "age"]), "twelve", Coercion::Int)
            .unwrap_err();
        assert!(matches!(err, TomlCliError::TypeCoercion { .. }));
        assert_eq!(f.render(), PERSON);
    }

    #[test]
    fn set_through_array_index() {
        let mut f = file("[[srv]]\nhost = \"a\"\n\n[[srv]]\nhost = \"b\"\n");
        f.set(&set_path(&["srv", "1", "host"]), "c", Coercion::Text)
            .unwrap();
        assert_eq!(
            f.get(&keys(&["srv"])).unwrap(),
            json!([{"host": "a"}, {"host": "c"}])
        );
    }

    #[test]
    fn set_index_segment_falls_back_to_table_key() {
        let mut f = file("[years.2024]\ntotal = 1\n");
        f.set(&set_path(&["years", "2024", "total"]), "2", Coercion::Int)
            .unwrap();
        assert_eq!(f.get(&keys(&["years", "2024", "total"])).unwrap(), json!(2));
    }

    #[test]
    fn set_json_object_becomes_section() {
        let mut f = file(PERSON);
        f.set(
            &set_path(&["person", "address"]),
            r#"{"city": "Oslo", "zip": 150}"#,
            Coercion::Json,
        )
        .unwrap();
        let text = f.render();
        assert!(text.contains("[person.address]"), "{text}");
        assert_eq!(
            f.get(&keys(&["person", "address"])).unwrap(),
            json!({"city": "Oslo", "zip": 150})
        );
        assert!(text.parse::<DocumentMut>().is_ok());
    }

    #[test]
    fn set_json_inside_inline_table_stays_inline() {
        let mut f = file("point = { x = 1 }\n");
        f.set(&set_path(&["point", "meta"]), r#"{"a": [1, 2]}"#, Coercion::Json)
            .unwrap();
        assert_eq!(
            f.get(&keys(&["point"])).unwrap(),
            json!({"x": 1, "meta": {"a": [1, 2]}})
        );
        assert!(!f.render().contains("[point"));
    }

    #[test]
    fn set_on_scalar_parent_is_not_a_table() {
        let mut f = file("name = \"x\"\n");
        let err = f
            .set(&set_path(&["name", "first"]), "y", Coercion::Text)
            .unwrap_err();
        assert!(matches!(err, TomlCliError::NotATable { .. }));
    }

    #[test]
    fn add_section_creates_nested_tables_once() {
        let mut f = file(PERSON);
        f.add_section(&KeyPath::from_dotted("address")).unwrap();
        assert!(f.render().contains("[address]"));
        f.add_section(&KeyPath::from_dotted("address.work")).unwrap();
        let once = f.render();
        assert!(once.contains("[address]\n[address.work]"), "{once}");
        f.add_section(&KeyPath::from_dotted("address.work")).unwrap();
        assert_eq!(f.render(), once);
    }

    #[test]
    fn add_section_stacks_headers_without_gaps() {
        let mut f = file("");
        f.add_section(&KeyPath::from_dotted("a.b.c")).unwrap();
        assert_eq!(f.render().trim_start(), "[a]\n[a.b]\n[a.b.c]\n");

        let mut f = file(PERSON);
        f.add_section(&KeyPath::from_dotted("address.work")).unwrap();
        assert!(f.render().ends_with("[address]\n[address.work]\n"), "{}", f.render());
    }

    #[test]
    fn add_section_keeps_gap_under_parent_with_values() {
        let mut f = file("[server]\nport = 1\n");
        f.add_section(&KeyPath::from_dotted("server.tls")).unwrap();
        assert!(f.render().contains("port = 1\n\n[server.tls]"), "{}", f.render());
    }

    #[test]
    fn add_section_over_scalar_fails() {
        let mut f = file("name = \"x\"\n");
        let err = f.add_section(&KeyPath::from_dotted("name")).unwrap_err();
        assert!(matches!(err, TomlCliError::NotATable { .. }));
    }

    #[test]
    fn unset_removes_only_the_target() {
        let mut f = file(PERSON);
        f.unset(&keys(&["person", "education", "name"])).unwrap();
        let text = f.render();
        assert!(text.contains("[person.education]"));
        assert!(!text.contains("University"));
        assert!(text.contains("name = \"MyName\""));

        f.unset(&keys(&["person", "education"])).unwrap();
        assert!(!f.render().contains("education"));

        f.unset(&keys(&["person"])).unwrap();
        assert_eq!(f.render().trim(), "");
    }

    #[test]
    fn unset_missing_final_key_fails() {
        let mut f = file(PERSON);
        let err = f.unset(&keys(&["person", "height"])).unwrap_err();
        assert!(matches!(err, TomlCliError::KeyNotFound { ref key, .. } if key == "height"));
    }

    #[test]
    fn unset_continues_past_missing_intermediate() {
        let mut f = file("name = \"top\"\n\n[person]\nname = \"inner\"\n");
        f.unset(&keys(&["ghost", "name"])).unwrap();
        let text = f.render();
        assert!(!text.contains("\"top\""));
        assert!(text.contains("\"inner\""));

        let err = f.unset(&keys(&["ghost", "nothing"])).unwrap_err();
        assert!(matches!(err, TomlCliError::KeyNotFound { .. }));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let err = TomlFile::parse(Path::new("bad.toml"), "a = ").unwrap_err();
        assert!(matches!(err, TomlCliError::TomlParse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }
}
