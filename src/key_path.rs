//! Key paths into a TOML document.

#![deny(missing_docs)]

use std::fmt;

/// One step of a key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A table key.
    Key(String),
    /// A position in an array or array of tables.
    Index(usize),
}

impl Segment {
    /// Spelling of the segment as a table key.
    pub fn as_key(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Segment::Key(k) => k.as_str().into(),
            Segment::Index(i) => i.to_string().into(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => f.write_str(k),
            Segment::Index(i) => write!(f, "{i}"),
        }
    }
}

/// How command-line words are turned into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexPolicy {
    /// Every word is a table key.
    KeysOnly,
    /// Numeric words become indices, except the last word, which stays a key.
    IntermediateIndices,
}

/// An ordered sequence of segments locating a node in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    /// Build a path from command-line words.
    pub fn from_words<S: AsRef<str>>(words: &[S], policy: IndexPolicy) -> Self {
        let last = words.len().saturating_sub(1);
        let segments = words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let w = w.as_ref();
                match policy {
                    IndexPolicy::IntermediateIndices if i < last => w
                        .parse::<usize>()
                        .map(Segment::Index)
                        .unwrap_or_else(|_| Segment::Key(w.to_string())),
                    _ => Segment::Key(w.to_string()),
                }
            })
            .collect();
        Self { segments }
    }

    /// Build a path from a dotted string such as `address.work`.
    pub fn from_dotted(key: &str) -> Self {
        Self {
            segments: key.split('.').map(|s| Segment::Key(s.to_string())).collect(),
        }
    }

    /// All segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when the path addresses the document root.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Split into the parent segments and the final segment.
    pub fn split_last(&self) -> Option<(&Segment, &[Segment])> {
        self.segments.split_last()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}
