//! Format-independent manifest documents
//!
//! A [`Document`] is the in-memory tree of a manifest file. The [`path`]
//! module updates leaves inside it by dotted path and the [`yaml`] module
//! converts it from and to YAML text.

pub mod path;
pub mod yaml;

pub use path::{get_at_path, set_at_path, PathError, PathExpression};

use std::fmt;

/// Leaf value inside a document
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i64),
    /// Integers above `i64::MAX`
    Unsigned(u64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{}", s),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Unsigned(u) => write!(f, "{}", u),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl Scalar {
    /// Short name of the scalar kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::String(_) => "string",
            Scalar::Integer(_) | Scalar::Unsigned(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Bool(_) => "bool",
        }
    }
}

/// Ordered mapping with unique keys.
///
/// Keys keep their scalar kind so `80: http` is written back as an integer
/// key. Dotted paths only address string keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: Vec<(Scalar, Document)>,
}

impl Mapping {
    pub fn new() -> Self {
        Mapping::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        self.entries
            .iter()
            .find(|(k, _)| is_string_key(k, key))
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Document> {
        self.entries
            .iter_mut()
            .find(|(k, _)| is_string_key(k, key))
            .map(|(_, v)| v)
    }

    /// Insert or replace `key`, keeping the position of an existing entry.
    ///
    /// Returns the previous value when the key was already present.
    pub fn insert(&mut self, key: impl Into<Scalar>, value: Document) -> Option<Document> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Scalar, &Document)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

fn is_string_key(key: &Scalar, wanted: &str) -> bool {
    matches!(key, Scalar::String(k) if k == wanted)
}

impl<K: Into<Scalar>> FromIterator<(K, Document)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, Document)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

/// A node carrying an explicit YAML tag such as `!vault`
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    /// Tag name without the leading `!`
    pub tag: String,
    pub value: Document,
}

/// Tree representation of a structured manifest
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Document {
    Mapping(Mapping),
    Sequence(Vec<Document>),
    Scalar(Scalar),
    Tagged(Box<Tagged>),
    #[default]
    Null,
}

impl Document {
    /// Short name of the node kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Document::Mapping(_) => "mapping",
            Document::Sequence(_) => "sequence",
            Document::Scalar(scalar) => scalar.kind(),
            Document::Tagged(_) => "tagged value",
            Document::Null => "null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Document::Null)
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Document::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Document::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Document::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// String content of a string scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl From<Scalar> for Document {
    fn from(value: Scalar) -> Self {
        Document::Scalar(value)
    }
}

impl From<Mapping> for Document {
    fn from(value: Mapping) -> Self {
        Document::Mapping(value)
    }
}
