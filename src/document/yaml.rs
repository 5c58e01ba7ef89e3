//! YAML codec for [`Document`] using serde_yaml

use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::Value as YamlValue;

use super::{Document, Mapping, Scalar, Tagged};
use crate::error::{HelmReleaseError, Result};

/// Parse YAML text into a document. Empty input yields [`Document::Null`].
pub fn parse(source: &str) -> Result<Document> {
    let value: YamlValue = serde_yaml::from_str(source)
        .map_err(|e| HelmReleaseError::manifest(format!("invalid YAML: {}", e)))?;
    from_yaml(value)
}

/// Serialize a document back to YAML text
pub fn to_string(doc: &Document) -> Result<String> {
    serde_yaml::to_string(&to_yaml(doc))
        .map_err(|e| HelmReleaseError::manifest(format!("cannot serialize YAML: {}", e)))
}

/// Convert a parsed YAML value.
///
/// Numbers, tags and key kinds are kept so an untouched part of the file is
/// written back with the same meaning. Keys that are not scalars are
/// rejected.
pub fn from_yaml(value: YamlValue) -> Result<Document> {
    let doc = match value {
        YamlValue::Null => Document::Null,
        YamlValue::Sequence(items) => Document::Sequence(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<Result<Vec<_>>>()?,
        ),
        YamlValue::Mapping(map) => {
            let mut mapping = Mapping::new();
            for (key, value) in map {
                mapping.insert(key_from_yaml(key)?, from_yaml(value)?);
            }
            Document::Mapping(mapping)
        }
        YamlValue::Tagged(tagged) => {
            let tag = tagged.tag.to_string();
            let name = tag.strip_prefix('!').unwrap_or(&tag);
            if name.is_empty() {
                return Err(HelmReleaseError::manifest("empty YAML tag"));
            }
            Document::Tagged(Box::new(Tagged {
                tag: name.to_string(),
                value: from_yaml(tagged.value)?,
            }))
        }
        scalar => match scalar_from_yaml(scalar)? {
            Some(scalar) => Document::Scalar(scalar),
            None => Document::Null,
        },
    };
    Ok(doc)
}

pub fn to_yaml(doc: &Document) -> YamlValue {
    match doc {
        Document::Null => YamlValue::Null,
        Document::Scalar(scalar) => scalar_to_yaml(scalar),
        Document::Sequence(items) => YamlValue::Sequence(items.iter().map(to_yaml).collect()),
        Document::Mapping(mapping) => {
            let mut map = serde_yaml::Mapping::new();
            for (key, value) in mapping.iter() {
                map.insert(scalar_to_yaml(key), to_yaml(value));
            }
            YamlValue::Mapping(map)
        }
        Document::Tagged(tagged) => YamlValue::Tagged(Box::new(TaggedValue {
            tag: Tag::new(tagged.tag.clone()),
            value: to_yaml(&tagged.value),
        })),
    }
}

fn scalar_from_yaml(value: YamlValue) -> Result<Option<Scalar>> {
    let scalar = match value {
        YamlValue::Null => return Ok(None),
        YamlValue::Bool(b) => Scalar::Bool(b),
        YamlValue::String(s) => Scalar::String(s),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Scalar::Integer(i)
            } else if let Some(u) = n.as_u64() {
                Scalar::Unsigned(u)
            } else if let Some(f) = n.as_f64() {
                Scalar::Float(f)
            } else {
                return Err(HelmReleaseError::manifest(format!("unsupported number {}", n)));
            }
        }
        other => {
            return Err(HelmReleaseError::manifest(format!(
                "expected a scalar, found {:?}",
                other
            )))
        }
    };
    Ok(Some(scalar))
}

fn scalar_to_yaml(scalar: &Scalar) -> YamlValue {
    match scalar {
        Scalar::Bool(b) => YamlValue::Bool(*b),
        Scalar::Integer(i) => YamlValue::Number((*i).into()),
        Scalar::Unsigned(u) => YamlValue::Number((*u).into()),
        Scalar::Float(f) => YamlValue::Number((*f).into()),
        Scalar::String(s) => YamlValue::String(s.clone()),
    }
}

fn key_from_yaml(key: YamlValue) -> Result<Scalar> {
    match key {
        YamlValue::Null => Err(HelmReleaseError::manifest(
            "null mapping keys are not supported",
        )),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) | YamlValue::Tagged(_) => Err(
            HelmReleaseError::manifest(format!("unsupported mapping key: {:?}", key)),
        ),
        scalar => scalar_from_yaml(scalar)?
            .ok_or_else(|| HelmReleaseError::manifest("null mapping keys are not supported")),
    }
}
