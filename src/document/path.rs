//! Dotted-path addressing of document leaves
//!
//! Paths such as `image.tag` walk mapping keys from the root. Updates only
//! replace keys that already exist: a mistyped path fails loudly instead of
//! creating a field nobody reads.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{Document, Mapping, Scalar};

/// Errors produced while addressing a document by path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("The document is empty")]
    EmptyDocument,

    #[error("Key '{segment}' does not exist for path '{path}'")]
    MissingKey { segment: String, path: String },

    #[error("While processing key '{segment}' for path '{path}' expected a mapping, but got {actual_kind}")]
    TypeMismatch {
        segment: String,
        path: String,
        actual_kind: &'static str,
    },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

/// Dotted path split into its key segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    raw: String,
    segments: Vec<String>,
}

impl PathExpression {
    /// Split `path` on `.`; every segment must be non-empty.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::InvalidPath {
                path: path.to_string(),
                reason: "path is empty".to_string(),
            });
        }

        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if let Some(position) = segments.iter().position(|s| s.is_empty()) {
            return Err(PathError::InvalidPath {
                path: path.to_string(),
                reason: format!("segment {} is empty", position + 1),
            });
        }

        Ok(PathExpression {
            raw: path.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for PathExpression {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathExpression::parse(s)
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Return a copy of `doc` whose leaf at `path` is replaced by `value`.
///
/// Every segment must name an existing key inside a mapping. On error the
/// input document is left untouched.
pub fn set_at_path(
    doc: &Document,
    path: &PathExpression,
    value: Scalar,
) -> Result<Document, PathError> {
    if doc.is_null() {
        return Err(PathError::EmptyDocument);
    }

    let mut root = doc.clone();
    assign(&mut root, path, value)?;
    Ok(root)
}

/// Look up the node at `path`, if every segment exists
pub fn get_at_path<'a>(doc: &'a Document, path: &PathExpression) -> Option<&'a Document> {
    path.segments()
        .iter()
        .try_fold(doc, |node, segment| node.as_mapping()?.get(segment))
}

fn assign(root: &mut Document, path: &PathExpression, value: Scalar) -> Result<(), PathError> {
    let (last, parents) = path
        .segments()
        .split_last()
        .ok_or_else(|| PathError::InvalidPath {
            path: path.to_string(),
            reason: "path is empty".to_string(),
        })?;

    let mut current = root;
    for segment in parents {
        current = mapping_mut(current, segment, path)?
            .get_mut(segment)
            .ok_or_else(|| missing_key(segment, path))?;
    }

    let slot = mapping_mut(current, last, path)?
        .get_mut(last)
        .ok_or_else(|| missing_key(last, path))?;
    *slot = Document::Scalar(value);

    Ok(())
}

fn mapping_mut<'a>(
    node: &'a mut Document,
    segment: &str,
    path: &PathExpression,
) -> Result<&'a mut Mapping, PathError> {
    let actual_kind = node.kind();
    node.as_mapping_mut().ok_or_else(|| PathError::TypeMismatch {
        segment: segment.to_string(),
        path: path.to_string(),
        actual_kind,
    })
}

fn missing_key(segment: &str, path: &PathExpression) -> PathError {
    PathError::MissingKey {
        segment: segment.to_string(),
        path: path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values_doc() -> Document {
        let image: Mapping = vec![
            ("repository".to_string(), Scalar::from("nginx").into()),
            ("tag".to_string(), Scalar::from("stable").into()),
        ]
        .into_iter()
        .collect();

        let root: Mapping = vec![
            ("replicaCount".to_string(), Scalar::Integer(1).into()),
            ("image".to_string(), image.into()),
            (
                "ports".to_string(),
                Document::Sequence(vec![Scalar::Integer(80).into()]),
            ),
        ]
        .into_iter()
        .collect();

        root.into()
    }

    fn path(p: &str) -> PathExpression {
        PathExpression::parse(p).unwrap()
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(path("image.tag").segments(), ["image", "tag"]);
        assert_eq!(path("tag").segments(), ["tag"]);
        assert_eq!(path("image.tag").to_string(), "image.tag");
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        for bad in ["", ".", "image.", ".tag", "image..tag"] {
            assert!(
                matches!(PathExpression::parse(bad), Err(PathError::InvalidPath { .. })),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_set_nested_leaf() {
        let doc = values_doc();
        let updated = set_at_path(&doc, &path("image.tag"), Scalar::from("1.2.3")).unwrap();

        assert_eq!(
            get_at_path(&updated, &path("image.tag")).and_then(Document::as_str),
            Some("1.2.3")
        );
        assert_eq!(
            get_at_path(&updated, &path("image.repository")),
            get_at_path(&doc, &path("image.repository"))
        );
        assert_eq!(
            get_at_path(&doc, &path("image.tag")).and_then(Document::as_str),
            Some("stable")
        );
    }

    #[test]
    fn test_set_replaces_subtree_with_scalar() {
        let doc = values_doc();
        let updated = set_at_path(&doc, &path("image"), Scalar::from("flat")).unwrap();
        assert_eq!(
            get_at_path(&updated, &path("image")).and_then(Document::as_str),
            Some("flat")
        );
    }

    #[test]
    fn test_set_on_null_document() {
        let err = set_at_path(&Document::Null, &path("image.tag"), Scalar::from("x")).unwrap_err();
        assert_eq!(err, PathError::EmptyDocument);
    }

    #[test]
    fn test_missing_final_key() {
        let err = set_at_path(&values_doc(), &path("image.tags"), Scalar::from("x")).unwrap_err();
        assert_eq!(
            err,
            PathError::MissingKey {
                segment: "tags".to_string(),
                path: "image.tags".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_intermediate_key() {
        let err =
            set_at_path(&values_doc(), &path("container.tag"), Scalar::from("x")).unwrap_err();
        assert!(matches!(err, PathError::MissingKey { segment, .. } if segment == "container"));
    }

    #[test]
    fn test_type_mismatch_on_scalar() {
        let err =
            set_at_path(&values_doc(), &path("replicaCount.tag"), Scalar::from("x")).unwrap_err();
        assert_eq!(
            err,
            PathError::TypeMismatch {
                segment: "tag".to_string(),
                path: "replicaCount.tag".to_string(),
                actual_kind: "integer",
            }
        );
    }

    #[test]
    fn test_type_mismatch_on_sequence() {
        let err = set_at_path(&values_doc(), &path("ports.0"), Scalar::Integer(8080)).unwrap_err();
        assert!(matches!(
            err,
            PathError::TypeMismatch {
                actual_kind: "sequence",
                ..
            }
        ));
    }

    #[test]
    fn test_root_must_be_mapping() {
        let doc = Document::Scalar(Scalar::from("just text"));
        let err = set_at_path(&doc, &path("tag"), Scalar::from("x")).unwrap_err();
        assert!(matches!(err, PathError::TypeMismatch { actual_kind: "string", .. }));
    }

    #[test]
    fn test_get_missing_path() {
        assert!(get_at_path(&values_doc(), &path("image.digest")).is_none());
        assert!(get_at_path(&values_doc(), &path("replicaCount.x")).is_none());
    }
}
