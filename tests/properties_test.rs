// tests/properties_test.rs
use helm_release::document::{get_at_path, set_at_path, Document, Mapping, PathExpression, Scalar};
use helm_release::domain::{normalize_branch, RepoState};
use helm_release::resolver::resolve;
use proptest::prelude::*;

fn nested(segments: &[String], leaf: Document) -> Document {
    segments.iter().rev().fold(leaf, |inner, key| {
        let mut mapping = Mapping::new();
        mapping.insert(key.clone(), inner);
        Document::Mapping(mapping)
    })
}

proptest! {
    #[test]
    fn normalize_branch_is_idempotent(name in ".{0,40}") {
        let once = normalize_branch(&name);
        prop_assert_eq!(normalize_branch(&once), once);
    }

    #[test]
    fn normalize_branch_uses_restricted_charset(name in ".{1,40}") {
        let normalized = normalize_branch(&name);
        prop_assert!(!normalized.is_empty());
        prop_assert!(normalized
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase() || c == '.' || c == '-'));
    }

    #[test]
    fn exact_tag_keeps_the_tag_core(
        major in 0u64..100,
        minor in 0u64..100,
        patch in 0u64..100,
        branch in "[a-zA-Z0-9/_-]{1,20}",
        commits in 0u64..50,
        sha in "[0-9a-f]{7}",
    ) {
        let state = RepoState::new(branch)
            .with_tag(format!("v{}.{}.{}", major, minor, patch))
            .with_commits(commits)
            .with_sha(sha)
            .exactly_at_tag(true);

        let version = resolve(&state, None).unwrap();
        prop_assert_eq!((version.major, version.minor, version.patch), (major, minor, patch));
    }

    #[test]
    fn untagged_head_bumps_patch(
        major in 0u64..100,
        minor in 0u64..100,
        patch in 0u64..100,
        branch in "[a-zA-Z0-9/_$-]{1,20}",
        commits in 1u64..50,
        sha in "[0-9a-f]{7}",
    ) {
        let state = RepoState::new(branch)
            .with_tag(format!("{}.{}.{}", major, minor, patch))
            .with_commits(commits)
            .with_sha(sha.clone());

        let version = resolve(&state, None).unwrap();
        prop_assert_eq!(version.patch, patch + 1);
        prop_assert_eq!(version.build_metadata(), &[sha][..]);
    }

    #[test]
    fn set_then_get_returns_the_value(
        segments in proptest::collection::vec("[a-z]{1,6}", 1..5),
        old in "[a-z0-9]{0,8}",
        new in "[a-z0-9]{1,8}",
    ) {
        let doc = nested(&segments, Document::Scalar(Scalar::from(old)));
        let path = PathExpression::parse(&segments.join(".")).unwrap();

        let updated = set_at_path(&doc, &path, Scalar::from(new.clone())).unwrap();
        prop_assert_eq!(get_at_path(&updated, &path), Some(&Document::Scalar(Scalar::String(new))));
    }

    #[test]
    fn failed_set_leaves_document_untouched(
        segments in proptest::collection::vec("[a-z]{1,6}", 1..4),
        extra in "[A-Z]{1,6}",
    ) {
        let doc = nested(&segments, Document::Scalar(Scalar::from("leaf")));
        let before = doc.clone();
        let path = PathExpression::parse(&format!("{}.{}", segments.join("."), extra)).unwrap();

        prop_assert!(set_at_path(&doc, &path, Scalar::from("x")).is_err());
        prop_assert_eq!(doc, before);
    }
}
