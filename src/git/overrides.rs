//! Out-of-band overrides for repository facts
//!
//! CI systems often build from a detached checkout where git cannot tell
//! the branch, so each fact can be supplied through an environment variable
//! instead. Overrides are read once at the boundary; the resolver never
//! looks at the environment.

use tracing::warn;

use crate::error::{HelmReleaseError, Result};
use crate::git::RepoStateProvider;
use crate::resolver::SHORT_SHA_LEN;

pub const LAST_TAG_VAR: &str = "LAST_TAG";
pub const COMMITS_VAR: &str = "COMMITS";
pub const SHA_VAR: &str = "SHA";
pub const BRANCH_NAME_VAR: &str = "BRANCH_NAME";
pub const IS_TAGGED_VAR: &str = "IS_TAGGED";

/// Raw override values, unparsed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoOverrides {
    /// Present-but-empty means "no tag"
    pub last_tag: Option<String>,
    pub commits: Option<String>,
    pub sha: Option<String>,
    pub branch_name: Option<String>,
    pub is_tagged: Option<String>,
}

impl RepoOverrides {
    /// Read overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        RepoOverrides {
            last_tag: lookup(LAST_TAG_VAR),
            commits: lookup(COMMITS_VAR),
            sha: lookup(SHA_VAR),
            branch_name: lookup(BRANCH_NAME_VAR),
            is_tagged: lookup(IS_TAGGED_VAR),
        }
    }
}

/// Provider that answers from overrides first and the wrapped provider second
pub struct OverridingProvider<P> {
    inner: P,
    overrides: RepoOverrides,
}

impl<P: RepoStateProvider> OverridingProvider<P> {
    pub fn new(inner: P, overrides: RepoOverrides) -> Self {
        OverridingProvider { inner, overrides }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Boolean parsing compatible with the usual CI spellings
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

impl<P: RepoStateProvider> RepoStateProvider for OverridingProvider<P> {
    fn last_tag(&self) -> Result<Option<String>> {
        match &self.overrides.last_tag {
            Some(tag) if tag.is_empty() => Ok(None),
            Some(tag) => Ok(Some(tag.clone())),
            None => self.inner.last_tag(),
        }
    }

    fn commits_since_tag(&self) -> Result<u64> {
        match non_empty(&self.overrides.commits) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                HelmReleaseError::vcs_query(format!(
                    "expected {} to be a non-negative integer instead of [{}]",
                    COMMITS_VAR, raw
                ))
            }),
            None => self.inner.commits_since_tag(),
        }
    }

    fn short_sha(&self) -> Result<Option<String>> {
        if let Some(sha) = non_empty(&self.overrides.sha) {
            if sha.chars().count() == SHORT_SHA_LEN {
                return Ok(Some(sha.to_string()));
            }
            warn!(
                sha,
                "ignoring {} override, it is not of length {}", SHA_VAR, SHORT_SHA_LEN
            );
        }
        self.inner.short_sha()
    }

    fn branch_name(&self) -> Result<String> {
        match non_empty(&self.overrides.branch_name) {
            Some(branch) => Ok(branch.to_string()),
            None => self.inner.branch_name(),
        }
    }

    fn is_exactly_at_tag(&self) -> Result<bool> {
        match non_empty(&self.overrides.is_tagged) {
            Some(raw) => Ok(parse_bool(raw).unwrap_or_else(|| {
                warn!(value = raw, "{} is not a boolean, treating as false", IS_TAGGED_VAR);
                false
            })),
            None => self.inner.is_exactly_at_tag(),
        }
    }
}
