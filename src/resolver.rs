//! Next-version resolution from repository state
//!
//! The resolver is a pure function of a [`RepoState`]: it never queries git
//! or the environment itself.

use tracing::{debug, info, warn};

use crate::domain::version::is_identifier;
use crate::domain::{BranchContext, BumpKind, RepoState, SemanticVersion, VersionError};

/// Length of the abbreviated hash used as build metadata
pub const SHORT_SHA_LEN: usize = 7;

/// Base version used when the repository has no tag
pub fn default_version() -> SemanticVersion {
    SemanticVersion::new(0, 0, 1)
}

/// Where the current version comes from, selected once per run
#[derive(Debug, Clone, PartialEq)]
pub enum VersionSource {
    /// Derive the version from tags, branch and commit distance
    FromRepoState(RepoState),
    /// Bump the version already recorded in the chart
    FromManifestVersion(SemanticVersion),
}

impl VersionSource {
    pub fn name(&self) -> &'static str {
        match self {
            VersionSource::FromRepoState(_) => "git",
            VersionSource::FromManifestVersion(_) => "helm",
        }
    }
}

/// Resolve the next version from either source.
///
/// The chart source has no history to derive from, so it requires an
/// explicit bump.
pub fn resolve_source(
    source: &VersionSource,
    bump: Option<BumpKind>,
) -> Result<SemanticVersion, VersionError> {
    match source {
        VersionSource::FromRepoState(state) => resolve(state, bump),
        VersionSource::FromManifestVersion(current) => match bump {
            Some(kind) => current.bump(kind),
            None => Err(VersionError::BumpRequired {
                origin: source.name(),
            }),
        },
    }
}

/// Compute the next release version.
///
/// With an explicit bump the last tag is incremented once and nothing else
/// is consulted. Without one the version is derived from the shape of the
/// repository:
///
/// - off a tag, the patch is bumped; branches other than `master` get a
///   `0.<branch>` prerelease
/// - on `master`, the commit count since the tag is appended to the
///   prerelease
/// - the short hash becomes the build metadata
pub fn resolve(
    state: &RepoState,
    bump: Option<BumpKind>,
) -> Result<SemanticVersion, VersionError> {
    let base = parse_base(state.last_tag.as_deref())?;

    match bump {
        Some(kind) => {
            let next = base.bump(kind)?;
            debug!(%base, %next, bump = %kind, "applied explicit bump");
            Ok(next)
        }
        None => resolve_from_history(state, base),
    }
}

fn resolve_from_history(
    state: &RepoState,
    base: SemanticVersion,
) -> Result<SemanticVersion, VersionError> {
    let branch = BranchContext::new(state.branch_name.as_str());
    let mut version = base;
    let mut prerelease = String::new();

    if !state.is_exactly_at_tag {
        if branch.is_detached() && state.commits_since_tag == 0 {
            return Err(VersionError::AmbiguousTag);
        }

        version = version.increment_patch()?;
        if !branch.is_release_branch() {
            prerelease = format!("0.{}", branch.normalized);
        }
    }

    if branch.is_release_branch() && state.commits_since_tag != 0 {
        if !prerelease.is_empty() {
            prerelease.push('.');
        }
        prerelease.push_str(&state.commits_since_tag.to_string());
    }

    if !prerelease.is_empty() {
        version = version.with_prerelease(&prerelease)?;
    }

    if let Some(sha) = usable_sha(state.short_sha.as_deref()) {
        version = version.with_build_metadata(sha)?;
    }

    debug!(
        branch = %branch.normalized,
        commits = state.commits_since_tag,
        tagged = state.is_exactly_at_tag,
        %version,
        "derived version from repository state"
    );
    Ok(version)
}

/// Parse the base version from the last tag.
///
/// A missing or empty tag falls back to [`default_version`]. One leading
/// `v` and then one leading `r` are stripped before parsing. Build metadata
/// on the tag is dropped.
pub fn parse_base(tag: Option<&str>) -> Result<SemanticVersion, VersionError> {
    let Some(tag) = tag.filter(|t| !t.is_empty()) else {
        let fallback = default_version();
        info!(version = %fallback, "unable to find any git tags, using default");
        return Ok(fallback);
    };

    let stripped = strip_tag_prefix(tag);
    match SemanticVersion::parse(stripped) {
        Ok(version) => Ok(version.without_build_metadata()),
        Err(VersionError::TagParse { reason, .. }) => Err(VersionError::TagParse {
            tag: tag.to_string(),
            reason,
        }),
        Err(other) => Err(other),
    }
}

/// Remove the conventional `v` / `r` tag prefixes
pub fn strip_tag_prefix(tag: &str) -> &str {
    let tag = tag.strip_prefix('v').unwrap_or(tag);
    tag.strip_prefix('r').unwrap_or(tag)
}

fn usable_sha(sha: Option<&str>) -> Option<&str> {
    let sha = sha?;
    if sha.chars().count() == SHORT_SHA_LEN && is_identifier(sha) {
        Some(sha)
    } else {
        warn!(sha, "ignoring short sha, it is not {} alphanumeric characters", SHORT_SHA_LEN);
        None
    }
}
