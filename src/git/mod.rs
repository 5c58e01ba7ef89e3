//! Repository state providers
//!
//! The resolver only sees a [`RepoState`]. This module gathers the five
//! facts it needs from a [`RepoStateProvider`]:
//!
//! - [repository::Git2Provider]: reads a real repository with `git2`
//! - [overrides::OverridingProvider]: short-circuits individual facts from
//!   environment overrides, falling back to a wrapped provider
//! - [mock::MockProvider]: fixed facts for tests
//!
//! ```rust
//! # use helm_release::git::{collect_repo_state, MockProvider};
//! let provider = MockProvider::new("master").with_tag("v1.0.0").with_commits(2);
//! let state = collect_repo_state(&provider)?;
//! assert_eq!(state.commits_since_tag, 2);
//! # Ok::<(), helm_release::HelmReleaseError>(())
//! ```

pub mod mock;
pub mod overrides;
pub mod repository;

pub use mock::MockProvider;
pub use overrides::{OverridingProvider, RepoOverrides};
pub use repository::Git2Provider;

use crate::domain::RepoState;
use crate::error::Result;

/// Source of the repository facts used for version resolution.
///
/// Implementations map their underlying failures to
/// [`crate::error::HelmReleaseError::VcsQuery`] or
/// [`crate::error::HelmReleaseError::Git`].
pub trait RepoStateProvider {
    /// Nearest tag reachable from HEAD, lightweight tags included
    fn last_tag(&self) -> Result<Option<String>>;

    /// Commits from the last tag to HEAD, or every commit of HEAD when no
    /// tag is reachable
    fn commits_since_tag(&self) -> Result<u64>;

    /// Abbreviated hash of HEAD
    fn short_sha(&self) -> Result<Option<String>>;

    /// Current branch, `HEAD` when detached
    fn branch_name(&self) -> Result<String>;

    /// Whether an annotated tag points at HEAD
    fn is_exactly_at_tag(&self) -> Result<bool>;
}

/// Query every fact once and build the state for this run
pub fn collect_repo_state<P: RepoStateProvider + ?Sized>(provider: &P) -> Result<RepoState> {
    let state = RepoState {
        last_tag: provider.last_tag()?,
        commits_since_tag: provider.commits_since_tag()?,
        short_sha: provider.short_sha()?,
        branch_name: provider.branch_name()?,
        is_exactly_at_tag: provider.is_exactly_at_tag()?,
    };
    tracing::debug!(?state, "collected repository state");
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_from_mock() {
        let provider = MockProvider::new("develop")
            .with_tag("v0.2.0")
            .with_commits(7)
            .with_sha("1234abc");

        let state = collect_repo_state(&provider).unwrap();
        assert_eq!(
            state,
            RepoState::new("develop")
                .with_tag("v0.2.0")
                .with_commits(7)
                .with_sha("1234abc")
        );
    }

    #[test]
    fn test_collect_propagates_failure() {
        let provider = MockProvider::new("master").failing("git exploded");
        assert!(collect_repo_state(&provider).is_err());
    }
}
