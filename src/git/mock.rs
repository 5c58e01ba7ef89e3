use crate::error::{HelmReleaseError, Result};
use crate::git::RepoStateProvider;

/// Mock provider for testing without an actual repository
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    last_tag: Option<String>,
    commits: u64,
    sha: Option<String>,
    branch: String,
    exactly_at_tag: bool,
    failure: Option<String>,
}

impl MockProvider {
    /// Create a mock on `branch` with no tags or commits
    pub fn new(branch: impl Into<String>) -> Self {
        MockProvider {
            branch: branch.into(),
            ..Default::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.last_tag = Some(tag.into());
        self
    }

    pub fn with_commits(mut self, commits: u64) -> Self {
        self.commits = commits;
        self
    }

    pub fn with_sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = Some(sha.into());
        self
    }

    pub fn exactly_at_tag(mut self, tagged: bool) -> Self {
        self.exactly_at_tag = tagged;
        self
    }

    /// Make every query fail with a repository error
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(HelmReleaseError::vcs_query(message.clone())),
            None => Ok(()),
        }
    }
}

impl RepoStateProvider for MockProvider {
    fn last_tag(&self) -> Result<Option<String>> {
        self.check()?;
        Ok(self.last_tag.clone())
    }

    fn commits_since_tag(&self) -> Result<u64> {
        self.check()?;
        Ok(self.commits)
    }

    fn short_sha(&self) -> Result<Option<String>> {
        self.check()?;
        Ok(self.sha.clone())
    }

    fn branch_name(&self) -> Result<String> {
        self.check()?;
        Ok(self.branch.clone())
    }

    fn is_exactly_at_tag(&self) -> Result<bool> {
        self.check()?;
        Ok(self.exactly_at_tag)
    }
}
