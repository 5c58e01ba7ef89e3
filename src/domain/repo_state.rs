/// Repository facts used to derive the next version.
///
/// Built once per run, either from a [`crate::git::RepoStateProvider`] or
/// directly in tests, and only ever read by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoState {
    /// Nearest reachable tag, if any
    pub last_tag: Option<String>,
    /// Commits between `last_tag` and HEAD (or all of HEAD without a tag)
    pub commits_since_tag: u64,
    /// Abbreviated HEAD hash, expected to be 7 characters
    pub short_sha: Option<String>,
    /// Raw branch name; `HEAD` when detached
    pub branch_name: String,
    /// Whether an annotated tag points at HEAD
    pub is_exactly_at_tag: bool,
}

impl RepoState {
    pub fn new(branch_name: impl Into<String>) -> Self {
        RepoState {
            last_tag: None,
            commits_since_tag: 0,
            short_sha: None,
            branch_name: branch_name.into(),
            is_exactly_at_tag: false,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.last_tag = Some(tag.into());
        self
    }

    pub fn with_commits(mut self, commits: u64) -> Self {
        self.commits_since_tag = commits;
        self
    }

    pub fn with_sha(mut self, sha: impl Into<String>) -> Self {
        self.short_sha = Some(sha.into());
        self
    }

    pub fn exactly_at_tag(mut self, tagged: bool) -> Self {
        self.is_exactly_at_tag = tagged;
        self
    }
}
