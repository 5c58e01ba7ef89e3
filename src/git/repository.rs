use std::path::Path;

use git2::{ErrorCode, Oid, Repository as Git2Repo};

use crate::error::{HelmReleaseError, Result};
use crate::git::RepoStateProvider;
use crate::resolver::SHORT_SHA_LEN;

/// Name reported for HEAD when no branch is checked out
pub const DETACHED_HEAD_NAME: &str = "HEAD";

/// A tag peeled down to the commit it marks
#[derive(Debug, Clone, PartialEq, Eq)]
struct TagTarget {
    name: String,
    commit: Oid,
    annotated: bool,
}

/// Repository state read through `git2`
pub struct Git2Provider {
    repo: Git2Repo,
}

impl Git2Provider {
    /// Open the repository containing `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| {
            HelmReleaseError::vcs_query(format!(
                "{} is not inside a git repository: {}",
                path.display(),
                e.message()
            ))
        })?;

        Ok(Git2Provider { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Provider { repo }
    }

    fn head_oid(&self) -> Result<Oid> {
        let head = self.repo.head().map_err(|e| match e.code() {
            ErrorCode::UnbornBranch => HelmReleaseError::vcs_query("repository has no commits"),
            _ => HelmReleaseError::from(e),
        })?;
        Ok(head.peel_to_commit()?.id())
    }

    /// Every tag that resolves to a commit; tags of trees or blobs are skipped
    fn tag_targets(&self) -> Result<Vec<TagTarget>> {
        let mut targets = Vec::new();

        for name in self.repo.tag_names(None)?.iter().flatten() {
            let Ok(reference) = self.repo.find_reference(&format!("refs/tags/{}", name)) else {
                continue;
            };
            let Ok(commit) = reference.peel_to_commit() else {
                continue;
            };

            targets.push(TagTarget {
                name: name.to_string(),
                commit: commit.id(),
                annotated: reference.peel_to_tag().is_ok(),
            });
        }

        Ok(targets)
    }

    /// Tag reachable from HEAD with the fewest commits in between, and that
    /// commit count.
    ///
    /// Equal distances are broken by the lexically greatest tag name.
    fn nearest_tag(&self) -> Result<Option<(TagTarget, u64)>> {
        let targets = self.tag_targets()?;
        if targets.is_empty() {
            return Ok(None);
        }

        let head = self.head_oid()?;
        let mut nearest: Option<(TagTarget, u64)> = None;

        for target in targets {
            if target.commit != head && !self.repo.graph_descendant_of(head, target.commit)? {
                continue;
            }

            let distance = self.count_commits(head, Some(target.commit))?;
            let closer = match &nearest {
                None => true,
                Some((best, best_distance)) => {
                    distance < *best_distance
                        || (distance == *best_distance && target.name > best.name)
                }
            };
            if closer {
                nearest = Some((target, distance));
            }
        }

        Ok(nearest)
    }

    /// Commits reachable from `head` but not from `hide`
    fn count_commits(&self, head: Oid, hide: Option<Oid>) -> Result<u64> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(head)?;
        if let Some(hide) = hide {
            revwalk.hide(hide)?;
        }

        let mut count = 0u64;
        for oid in revwalk {
            oid?;
            count += 1;
        }
        Ok(count)
    }
}

impl RepoStateProvider for Git2Provider {
    fn last_tag(&self) -> Result<Option<String>> {
        Ok(self.nearest_tag()?.map(|(tag, _)| tag.name))
    }

    fn commits_since_tag(&self) -> Result<u64> {
        match self.nearest_tag()? {
            Some((_, distance)) => Ok(distance),
            None => self.count_commits(self.head_oid()?, None),
        }
    }

    fn short_sha(&self) -> Result<Option<String>> {
        let full = self.head_oid()?.to_string();
        Ok(Some(full[..SHORT_SHA_LEN].to_string()))
    }

    fn branch_name(&self) -> Result<String> {
        if self.repo.head_detached()? {
            return Ok(DETACHED_HEAD_NAME.to_string());
        }

        let head = self.repo.head()?;
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| HelmReleaseError::vcs_query("HEAD does not name a branch"))
    }

    fn is_exactly_at_tag(&self) -> Result<bool> {
        let head = self.head_oid()?;
        Ok(self
            .tag_targets()?
            .iter()
            .any(|t| t.annotated && t.commit == head))
    }
}
