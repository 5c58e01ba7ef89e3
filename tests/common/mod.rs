#![allow(dead_code)]

use std::fs;
use std::path::Path;

use git2::{Oid, Repository, RepositoryInitOptions, Signature, Time};

pub const CHART: &str = "apiVersion: v2\nname: demo\nversion: 0.1.0\nappVersion: \"1.0\"\n";
pub const VALUES: &str = "replicaCount: 1\nimage:\n  repository: nginx\n  tag: stable\n";

/// Initialize a repository whose first branch is `master`
pub fn init_repo(path: &Path) -> Repository {
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("master");
    Repository::init_opts(path, &opts).unwrap()
}

pub fn commit(repo: &Repository, message: &str) -> Oid {
    let sig = Signature::now("Test", "test@example.com").unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

/// Create a commit with explicit parents and timestamp, without moving any ref
pub fn commit_at(repo: &Repository, parents: &[Oid], message: &str, seconds: i64) -> Oid {
    let sig = Signature::new("Test", "test@example.com", &Time::new(seconds, 0)).unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let parents: Vec<git2::Commit> = parents
        .iter()
        .map(|oid| repo.find_commit(*oid).unwrap())
        .collect();
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

    repo.commit(None, &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}

/// Point `master` (and so HEAD) at `target`
pub fn set_master(repo: &Repository, target: Oid) {
    repo.reference("refs/heads/master", target, true, "test")
        .unwrap();
}

pub fn annotated_tag(repo: &Repository, name: &str, target: Oid) {
    let sig = Signature::now("Test", "test@example.com").unwrap();
    let object = repo.find_object(target, None).unwrap();
    repo.tag(name, &object, &sig, name, false).unwrap();
}

pub fn lightweight_tag(repo: &Repository, name: &str, target: Oid) {
    let object = repo.find_object(target, None).unwrap();
    repo.tag_lightweight(name, &object, false).unwrap();
}

pub fn write_chart(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("Chart.yaml"), CHART).unwrap();
    fs::write(dir.join("values.yaml"), VALUES).unwrap();
}
