#![allow(dead_code)]
use std::path::Path;

use git2::{Commit, Oid, Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

use pullwatch_git::SyncConfig;

/// An upstream repository and a local clone of it, both on disk.
pub struct Fixture {
    pub upstream: Repository,
    pub local: Repository,
    upstream_dir: TempDir,
    local_dir: TempDir,
}

impl Fixture {
    /// Creates an upstream repository with one commit on `master` and a
    /// local clone tracking it as `origin`.
    pub fn new() -> Self {
        let upstream_dir = TempDir::new().expect("Failed to create upstream dir");
        let mut init = RepositoryInitOptions::new();
        init.initial_head("master");
        let upstream = Repository::init_opts(upstream_dir.path(), &init)
            .expect("Failed to init upstream repository");
        configure_identity(&upstream);
        commit_file(&upstream, "README.md", "hello\n", "initial commit");

        let local_dir = TempDir::new().expect("Failed to create local dir");
        let local = Repository::clone(
            upstream_dir.path().to_str().expect("non-utf8 temp path"),
            local_dir.path(),
        )
        .expect("Failed to clone upstream repository");
        configure_identity(&local);

        Self {
            upstream,
            local,
            upstream_dir,
            local_dir,
        }
    }

    /// Returns a SyncConfig pointing at the local clone.
    pub fn config(&self) -> SyncConfig {
        SyncConfig::builder()
            .target_path(self.local_dir.path())
            .branch("master")
            .build()
            .expect("Failed to build sync config")
    }

    /// Returns the path of the local clone.
    pub fn local_path(&self) -> &Path {
        self.local_dir.path()
    }

    /// Commits a file in the upstream repository.
    pub fn advance_upstream(&self, name: &str, content: &str, message: &str) -> Oid {
        commit_file(&self.upstream, name, content, message)
    }

    /// Commits a file in the local clone.
    pub fn advance_local(&self, name: &str, content: &str, message: &str) -> Oid {
        commit_file(&self.local, name, content, message)
    }

    /// Returns the local HEAD commit id, read fresh from disk.
    pub fn local_head(&self) -> Oid {
        let repo = Repository::open(self.local_dir.path()).expect("Failed to reopen local");
        repo.head()
            .expect("Failed to read HEAD")
            .peel_to_commit()
            .expect("HEAD is not a commit")
            .id()
    }

    /// Counts the commits reachable from the local HEAD.
    pub fn local_commit_count(&self) -> usize {
        let repo = Repository::open(self.local_dir.path()).expect("Failed to reopen local");
        let mut walk = repo.revwalk().expect("Failed to create revwalk");
        walk.push_head().expect("Failed to push HEAD");
        walk.count()
    }

    /// Returns the local HEAD commit, read fresh from disk, together
    /// with the repository that owns it.
    pub fn reopen_local(&self) -> Repository {
        Repository::open(self.local_dir.path()).expect("Failed to reopen local")
    }
}

/// A committer identity every fixture repository uses.
pub fn signature() -> Signature<'static> {
    Signature::now("Test User", "test@example.com").expect("Failed to create signature")
}

fn configure_identity(repo: &Repository) {
    let mut config = repo.config().expect("Failed to open repo config");
    config
        .set_str("user.name", "Test User")
        .expect("Failed to set user.name");
    config
        .set_str("user.email", "test@example.com")
        .expect("Failed to set user.email");
}

/// Writes `content` to `name` in the working tree and commits it.
pub fn commit_file(repo: &Repository, name: &str, content: &str, message: &str) -> Oid {
    let workdir = repo.workdir().expect("repository has no workdir");
    std::fs::write(workdir.join(name), content).expect("Failed to write file");

    let mut index = repo.index().expect("Failed to open index");
    index.add_path(Path::new(name)).expect("Failed to add path");
    index.write().expect("Failed to write index");
    let tree_id = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_id).expect("Failed to find tree");

    let parents: Vec<Commit<'_>> = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().expect("HEAD is not a commit")],
        Err(_) => vec![],
    };
    let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();

    let sig = signature();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .expect("Failed to commit")
}
