//! Repository-hosting backends.
//!
//! The pipeline only ever talks to the [`RepoHost`] trait; the GitHub
//! implementation lives in [`github`] and an in-memory double for tests
//! in [`in_memory`].

pub mod github;
pub mod in_memory;

use anyhow::Result;

/// One repository as reported by the host's org listing.
#[derive(Debug, Clone)]
pub struct Repository {
    /// `org/name` form, used in report lines.
    pub full_name: String,
    /// Bare name, used in tree-fetch URLs.
    pub name: String,
    pub default_branch: String,
    pub archived: bool,
    pub disabled: bool,
}

/// One file-tree entry with the handle to fetch its blob.
#[derive(Debug, Clone)]
pub struct TreeEntry {
    pub path: String,
    pub url: String,
}

/// One page of an org's repository listing.
#[derive(Debug, Clone)]
pub struct RepoPage {
    pub repos: Vec<Repository>,
    /// `None` when enumeration is complete.
    pub next_page: Option<u32>,
}

/// Outcome of a tree fetch.
#[derive(Debug, Clone)]
pub enum TreeFetch {
    Tree(Vec<TreeEntry>),
    /// The host reports the repository has no tree at all (for GitHub,
    /// the 409 returned for an empty repository). Not an error.
    EmptyRepository,
}

/// A hosted-repository service: list an org, fetch a tree, fetch a blob.
pub trait RepoHost: Send + Sync {
    /// Fetch one page of the org's repository listing.
    fn list_repos(&self, org: &str, page: u32) -> Result<RepoPage>;

    /// Fetch a repository's file tree at its default branch.
    fn fetch_tree(&self, org: &str, repo: &Repository, recursive: bool) -> Result<TreeFetch>;

    /// Fetch raw blob bytes by the handle a [`TreeEntry`] carries,
    /// decoded from any transport encoding.
    fn fetch_blob(&self, url: &str) -> Result<Vec<u8>>;
}
