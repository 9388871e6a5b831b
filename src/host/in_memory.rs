//! In-memory implementation of [`RepoHost`] for testing.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};

use super::{RepoHost, RepoPage, Repository, TreeEntry, TreeFetch};

/// A fixture-backed host: repositories are served in pages of a fixed
/// size, trees and blobs come from maps populated by the builder methods.
#[derive(Default)]
pub struct InMemoryHost {
    page_size: usize,
    repos: Vec<Repository>,
    trees: HashMap<String, Vec<TreeEntry>>,
    blobs: HashMap<String, Vec<u8>>,
    empty_repos: HashSet<String>,
    tree_errors: HashSet<String>,
    blob_errors: HashSet<String>,
    /// Number of times each listing page fails before succeeding.
    list_failures: Mutex<HashMap<u32, u32>>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self {
            page_size: 2,
            ..Self::default()
        }
    }

    /// Add a plain, scannable repository with one `go.mod` at the root.
    pub fn add_repo_with_manifest(&mut self, full_name: &str, manifest: &str) {
        self.add_repo(full_name, false, false);
        let name = short_name(full_name);
        let blob_url = format!("mem://{}/go.mod", full_name);
        self.trees.insert(
            name.to_string(),
            vec![TreeEntry {
                path: "go.mod".to_string(),
                url: blob_url.clone(),
            }],
        );
        self.blobs.insert(blob_url, manifest.as_bytes().to_vec());
    }

    pub fn add_repo(&mut self, full_name: &str, archived: bool, disabled: bool) {
        self.repos.push(Repository {
            full_name: full_name.to_string(),
            name: short_name(full_name).to_string(),
            default_branch: "main".to_string(),
            archived,
            disabled,
        });
    }

    pub fn set_tree(&mut self, repo_name: &str, entries: Vec<TreeEntry>) {
        self.trees.insert(repo_name.to_string(), entries);
    }

    pub fn set_blob(&mut self, url: &str, data: &[u8]) {
        self.blobs.insert(url.to_string(), data.to_vec());
    }

    pub fn mark_empty(&mut self, repo_name: &str) {
        self.empty_repos.insert(repo_name.to_string());
    }

    pub fn fail_tree(&mut self, repo_name: &str) {
        self.tree_errors.insert(repo_name.to_string());
    }

    pub fn fail_blob(&mut self, url: &str) {
        self.blob_errors.insert(url.to_string());
    }

    /// Make a listing page fail `count` times before succeeding.
    pub fn fail_list_page(&mut self, page: u32, count: u32) {
        self.list_failures.lock().unwrap().insert(page, count);
    }
}

impl RepoHost for InMemoryHost {
    fn list_repos(&self, _org: &str, page: u32) -> Result<RepoPage> {
        {
            let mut failures = self.list_failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(&page) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(anyhow!("injected listing failure for page {}", page));
                }
            }
        }

        let start = (page.saturating_sub(1) as usize) * self.page_size;
        let end = (start + self.page_size).min(self.repos.len());
        let repos = if start < self.repos.len() {
            self.repos[start..end].to_vec()
        } else {
            Vec::new()
        };
        let next_page = if end < self.repos.len() {
            Some(page + 1)
        } else {
            None
        };

        Ok(RepoPage { repos, next_page })
    }

    fn fetch_tree(&self, _org: &str, repo: &Repository, _recursive: bool) -> Result<TreeFetch> {
        if self.empty_repos.contains(&repo.name) {
            return Ok(TreeFetch::EmptyRepository);
        }
        if self.tree_errors.contains(&repo.name) {
            return Err(anyhow!("injected tree failure for {}", repo.full_name));
        }
        let entries = self
            .trees
            .get(&repo.name)
            .cloned()
            .unwrap_or_default();
        Ok(TreeFetch::Tree(entries))
    }

    fn fetch_blob(&self, url: &str) -> Result<Vec<u8>> {
        if self.blob_errors.contains(url) {
            return Err(anyhow!("injected blob failure for {}", url));
        }
        self.blobs
            .get(url)
            .cloned()
            .context(format!("blob not found: {}", url))
    }
}

fn short_name(full_name: &str) -> &str {
    full_name.rsplit('/').next().unwrap_or(full_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_splits_repos() {
        let mut host = InMemoryHost::new();
        for i in 0..5 {
            host.add_repo(&format!("org/repo{}", i), false, false);
        }

        let page1 = host.list_repos("org", 1).unwrap();
        assert_eq!(page1.repos.len(), 2);
        assert_eq!(page1.next_page, Some(2));

        let page3 = host.list_repos("org", 3).unwrap();
        assert_eq!(page3.repos.len(), 1);
        assert_eq!(page3.next_page, None);
    }

    #[test]
    fn test_injected_list_failures_are_consumed() {
        let mut host = InMemoryHost::new();
        host.add_repo("org/a", false, false);
        host.fail_list_page(1, 2);

        assert!(host.list_repos("org", 1).is_err());
        assert!(host.list_repos("org", 1).is_err());
        assert!(host.list_repos("org", 1).is_ok());
    }

    #[test]
    fn test_manifest_round_trip() {
        let mut host = InMemoryHost::new();
        host.add_repo_with_manifest("org/a", "require x/y v1.0.0\n");

        let repo = host.list_repos("org", 1).unwrap().repos[0].clone();
        let TreeFetch::Tree(entries) = host.fetch_tree("org", &repo, true).unwrap() else {
            panic!("expected a tree");
        };
        assert_eq!(entries[0].path, "go.mod");
        let data = host.fetch_blob(&entries[0].url).unwrap();
        assert_eq!(data, b"require x/y v1.0.0\n");
    }
}
