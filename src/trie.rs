//! Segment-keyed prefix trie over module paths.
//!
//! Blacklist coverage must be segment-exact: `foo/bar` is related to
//! `foo/bar/baz` but not to `foo/barn` or `foo/ba`. Splitting on `/` and
//! walking one whole segment per level makes substring false-positives
//! impossible and keeps lookup cost proportional to path depth rather than
//! to the number of stored paths.

use std::collections::HashMap;

/// A rooted tree whose edges are keyed by path segment.
///
/// There is no terminal marking: a query matches as soon as every one of
/// its segments finds an edge, so a query matches exactly when it is a
/// segment-aligned prefix of (or equal to) some inserted path.
#[derive(Debug, Default)]
pub struct PathTrie {
    edges: HashMap<String, PathTrie>,
}

impl PathTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a `/`-separated path, extending the tree one segment per level.
    pub fn insert(&mut self, path: &str) {
        let mut node = self;
        for segment in path.split('/') {
            node = node.edges.entry(segment.to_string()).or_default();
        }
    }

    /// Returns true if the path is found, even if only partially.
    ///
    /// Examples:
    /// - `foo/bar/baz` against a tree containing `foo/bar/baz` => true
    /// - `foo/bar` against a tree containing `foo/bar/baz` => true
    /// - `foo/bar/baz` against a tree containing `foo/bar` => false
    /// - `foo/ba` against a tree containing `foo/bar` => false
    pub fn partial_match(&self, path: &str) -> bool {
        let mut node = self;
        for segment in path.split('/') {
            match node.edges.get(segment) {
                Some(next) => node = next,
                None => return false,
            }
        }
        true
    }
}
