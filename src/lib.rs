//! # Banish - Organization-wide banished-import audit
//!
//! Banish scans every repository in a GitHub organization for `go.mod`
//! manifests that require a banished module, optionally below a minimum
//! acceptable version, and reports pass/fail per manifest.
//!
//! ## Overview
//!
//! A scan is a three-stage pipeline over bounded channels: repositories
//! are enumerated from the org listing, their file trees searched for
//! manifests, and each manifest fetched and evaluated against the
//! blacklist. Results stream to an injected reporter as they arrive.
//!
//! ## Core Concepts
//!
//! - **Blacklist rules**: banished module path prefixes, each with an
//!   optional minimum acceptable version
//! - **Coverage**: segment-exact prefix matching (`a/b` covers `a/b/c`
//!   but never `a/bc`), decided by a path trie
//! - **Violations**: one per (requirement, covering rule) pair that
//!   fails its version threshold
//!
//! ## Modules
//!
//! - [`blacklist`] - Rule parsing and the shared rule set
//! - [`trie`] - Segment-prefix matching
//! - [`version`] - Lenient semantic-version parsing and ordering
//! - [`manifest`] - Lenient `go.mod` parsing
//! - [`audit`] - Manifest evaluation against the blacklist
//! - [`host`] - Repository-hosting backends (GitHub, in-memory)
//! - [`pipeline`] - The staged, concurrent scan
//! - [`report`] - Output sink trait and result aggregation
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//! use std::sync::Arc;
//!
//! use banish::blacklist::Blacklist;
//! use banish::host::github::GithubHost;
//! use banish::pipeline::{run_scan, ScanOptions};
//! use banish::report::ConsoleReporter;
//!
//! let blacklist = Blacklist::parse(&["github.com/dead/pkg@2.0.0".to_string()])
//!     .expect("malformed blacklist");
//! let host = GithubHost::new("https://api.github.com", "token");
//!
//! let summary = run_scan(
//!     Arc::new(host),
//!     Arc::new(blacklist),
//!     ScanOptions { org: "my-org".to_string(), recursive: true },
//!     &mut ConsoleReporter,
//!     Arc::new(AtomicBool::new(false)),
//! );
//! assert!(summary.clean());
//! ```

pub mod audit;
pub mod blacklist;
pub mod cli;
pub mod host;
pub mod manifest;
pub mod pipeline;
pub mod report;
pub mod trie;
pub mod version;
