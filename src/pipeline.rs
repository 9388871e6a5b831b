//! The staged scan pipeline.
//!
//! Three worker threads run for the life of the scan, joined by bounded
//! channels so a slow stage throttles the one above it:
//!
//! enumerate repos -> locate manifests -> check manifests -> aggregate
//!
//! Each stage reads its input to exhaustion and closes its output by
//! dropping the sender. Per-item failures are logged to stderr and the
//! item skipped; nothing short of a configuration error aborts the scan.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, SyncSender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use colored::Colorize;

use crate::audit::{evaluate_manifest, Violation};
use crate::blacklist::Blacklist;
use crate::host::{RepoHost, Repository, TreeFetch};
use crate::manifest::parse_go_mod;
use crate::report::{aggregate, Reporter, ScanSummary};

/// Channel capacity between stages. Small on purpose: it bounds both
/// memory and the number of fetched-but-unprocessed repositories.
const STAGE_BUFFER: usize = 10;

/// Manifest filename this scanner audits.
const MANIFEST_FILE: &str = "go.mod";

/// Listing-page retry budget. The same page is retried with exponential
/// backoff; exhaustion ends enumeration rather than looping forever.
const MAX_LIST_ATTEMPTS: u32 = 5;
#[cfg(not(test))]
const LIST_RETRY_BASE_MS: u64 = 250;
// Unit tests sleep through the real ladder otherwise.
#[cfg(test)]
const LIST_RETRY_BASE_MS: u64 = 1;
const MAX_LIST_RETRY_DELAY_MS: u64 = 30_000;

/// A repository plus the manifest locations found in its tree.
#[derive(Debug, Clone)]
pub struct ManifestEntry {
    pub repo: Repository,
    pub manifests: Vec<crate::host::TreeEntry>,
}

/// One manifest's outcome. Empty violations means the manifest passed.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub repo_name: String,
    pub manifest_path: String,
    pub violations: Vec<Violation>,
}

/// Scan configuration beyond the blacklist itself.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub org: String,
    pub recursive: bool,
}

/// Run a full scan: spawn the three stages, aggregate on the calling
/// thread, and return the totals.
pub fn run_scan(
    host: Arc<dyn RepoHost>,
    blacklist: Arc<Blacklist>,
    options: ScanOptions,
    reporter: &mut dyn Reporter,
    cancelled: Arc<AtomicBool>,
) -> ScanSummary {
    let (repo_tx, repo_rx) = std::sync::mpsc::sync_channel::<Repository>(STAGE_BUFFER);
    let (entry_tx, entry_rx) = std::sync::mpsc::sync_channel::<ManifestEntry>(STAGE_BUFFER);
    let (result_tx, result_rx) = std::sync::mpsc::sync_channel::<ScanResult>(STAGE_BUFFER);

    let enumerator = {
        let host = host.clone();
        let org = options.org.clone();
        let cancelled = cancelled.clone();
        thread::spawn(move || enumerate_repos(&*host, &org, repo_tx, &cancelled))
    };

    let locator = {
        let host = host.clone();
        let org = options.org.clone();
        let recursive = options.recursive;
        let cancelled = cancelled.clone();
        thread::spawn(move || locate_manifests(&*host, &org, recursive, repo_rx, entry_tx, &cancelled))
    };

    let checker = {
        let host = host.clone();
        let blacklist = blacklist.clone();
        let cancelled = cancelled.clone();
        thread::spawn(move || check_manifests(&*host, &blacklist, entry_rx, result_tx, &cancelled))
    };

    let summary = aggregate(result_rx, reporter, &cancelled);

    // The stages have either drained naturally or had their sends fail
    // when the downstream receiver dropped; either way they are done.
    let _ = enumerator.join();
    let _ = locator.join();
    let _ = checker.join();

    summary
}

/// Stage 1: page through the org listing, emitting live repositories.
fn enumerate_repos(
    host: &dyn RepoHost,
    org: &str,
    out: SyncSender<Repository>,
    cancelled: &AtomicBool,
) {
    let mut page = 1;

    loop {
        if cancelled.load(Ordering::Relaxed) {
            return;
        }

        let listing = match fetch_page_with_retry(host, org, page, cancelled) {
            Some(listing) => listing,
            None => return,
        };

        for repo in listing.repos {
            if repo.archived || repo.disabled {
                continue;
            }
            if out.send(repo).is_err() {
                return;
            }
        }

        match listing.next_page {
            Some(next) => page = next,
            None => return,
        }
    }
}

/// Retry one listing page with exponential backoff, logging each failure.
fn fetch_page_with_retry(
    host: &dyn RepoHost,
    org: &str,
    page: u32,
    cancelled: &AtomicBool,
) -> Option<crate::host::RepoPage> {
    for attempt in 0..MAX_LIST_ATTEMPTS {
        if cancelled.load(Ordering::Relaxed) {
            return None;
        }

        match host.list_repos(org, page) {
            Ok(listing) => return Some(listing),
            Err(e) => {
                eprintln!("{} {:#}", "⚠".yellow(), e);
                if attempt + 1 < MAX_LIST_ATTEMPTS {
                    thread::sleep(Duration::from_millis(backoff_delay_ms(attempt)));
                }
            }
        }
    }

    eprintln!(
        "{} giving up on repo listing page {} after {} attempts",
        "✗".red(),
        page,
        MAX_LIST_ATTEMPTS
    );
    None
}

/// Exponential backoff, capped so a long retry chain cannot stall a scan
/// for more than tens of seconds per page.
fn backoff_delay_ms(attempt: u32) -> u64 {
    let delay = LIST_RETRY_BASE_MS.saturating_mul(1u64 << attempt.min(63));
    delay.min(MAX_LIST_RETRY_DELAY_MS)
}

/// Stage 2: fetch each repository's tree and pick out manifest files.
fn locate_manifests(
    host: &dyn RepoHost,
    org: &str,
    recursive: bool,
    input: Receiver<Repository>,
    out: SyncSender<ManifestEntry>,
    cancelled: &AtomicBool,
) {
    for repo in input {
        if cancelled.load(Ordering::Relaxed) {
            return;
        }

        let entries = match host.fetch_tree(org, &repo, recursive) {
            Ok(TreeFetch::Tree(entries)) => entries,
            Ok(TreeFetch::EmptyRepository) => continue,
            Err(e) => {
                eprintln!("{} {:#}", "⚠".yellow(), e);
                continue;
            }
        };

        let manifests: Vec<_> = entries
            .into_iter()
            .filter(|e| e.path == MANIFEST_FILE || e.path.ends_with("/go.mod"))
            .collect();

        if manifests.is_empty() {
            continue;
        }

        if out.send(ManifestEntry { repo, manifests }).is_err() {
            return;
        }
    }
}

/// Stage 3: fetch and evaluate every located manifest.
fn check_manifests(
    host: &dyn RepoHost,
    blacklist: &Blacklist,
    input: Receiver<ManifestEntry>,
    out: SyncSender<ScanResult>,
    cancelled: &AtomicBool,
) {
    for entry in input {
        for manifest in &entry.manifests {
            if cancelled.load(Ordering::Relaxed) {
                return;
            }

            let data = match host.fetch_blob(&manifest.url) {
                Ok(data) => data,
                Err(e) => {
                    eprintln!("{} {:#}", "⚠".yellow(), e);
                    continue;
                }
            };

            let requirements = parse_go_mod(&data);
            let violations = evaluate_manifest(&requirements, blacklist);

            let result = ScanResult {
                repo_name: entry.repo.full_name.clone(),
                manifest_path: manifest.path.clone(),
                violations,
            };
            if out.send(result).is_err() {
                return;
            }
        }
    }
}
