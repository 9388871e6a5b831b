//! Common test helpers for integration tests

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use banish::audit::Violation;
use banish::blacklist::Blacklist;
use banish::host::in_memory::InMemoryHost;
use banish::pipeline::{run_scan, ScanOptions};
use banish::report::{Reporter, ScanSummary};

/// Captures every report line for assertions.
#[derive(Default)]
pub struct RecordingReporter {
    pub lines: Vec<String>,
}

impl Reporter for RecordingReporter {
    fn pass(&mut self, repo_name: &str, manifest_path: &str) {
        self.lines.push(format!("PASS {} {}", repo_name, manifest_path));
    }

    fn fail(&mut self, repo_name: &str, manifest_path: &str) {
        self.lines.push(format!("FAIL {} {}", repo_name, manifest_path));
    }

    fn issue(&mut self, violation: &Violation) {
        let line = match (&violation.have_version, &violation.min_version) {
            (Some(have), Some(min)) => format!(
                "  mod imports {}@{} (min version is {})",
                violation.module, have, min
            ),
            _ => format!("  MOD IMPORTS {}", violation.module),
        };
        self.lines.push(line);
    }

    fn summary(&mut self, manifests_with_issues: usize, total_issues: usize) {
        self.lines.push(format!(
            "== {} repos had {} banished imports ==",
            manifests_with_issues, total_issues
        ));
    }
}

/// Run a full scan of the fixture host and capture summary plus output.
pub fn scan(host: InMemoryHost, blacklist: &[&str]) -> (ScanSummary, Vec<String>) {
    let entries: Vec<String> = blacklist.iter().map(|s| s.to_string()).collect();
    let blacklist = Blacklist::parse(&entries).expect("test blacklist must parse");

    let mut reporter = RecordingReporter::default();
    let summary = run_scan(
        Arc::new(host),
        Arc::new(blacklist),
        ScanOptions {
            org: "test-org".to_string(),
            recursive: true,
        },
        &mut reporter,
        Arc::new(AtomicBool::new(false)),
    );
    (summary, reporter.lines)
}
