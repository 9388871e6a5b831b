//! Scan reporting: the injected output sink and the result aggregator.
//!
//! Report formatting goes through the [`Reporter`] trait so the
//! aggregator never touches process-wide terminal state and tests can
//! capture output deterministically.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;

use colored::Colorize;

use crate::audit::Violation;
use crate::pipeline::ScanResult;

/// Sink for scan output, one method per line kind.
pub trait Reporter {
    fn pass(&mut self, repo_name: &str, manifest_path: &str);
    fn fail(&mut self, repo_name: &str, manifest_path: &str);
    fn issue(&mut self, violation: &Violation);
    fn summary(&mut self, manifests_with_issues: usize, total_issues: usize);
}

/// Colored terminal reporter: green PASS lines, red FAIL/detail lines.
#[derive(Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn pass(&mut self, repo_name: &str, manifest_path: &str) {
        println!("{}", format!("PASS {} {}", repo_name, manifest_path).green());
    }

    fn fail(&mut self, repo_name: &str, manifest_path: &str) {
        println!("{}", format!("FAIL {} {}", repo_name, manifest_path).red());
    }

    fn issue(&mut self, violation: &Violation) {
        let line = match (&violation.have_version, &violation.min_version) {
            (Some(have), Some(min)) => format!(
                "  mod imports {}@{} (min version is {})",
                violation.module, have, min
            ),
            _ => format!("  MOD IMPORTS {}", violation.module),
        };
        println!("{}", line.red());
    }

    fn summary(&mut self, manifests_with_issues: usize, total_issues: usize) {
        println!();
        println!(
            "{}",
            format!(
                "== {} repos had {} banished imports ==",
                manifests_with_issues, total_issues
            )
            .red()
        );
    }
}

/// Aggregate totals for one scan. `clean()` decides the process outcome.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub manifests_scanned: usize,
    pub manifests_with_issues: usize,
    pub total_issues: usize,
}

impl ScanSummary {
    pub fn clean(&self) -> bool {
        self.manifests_with_issues == 0
    }
}

/// Consume scan results in arrival order, emitting report lines and the
/// trailing summary (only when at least one violation was found).
pub fn aggregate(
    results: Receiver<ScanResult>,
    reporter: &mut dyn Reporter,
    cancelled: &AtomicBool,
) -> ScanSummary {
    let mut summary = ScanSummary::default();

    for result in results {
        if cancelled.load(Ordering::Relaxed) {
            break;
        }

        summary.manifests_scanned += 1;

        if result.violations.is_empty() {
            reporter.pass(&result.repo_name, &result.manifest_path);
            continue;
        }

        summary.manifests_with_issues += 1;
        summary.total_issues += result.violations.len();
        reporter.fail(&result.repo_name, &result.manifest_path);
        for violation in &result.violations {
            reporter.issue(violation);
        }
    }

    if summary.manifests_with_issues != 0 {
        reporter.summary(summary.manifests_with_issues, summary.total_issues);
    }

    summary
}
