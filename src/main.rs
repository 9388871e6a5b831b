//! CLI entry point for banish.
//!
//! Validation happens here rather than through clap `required` arguments
//! so the exit codes stay distinct: 1 for configuration errors, 2 when
//! banished imports are found, 3 for a malformed blacklist entry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;

use banish::blacklist::Blacklist;
use banish::cli::Cli;
use banish::host::github::GithubHost;
use banish::pipeline::{run_scan, ScanOptions};
use banish::report::ConsoleReporter;

const EXIT_OK: i32 = 0;
const EXIT_CONFIG: i32 = 1;
const EXIT_VIOLATIONS: i32 = 2;
const EXIT_BAD_BLACKLIST: i32 = 3;

fn main() {
    let cli = Cli::parse();
    std::process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    let org = match cli.org.as_deref().filter(|o| !o.is_empty()) {
        Some(org) => org.to_string(),
        None => {
            eprintln!("{} --org required and not provided", "✗".red());
            return EXIT_CONFIG;
        }
    };

    if cli.modules.iter().all(|m| m.trim().is_empty()) {
        eprintln!("{} --modules required and not provided", "✗".red());
        return EXIT_CONFIG;
    }

    let token = match cli
        .github_token
        .clone()
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .filter(|t| !t.is_empty())
    {
        Some(token) => token,
        None => {
            eprintln!(
                "{} --github-token required and not provided (GITHUB_TOKEN env variable also unset)",
                "✗".red()
            );
            return EXIT_CONFIG;
        }
    };

    let blacklist = match Blacklist::parse(&cli.modules) {
        Ok(blacklist) => blacklist,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red(), e);
            return EXIT_BAD_BLACKLIST;
        }
    };
    if blacklist.is_empty() {
        eprintln!("{} --modules required and not provided", "✗".red());
        return EXIT_CONFIG;
    }

    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = cancelled.clone();
        let _ = ctrlc::set_handler(move || {
            eprintln!("\n{} interrupt received, stopping scan...", "→".yellow());
            cancelled.store(true, Ordering::Relaxed);
        });
    }

    let host = GithubHost::new(&cli.api_url, &token);
    let summary = run_scan(
        Arc::new(host),
        Arc::new(blacklist),
        ScanOptions {
            org,
            recursive: !cli.no_recurse,
        },
        &mut ConsoleReporter,
        cancelled,
    );

    if summary.clean() {
        EXIT_OK
    } else {
        EXIT_VIOLATIONS
    }
}
