//! End-to-end scans over the in-memory host.

mod common;

use banish::host::in_memory::InMemoryHost;
use common::scan;

const BANNED: &str = "github.com/banned/pkg";

fn manifest_requiring(version: &str) -> String {
    format!(
        "module example.com/app\n\ngo 1.21\n\nrequire (\n\t{} {}\n\tgithub.com/fine/dep v1.4.2\n)\n",
        BANNED, version
    )
}

#[test]
fn test_version_below_minimum_fails_the_scan() {
    let mut host = InMemoryHost::new();
    host.add_repo_with_manifest("test-org/app", &manifest_requiring("v1.0.0"));

    let (summary, lines) = scan(host, &["github.com/banned/pkg@2.0.0"]);

    assert!(!summary.clean());
    assert_eq!(summary.manifests_with_issues, 1);
    assert_eq!(summary.total_issues, 1);
    assert_eq!(
        lines,
        [
            "FAIL test-org/app go.mod",
            "  mod imports github.com/banned/pkg@1.0.0 (min version is 2.0.0)",
            "== 1 repos had 1 banished imports ==",
        ]
    );
}

#[test]
fn test_version_at_or_above_minimum_passes() {
    let mut host = InMemoryHost::new();
    host.add_repo_with_manifest("test-org/app", &manifest_requiring("v2.5.0"));

    let (summary, lines) = scan(host, &["github.com/banned/pkg@2.0.0"]);

    assert!(summary.clean());
    assert_eq!(lines, ["PASS test-org/app go.mod"]);
}

#[test]
fn test_rule_without_version_bans_every_version() {
    for version in ["v0.0.1", "v2.5.0", "v99.0.0"] {
        let mut host = InMemoryHost::new();
        host.add_repo_with_manifest("test-org/app", &manifest_requiring(version));

        let (summary, lines) = scan(host, &["github.com/banned/pkg"]);

        assert!(!summary.clean(), "{} should be banished", version);
        assert_eq!(
            lines,
            [
                "FAIL test-org/app go.mod",
                "  MOD IMPORTS github.com/banned/pkg",
                "== 1 repos had 1 banished imports ==",
            ]
        );
    }
}

#[test]
fn test_archived_repo_is_never_scanned() {
    let mut host = InMemoryHost::new();
    host.add_repo("test-org/attic", true, false);
    // Give the archived repo a violating manifest anyway; enumeration
    // must drop it before the tree is ever fetched.
    host.set_tree(
        "attic",
        vec![banish::host::TreeEntry {
            path: "go.mod".to_string(),
            url: "mem://attic/go.mod".to_string(),
        }],
    );
    host.set_blob("mem://attic/go.mod", manifest_requiring("v1.0.0").as_bytes());

    let (summary, lines) = scan(host, &["github.com/banned/pkg"]);

    assert!(summary.clean());
    assert_eq!(summary.manifests_scanned, 0);
    assert!(lines.is_empty());
}

#[test]
fn test_disabled_repo_is_never_scanned() {
    let mut host = InMemoryHost::new();
    host.add_repo("test-org/broken", false, true);

    let (summary, _) = scan(host, &["github.com/banned/pkg"]);
    assert_eq!(summary.manifests_scanned, 0);
}

#[test]
fn test_indirect_requirement_never_fails() {
    let mut host = InMemoryHost::new();
    host.add_repo_with_manifest(
        "test-org/app",
        &format!("require {} v1.0.0 // indirect\n", BANNED),
    );

    let (summary, lines) = scan(host, &["github.com/banned/pkg"]);
    assert!(summary.clean());
    assert_eq!(lines, ["PASS test-org/app go.mod"]);
}

#[test]
fn test_one_repo_with_multiple_manifests_yields_one_result_each() {
    let mut host = InMemoryHost::new();
    host.add_repo("test-org/mono", false, false);
    host.set_tree(
        "mono",
        vec![
            banish::host::TreeEntry {
                path: "go.mod".to_string(),
                url: "mem://mono/go.mod".to_string(),
            },
            banish::host::TreeEntry {
                path: "services/worker/go.mod".to_string(),
                url: "mem://mono/services/worker/go.mod".to_string(),
            },
            banish::host::TreeEntry {
                path: "README.md".to_string(),
                url: "mem://mono/README.md".to_string(),
            },
        ],
    );
    host.set_blob("mem://mono/go.mod", b"require github.com/fine/dep v1.0.0\n");
    host.set_blob(
        "mem://mono/services/worker/go.mod",
        manifest_requiring("v1.0.0").as_bytes(),
    );

    let (summary, lines) = scan(host, &["github.com/banned/pkg@2.0.0"]);

    assert_eq!(summary.manifests_scanned, 2);
    assert_eq!(summary.manifests_with_issues, 1);
    assert!(lines.contains(&"PASS test-org/mono go.mod".to_string()));
    assert!(lines.contains(&"FAIL test-org/mono services/worker/go.mod".to_string()));
}

#[test]
fn test_multiple_covering_rules_each_report() {
    let mut host = InMemoryHost::new();
    host.add_repo_with_manifest(
        "test-org/app",
        "require github.com/banned/pkg/sub v1.0.0\n",
    );

    let (summary, lines) = scan(
        host,
        &["github.com/banned/pkg", "github.com/banned/pkg/sub@2.0.0"],
    );

    assert_eq!(summary.total_issues, 2);
    assert_eq!(
        lines,
        [
            "FAIL test-org/app go.mod",
            "  MOD IMPORTS github.com/banned/pkg/sub",
            "  mod imports github.com/banned/pkg/sub@1.0.0 (min version is 2.0.0)",
            "== 1 repos had 2 banished imports ==",
        ]
    );
}

#[test]
fn test_prefix_rule_does_not_cover_textual_sibling() {
    let mut host = InMemoryHost::new();
    host.add_repo_with_manifest("test-org/app", "require github.com/banned/pkgsuffix v1.0.0\n");

    let (summary, _) = scan(host, &["github.com/banned/pkg"]);
    assert!(summary.clean());
}

#[test]
fn test_scan_spans_multiple_listing_pages() {
    // The in-memory host pages at 2 repos per page.
    let mut host = InMemoryHost::new();
    for i in 0..5 {
        host.add_repo_with_manifest(
            &format!("test-org/app{}", i),
            &manifest_requiring("v1.0.0"),
        );
    }

    let (summary, _) = scan(host, &["github.com/banned/pkg@2.0.0"]);
    assert_eq!(summary.manifests_scanned, 5);
    assert_eq!(summary.manifests_with_issues, 5);
}

#[test]
fn test_scan_is_idempotent_across_runs() {
    let build = || {
        let mut host = InMemoryHost::new();
        host.add_repo_with_manifest("test-org/a", &manifest_requiring("v1.0.0"));
        host.add_repo_with_manifest("test-org/b", "require github.com/fine/dep v1.0.0\n");
        host.add_repo("test-org/attic", true, false);
        host
    };

    let (first_summary, mut first_lines) = scan(build(), &["github.com/banned/pkg@2.0.0"]);
    let (second_summary, mut second_lines) = scan(build(), &["github.com/banned/pkg@2.0.0"]);

    assert_eq!(first_summary, second_summary);
    // Arrival order across repos is not guaranteed; compare as sets.
    first_lines.sort();
    second_lines.sort();
    assert_eq!(first_lines, second_lines);
}
