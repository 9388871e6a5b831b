//! Manifest evaluation against the blacklist.
//!
//! Produces one [`Violation`] per (requirement, covering rule) pair that
//! fails its version threshold, in requirement order then rule order.
//! Multiple rules covering the same module each emit their own violation.

use colored::Colorize;

use crate::blacklist::Blacklist;
use crate::manifest::Requirement;
use crate::trie::PathTrie;
use crate::version::ModVersion;

/// One banished import found in a manifest.
///
/// `min_version: None` means the covering rule bans every version, so no
/// observed version was parsed for it either.
#[derive(Debug, Clone)]
pub struct Violation {
    pub module: String,
    pub have_version: Option<ModVersion>,
    pub min_version: Option<ModVersion>,
}

/// Evaluate one manifest's requirements against the blacklist.
///
/// Indirect requirements are never audited. A requirement version that
/// fails to parse is logged and skipped without aborting the manifest.
pub fn evaluate_manifest(requirements: &[Requirement], blacklist: &Blacklist) -> Vec<Violation> {
    let mut violations = Vec::new();

    for req in requirements {
        if req.indirect {
            continue;
        }

        // Loading the module path and querying each rule prefix makes the
        // trie answer "is this prefix a segment-aligned prefix of the
        // path", which is exactly rule coverage.
        let mut path = PathTrie::new();
        path.insert(&req.module);

        // Parsed lazily: only manifests hitting a versioned rule pay for it.
        let mut have: Option<Result<ModVersion, ()>> = None;

        for rule in blacklist.rules() {
            if !path.partial_match(&rule.prefix) {
                continue;
            }

            let min = match &rule.min_version {
                None => {
                    violations.push(Violation {
                        module: req.module.clone(),
                        have_version: None,
                        min_version: None,
                    });
                    continue;
                }
                Some(min) => min,
            };

            let parsed = have.get_or_insert_with(|| {
                ModVersion::parse(&req.version).map_err(|e| {
                    eprintln!("{} {:#}", "⚠".yellow(), e);
                })
            });

            if let Ok(have_version) = parsed {
                if *have_version < *min {
                    violations.push(Violation {
                        module: req.module.clone(),
                        have_version: Some(have_version.clone()),
                        min_version: Some(min.clone()),
                    });
                }
            }
        }
    }

    violations
}
