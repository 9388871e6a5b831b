//! Blacklist configuration: banished module prefixes with optional
//! minimum acceptable versions.
//!
//! Rules are loaded once at startup from the `--modules` flag and shared
//! read-only across the whole scan.

use anyhow::{bail, Context, Result};

use crate::version::ModVersion;

/// One banished module rule.
///
/// `min_version: None` means every version of modules under the prefix is
/// banished; `Some(v)` banishes only versions strictly below `v`.
#[derive(Debug, Clone)]
pub struct BlacklistRule {
    pub prefix: String,
    pub min_version: Option<ModVersion>,
}

/// The full ordered rule set for one scan.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    rules: Vec<BlacklistRule>,
}

impl Blacklist {
    /// Parse `module[@minVersion]` entries.
    ///
    /// Entries arrive comma-split from the CLI; blank entries (a trailing
    /// comma) are ignored. A malformed version is a configuration error,
    /// distinct from the missing-flag errors, so the caller can map it to
    /// its own exit code.
    pub fn parse(entries: &[String]) -> Result<Self> {
        let mut rules = Vec::new();

        for entry in entries {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }

            match entry.split_once('@') {
                None => rules.push(BlacklistRule {
                    prefix: normalize_prefix(entry, entry)?,
                    min_version: None,
                }),
                Some((prefix, raw_version)) => {
                    let prefix = normalize_prefix(prefix, entry)?;
                    let min = ModVersion::parse(raw_version)
                        .with_context(|| format!("blacklist entry {:?}", entry))?;
                    rules.push(BlacklistRule {
                        prefix,
                        min_version: Some(min),
                    });
                }
            }
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[BlacklistRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Strip a trailing `/` so a rule like `github.com/x/` still matches;
/// a trailing slash would otherwise leave an empty final segment that
/// matches nothing.
fn normalize_prefix(raw: &str, entry: &str) -> Result<String> {
    let prefix = raw.trim_end_matches('/');
    if prefix.is_empty() {
        bail!("blacklist entry {:?} has no module path", entry);
    }
    Ok(prefix.to_string())
}
