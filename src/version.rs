//! Lenient semantic-version parsing and ordering for manifest versions.
//!
//! Go module versions are written with a leading `v` (`v1.2.3`) and
//! blacklist flags are often typed without patch components (`1.2`), so
//! strict semver parsing alone rejects too much. `ModVersion` normalizes
//! those forms before delegating to [`semver::Version`], which supplies
//! standard precedence (major, minor, patch, then pre-release).

use std::fmt;

use anyhow::{Context, Result};
use semver::Version;

/// An ordered module version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ModVersion(Version);

impl ModVersion {
    /// Parse a version string, tolerating a leading `v` and missing
    /// minor/patch components.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let bare = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let padded = pad_components(bare);
        let version = Version::parse(&padded)
            .with_context(|| format!("invalid version {:?}", raw))?;
        Ok(Self(version))
    }
}

impl fmt::Display for ModVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Pad `1` or `1.2` out to `1.0.0` / `1.2.0`, leaving any pre-release or
/// build suffix attached to the final component.
fn pad_components(bare: &str) -> String {
    // The suffix (-pre, +build) belongs after the padded core.
    let core_end = bare
        .find(|c| c == '-' || c == '+')
        .unwrap_or(bare.len());
    let (core, suffix) = bare.split_at(core_end);

    match core.split('.').count() {
        1 => format!("{}.0.0{}", core, suffix),
        2 => format!("{}.0{}", core, suffix),
        _ => bare.to_string(),
    }
}
