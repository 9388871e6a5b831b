//! CLI argument definitions for banish.

use clap::Parser;

/// Version string with build metadata from build.rs.
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_SHA"),
    " ",
    env!("BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "banish")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Audit a GitHub organization for banished module imports", long_about = None)]
#[command(
    after_help = "EXIT CODES:\n    0    scan completed, no banished imports\n    1    configuration error\n    2    banished imports found\n    3    malformed blacklist entry\n\nEXAMPLE:\n    banish --org my-org --modules github.com/old/sdk@2.0.0,github.com/dead/pkg"
)]
pub struct Cli {
    /// Organization to scan (required)
    #[arg(long, value_name = "ORG")]
    pub org: Option<String>,

    /// Banished modules as module[@minVersion], comma-separated
    /// (can be specified multiple times)
    #[arg(long, value_name = "MODULES", value_delimiter = ',')]
    pub modules: Vec<String>,

    /// Do not search repository trees recursively
    #[arg(long)]
    pub no_recurse: bool,

    /// Token to use for GitHub access (alternative to GITHUB_TOKEN env variable)
    #[arg(long, value_name = "TOKEN")]
    pub github_token: Option<String>,

    /// GitHub API base URL
    #[arg(long, value_name = "URL", default_value = "https://api.github.com")]
    pub api_url: String,
}
