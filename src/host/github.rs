//! GitHub REST implementation of [`RepoHost`].

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use ureq::Agent;

use super::{RepoHost, RepoPage, Repository, TreeEntry, TreeFetch};

const PER_PAGE: u32 = 100;

/// GitHub REST v3 client. One instance is shared by every pipeline stage.
pub struct GithubHost {
    agent: Agent,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ApiRepo {
    full_name: String,
    name: String,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    disabled: bool,
}

#[derive(Debug, Deserialize)]
struct ApiTree {
    #[serde(default)]
    tree: Vec<ApiTreeEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiTreeEntry {
    path: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "type", default)]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct ApiBlob {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

impl GithubHost {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            agent: Agent::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn get(&self, url: &str) -> Result<ureq::Response, ureq::Error> {
        self.agent
            .get(url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", concat!("banish/", env!("CARGO_PKG_VERSION")))
            .call()
    }
}

impl RepoHost for GithubHost {
    fn list_repos(&self, org: &str, page: u32) -> Result<RepoPage> {
        let url = format!(
            "{}/orgs/{}/repos?per_page={}&page={}",
            self.base_url, org, PER_PAGE, page
        );
        let response = self
            .get(&url)
            .map_err(|e| anyhow!("listing repos for {}: {}", org, e))?;

        let next_page = response.header("link").and_then(parse_next_page);

        let repos: Vec<ApiRepo> = serde_json::from_reader(response.into_reader())
            .with_context(|| format!("decoding repo listing page {} for {}", page, org))?;

        Ok(RepoPage {
            repos: repos
                .into_iter()
                .map(|r| Repository {
                    full_name: r.full_name,
                    name: r.name,
                    default_branch: r.default_branch.unwrap_or_else(|| "main".to_string()),
                    archived: r.archived,
                    disabled: r.disabled,
                })
                .collect(),
            next_page,
        })
    }

    fn fetch_tree(&self, org: &str, repo: &Repository, recursive: bool) -> Result<TreeFetch> {
        let mut url = format!(
            "{}/repos/{}/{}/git/trees/{}",
            self.base_url, org, repo.name, repo.default_branch
        );
        if recursive {
            url.push_str("?recursive=1");
        }

        let response = match self.get(&url) {
            Ok(response) => response,
            // 409: git repository is empty, nothing to scan.
            Err(ureq::Error::Status(409, _)) => return Ok(TreeFetch::EmptyRepository),
            Err(e) => return Err(anyhow!("fetching tree for {}: {}", repo.full_name, e)),
        };

        let tree: ApiTree = serde_json::from_reader(response.into_reader())
            .with_context(|| format!("decoding tree for {}", repo.full_name))?;

        Ok(TreeFetch::Tree(
            tree.tree
                .into_iter()
                .filter(|e| e.kind == "blob")
                .filter_map(|e| {
                    e.url.map(|url| TreeEntry { path: e.path, url })
                })
                .collect(),
        ))
    }

    fn fetch_blob(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .get(url)
            .map_err(|e| anyhow!("fetching blob {}: {}", url, e))?;

        let blob: ApiBlob = serde_json::from_reader(response.into_reader())
            .with_context(|| format!("decoding blob envelope {}", url))?;

        decode_blob_content(&blob).with_context(|| format!("decoding blob content {}", url))
    }
}

/// Unwrap the transport encoding around blob content.
fn decode_blob_content(blob: &ApiBlob) -> Result<Vec<u8>> {
    if !blob.encoding.is_empty() && blob.encoding != "base64" {
        anyhow::bail!("unsupported blob encoding {:?}", blob.encoding);
    }

    // The content field wraps base64 at 60 columns with embedded newlines.
    let packed: String = blob.content.split_whitespace().collect();
    Ok(BASE64.decode(packed.as_bytes())?)
}

/// Extract the next page number from a GitHub `Link` header.
///
/// The header looks like:
/// `<https://api.github.com/orgs/o/repos?page=3>; rel="next", <...>; rel="last"`
fn parse_next_page(link: &str) -> Option<u32> {
    for part in link.split(',') {
        let part = part.trim();
        if !part.ends_with("rel=\"next\"") {
            continue;
        }
        let url = part.split(';').next()?.trim();
        let url = url.strip_prefix('<')?.strip_suffix('>')?;
        for param in url.split('?').nth(1)?.split('&') {
            if let Some(value) = param.strip_prefix("page=") {
                return value.parse().ok();
            }
        }
    }
    None
}
