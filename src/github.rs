//! GitHub REST client and response models.
//!
//! Three read-only operations back the whole app: list a user's repositories,
//! list a directory inside a repository, and download raw file content. Every
//! call is a single blocking request with no retry; callers run them on
//! background job threads.

use std::io::Read as _;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const API_BASE: &str = "https://api.github.com";

/// Repositories fetched per user, newest activity first.
pub const REPO_PAGE_SIZE: usize = 12;

/// Cap on raw downloads (files and images).
const MAX_DOWNLOAD_BYTES: u64 = 20 * 1024 * 1024;

#[derive(Debug, Clone, Error)]
pub enum GitHubError {
    #[error("GitHub user '{0}' not found")]
    UserNotFound(String),
    #[error("could not load contents: {0}")]
    FetchFailed(String),
    #[error("could not download file: {0}")]
    DownloadFailed(String),
    #[error("failed to parse notebook JSON: {0}")]
    ParseFailed(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub default_branch: String,
    pub owner: RepoOwner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

/// One record from a directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub size: u64,
    /// Raw-content URL; `None` for directories, submodules and some symlinks.
    #[serde(default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

impl RepoEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// The contents endpoint answers with an array for a directory and a single
/// object when the path names a file.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Many(Vec<RepoEntry>),
    One(RepoEntry),
}

pub struct Client {
    agent: ureq::Agent,
    token: Option<String>,
}

impl Client {
    pub fn new(token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(30))
            .build();
        Self { agent, token }
    }

    fn get(&self, url: &str) -> ureq::Request {
        let mut request = self
            .agent
            .get(url)
            .set("User-Agent", concat!("gitfolio/", env!("CARGO_PKG_VERSION")))
            .set("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }
        request
    }

    /// Public repositories of `user`, most recently updated first.
    pub fn list_repos(&self, user: &str) -> Result<Vec<Repo>, GitHubError> {
        let url = format!(
            "{}/users/{}/repos?sort=updated&per_page={}",
            API_BASE, user, REPO_PAGE_SIZE
        );
        let response = match self.get(&url).call() {
            Ok(r) => r,
            Err(ureq::Error::Status(404, _)) => {
                return Err(GitHubError::UserNotFound(user.to_string()));
            }
            Err(ureq::Error::Status(code, _)) => {
                return Err(GitHubError::FetchFailed(format!("HTTP {}", code)));
            }
            Err(e) => return Err(GitHubError::FetchFailed(e.to_string())),
        };
        response
            .into_json()
            .map_err(|e| GitHubError::FetchFailed(e.to_string()))
    }

    /// Entries of `path` inside a repository; the empty path is the root.
    pub fn list_dir(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<RepoEntry>, GitHubError> {
        let url = if path.is_empty() {
            format!("{}/repos/{}/{}/contents", API_BASE, owner, repo)
        } else {
            format!("{}/repos/{}/{}/contents/{}", API_BASE, owner, repo, path)
        };
        let response = match self.get(&url).call() {
            Ok(r) => r,
            Err(ureq::Error::Status(code, _)) => {
                return Err(GitHubError::FetchFailed(format!("HTTP {}", code)));
            }
            Err(e) => return Err(GitHubError::FetchFailed(e.to_string())),
        };
        let listing: Listing = response
            .into_json()
            .map_err(|e| GitHubError::FetchFailed(e.to_string()))?;
        Ok(normalize_listing(listing))
    }

    /// Raw text content behind a download URL.
    pub fn fetch_raw(&self, url: &str) -> Result<String, GitHubError> {
        let response = match self.get(url).call() {
            Ok(r) => r,
            Err(ureq::Error::Status(code, _)) => {
                return Err(GitHubError::DownloadFailed(format!("HTTP {}", code)));
            }
            Err(e) => return Err(GitHubError::DownloadFailed(e.to_string())),
        };
        let mut text = String::new();
        response
            .into_reader()
            .take(MAX_DOWNLOAD_BYTES)
            .read_to_string(&mut text)
            .map_err(|e| GitHubError::DownloadFailed(e.to_string()))?;
        Ok(text)
    }

    /// Raw bytes behind a download URL, for image payloads.
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, GitHubError> {
        let response = match self.get(url).call() {
            Ok(r) => r,
            Err(ureq::Error::Status(code, _)) => {
                return Err(GitHubError::DownloadFailed(format!("HTTP {}", code)));
            }
            Err(e) => return Err(GitHubError::DownloadFailed(e.to_string())),
        };
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_DOWNLOAD_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|e| GitHubError::DownloadFailed(e.to_string()))?;
        Ok(bytes)
    }
}

fn normalize_listing(listing: Listing) -> Vec<RepoEntry> {
    let mut entries = match listing {
        Listing::Many(entries) => entries,
        Listing::One(entry) => vec![entry],
    };
    sort_entries(&mut entries);
    entries
}

/// Directories first, then everything else, each group by name.
pub fn sort_entries(entries: &mut [RepoEntry]) {
    entries.sort_by(|a, b| match (a.is_dir(), b.is_dir()) {
        (true, false) => std::cmp::Ordering::Less,
        (false, true) => std::cmp::Ordering::Greater,
        _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: EntryKind) -> RepoEntry {
        RepoEntry {
            name: name.to_string(),
            path: name.to_string(),
            kind,
            size: 0,
            download_url: None,
        }
    }

    #[test]
    fn sort_puts_directories_before_files() {
        let mut entries = vec![entry("b", EntryKind::File), entry("A", EntryKind::Dir)];
        sort_entries(&mut entries);
        assert_eq!(entries[0].name, "A");
        assert!(entries[0].is_dir());
        assert_eq!(entries[1].name, "b");
    }

    #[test]
    fn sort_is_case_insensitive_within_groups() {
        let mut entries = vec![
            entry("Zeta.rs", EntryKind::File),
            entry("alpha.rs", EntryKind::File),
            entry("Beta.rs", EntryKind::File),
        ];
        sort_entries(&mut entries);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["alpha.rs", "Beta.rs", "Zeta.rs"]);
    }

    #[test]
    fn listing_accepts_single_file_object() {
        let json = r#"{
            "name": "main.rs",
            "path": "src/main.rs",
            "type": "file",
            "size": 512,
            "download_url": "https://raw.example/main.rs"
        }"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        let entries = normalize_listing(listing);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "src/main.rs");
        assert_eq!(entries[0].kind, EntryKind::File);
    }

    #[test]
    fn listing_accepts_directory_array() {
        let json = r#"[
            {"name": "src", "path": "src", "type": "dir", "size": 0, "download_url": null},
            {"name": "Cargo.toml", "path": "Cargo.toml", "type": "file", "size": 80,
             "download_url": "https://raw.example/Cargo.toml"}
        ]"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        let entries = normalize_listing(listing);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_dir());
        assert!(entries[0].download_url.is_none());
    }

    #[test]
    fn repo_tolerates_missing_optional_fields() {
        let json = r#"{
            "id": 7,
            "name": "demo",
            "html_url": "https://github.com/nfe7/demo",
            "owner": {"login": "nfe7"}
        }"#;
        let repo: Repo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.name, "demo");
        assert!(repo.description.is_none());
        assert!(repo.language.is_none());
        assert_eq!(repo.stargazers_count, 0);
    }

    #[test]
    fn error_messages_are_user_readable() {
        let err = GitHubError::UserNotFound("ghost".to_string());
        assert_eq!(err.to_string(), "GitHub user 'ghost' not found");
        let err = GitHubError::FetchFailed("HTTP 403".to_string());
        assert!(err.to_string().contains("could not load contents"));
    }
}
