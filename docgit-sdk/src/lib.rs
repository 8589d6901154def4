//! # docgit-sdk
//!
//! Blocking client for the docgit HTTP API.
//!
//! ## Example
//!
//! ```no_run
//! use docgit_sdk::DocgitClient;
//!
//! let client = DocgitClient::new("http://localhost:8000");
//! let project = client.add_project("/home/me/contracts").unwrap();
//!
//! let repo = client.project(&project);
//! for change in repo.status(&[]).unwrap() {
//!     println!("{} {}", change.status, change.path);
//! }
//! repo.commit("Weekly snapshot", &[]).unwrap();
//! ```

use anyhow::{bail, Result};
use docgit_core::{ChangeRecord, DependencyStatus, HistoryEntry};
use reqwest::blocking::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct DocgitClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

/// Operations on one registered project.
pub struct ProjectClient<'a> {
    client: &'a DocgitClient,
    project_path: String,
}

#[derive(Serialize)]
struct AddProjectRequest<'a> {
    path: &'a Path,
}

#[derive(Serialize)]
struct CommitRequest<'a> {
    message: &'a str,
    files: &'a [String],
}

#[derive(Serialize)]
struct RestoreRequest<'a> {
    commit_id: &'a str,
    file_name: &'a str,
}

#[derive(Serialize)]
struct CommitRef<'a> {
    commit_id: &'a str,
}

#[derive(Deserialize)]
struct AddProjectResponse {
    path: PathBuf,
}

#[derive(Deserialize)]
struct DiffResponse {
    diff: String,
}

#[derive(Deserialize)]
struct CommitResponse {
    success: bool,
    #[serde(default)]
    commit: Option<String>,
}

#[derive(Deserialize)]
struct RestoreResponse {
    restored_path: PathBuf,
}

impl DocgitClient {
    /// Create a new docgit client
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the docgit server (e.g., "http://localhost:8000")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn project(&self, project_path: impl AsRef<Path>) -> ProjectClient<'_> {
        ProjectClient {
            client: self,
            project_path: project_path.as_ref().to_string_lossy().into_owned(),
        }
    }

    /// Check server health
    pub fn health_check(&self) -> Result<bool> {
        let response = self.client.get(self.url("/health")).send()?;
        Ok(response.status().is_success())
    }

    pub fn projects(&self) -> Result<Vec<PathBuf>> {
        Ok(send(self.client.get(self.url("/api/projects")))?.json()?)
    }

    /// Initialize and register a project; returns its canonical path.
    pub fn add_project(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let request = AddProjectRequest {
            path: path.as_ref(),
        };
        let response: AddProjectResponse =
            send(self.client.post(self.url("/api/projects")).json(&request))?.json()?;
        Ok(response.path)
    }

    pub fn remove_project(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().to_string_lossy();
        send(
            self.client
                .delete(self.url("/api/projects"))
                .query(&[("path", path.as_ref())]),
        )?;
        Ok(())
    }

    /// Check the engine and converter on the server host
    pub fn doctor(&self) -> Result<Vec<DependencyStatus>> {
        Ok(send(self.client.get(self.url("/api/doctor")))?.json()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl ProjectClient<'_> {
    /// Ensure the project is initialized (idempotent)
    pub fn init(&self) -> Result<()> {
        send(self.post("/api/init"))?;
        Ok(())
    }

    pub fn status(&self, files: &[String]) -> Result<Vec<ChangeRecord>> {
        Ok(send(self.get("/api/status").query(&files_query(files)))?.json()?)
    }

    pub fn documents(&self) -> Result<Vec<String>> {
        Ok(send(self.get("/api/files"))?.json()?)
    }

    pub fn diff(&self, file_name: &str) -> Result<String> {
        let response: DiffResponse = send(self.get(&format!("/api/diff/{file_name}")))?.json()?;
        Ok(response.diff)
    }

    pub fn log(&self, files: &[String]) -> Result<Vec<HistoryEntry>> {
        Ok(send(self.get("/api/log").query(&files_query(files)))?.json()?)
    }

    /// Commit documents. Returns the new commit id, or `None` when nothing
    /// changed.
    pub fn commit(&self, message: &str, files: &[String]) -> Result<Option<String>> {
        let request = CommitRequest { message, files };
        let response: CommitResponse = send(self.post("/api/commit").json(&request))?.json()?;
        Ok(if response.success { response.commit } else { None })
    }

    /// Write a historical version beside the working copy; returns its path.
    pub fn restore(&self, commit_id: &str, file_name: &str) -> Result<PathBuf> {
        let request = RestoreRequest {
            commit_id,
            file_name,
        };
        let response: RestoreResponse = send(self.post("/api/restore").json(&request))?.json()?;
        Ok(response.restored_path)
    }

    /// Hard reset the whole project. Confirm with the user before calling.
    pub fn reset(&self, commit_id: &str) -> Result<()> {
        send(self.post("/api/reset").json(&CommitRef { commit_id }))?;
        Ok(())
    }

    /// Undo a commit with a new commit; returns the new commit id.
    pub fn revert(&self, commit_id: &str) -> Result<String> {
        let response: Value =
            send(self.post("/api/revert").json(&CommitRef { commit_id }))?.json()?;
        Ok(response["commit"].as_str().unwrap_or_default().to_string())
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .client
            .get(self.client.url(path))
            .query(&[("project_path", self.project_path.as_str())])
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .client
            .post(self.client.url(path))
            .query(&[("project_path", self.project_path.as_str())])
    }
}

/// One `files` pair per document name.
fn files_query(files: &[String]) -> Vec<(&'static str, &str)> {
    files.iter().map(|name| ("files", name.as_str())).collect()
}

/// Sends the request, turning an error response into its `error: detail` text.
fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send()?;
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body: Value = response.json().unwrap_or(Value::Null);
    match (body["error"].as_str(), body["detail"].as_str()) {
        (Some(kind), Some(detail)) => bail!("{kind}: {detail}"),
        _ => bail!("docgit server returned {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = DocgitClient::new("http://localhost:8000/");
        assert_eq!(client.base_url, "http://localhost:8000");
        assert_eq!(client.url("/health"), "http://localhost:8000/health");

        let project = client.project("/home/me/contracts");
        assert_eq!(project.project_path, "/home/me/contracts");
    }

    #[test]
    fn test_files_are_sent_as_repeated_pairs() {
        let files = vec!["a.docx".to_string(), "Smith, Jones.docx".to_string()];
        assert_eq!(
            files_query(&files),
            vec![("files", "a.docx"), ("files", "Smith, Jones.docx")]
        );
        assert!(files_query(&[]).is_empty());
    }
}
