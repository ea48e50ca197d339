//! Client for a source-hosting "contents" endpoint
//! (`GET`/`PUT {api_base}/repos/{owner}/{repo}/contents/{path}`).
//!
//! File bodies travel base64-encoded; writes are conditional on the blob `sha`
//! returned by the previous read.

use super::ManifestError;
use crate::config::ManifestLocation;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

const ACCEPT_CONTENTS: &str = "application/vnd.github.v3+json";
const CLIENT_AGENT: &str = concat!("catalog-sync/", env!("CARGO_PKG_VERSION"));

/// A decoded manifest and the revision token it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentsFile {
    pub sha: String,
    pub document: Value,
}

#[derive(Deserialize)]
struct ContentsResponse {
    sha: String,
    content: String,
}

#[derive(Serialize)]
struct ContentsUpdate<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
    branch: &'a str,
}

#[derive(Debug, Clone)]
pub struct ContentsClient {
    http: reqwest::Client,
}

impl ContentsClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    #[instrument(skip_all, fields(location = %location.label()))]
    pub async fn read(&self, location: &ManifestLocation) -> Result<ContentsFile, ManifestError> {
        let url = location.contents_url();
        let response = self
            .http
            .get(&url)
            .query(&[("ref", location.branch.as_str())])
            .bearer_auth(&location.token)
            .header(ACCEPT, ACCEPT_CONTENTS)
            .header(USER_AGENT, CLIENT_AGENT)
            .send()
            .await
            .map_err(|e| network(&url, e))?;

        let response = check_status(location, &url, response).await?;
        let body: ContentsResponse = response.json().await.map_err(|e| network(&url, e))?;

        // The API wraps base64 at 60 columns
        let packed: String = body.content.split_whitespace().collect();
        let bytes = STANDARD
            .decode(packed)
            .map_err(|e| ManifestError::Decode(e.to_string()))?;
        let document = serde_json::from_slice(&bytes)?;

        debug!(sha = %body.sha, bytes = bytes.len(), "Manifest read");
        Ok(ContentsFile {
            sha: body.sha,
            document,
        })
    }

    /// Writes `document` back, conditional on `sha`.
    ///
    /// Returns the new blob sha when the response carries one.
    #[instrument(skip_all, fields(location = %location.label()))]
    pub async fn write(
        &self,
        location: &ManifestLocation,
        document: &Value,
        sha: &str,
        message: &str,
    ) -> Result<Option<String>, ManifestError> {
        let url = location.contents_url();
        let pretty = serde_json::to_string_pretty(document)?;
        let update = ContentsUpdate {
            message,
            content: STANDARD.encode(pretty.as_bytes()),
            sha,
            branch: &location.branch,
        };

        let response = self
            .http
            .put(&url)
            .bearer_auth(&location.token)
            .header(ACCEPT, ACCEPT_CONTENTS)
            .header(USER_AGENT, CLIENT_AGENT)
            .json(&update)
            .send()
            .await
            .map_err(|e| network(&url, e))?;

        let response = check_status(location, &url, response).await?;
        let new_sha = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body["content"]["sha"].as_str().map(str::to_owned));

        debug!(new_sha = ?new_sha, "Manifest written");
        Ok(new_sha)
    }
}

fn network(url: &str, e: reqwest::Error) -> ManifestError {
    ManifestError::Network {
        url: url.to_string(),
        message: e.to_string(),
    }
}

async fn check_status(
    location: &ManifestLocation,
    url: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ManifestError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY {
        return Err(ManifestError::Conflict {
            location: location.label(),
        });
    }
    let body = response.text().await.unwrap_or_default();
    Err(ManifestError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}
