use super::FetchError;
use crate::model::Group;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Where the remote catalog comes from.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Fetches and decodes the whole manifest.
    async fn fetch_manifest(&self) -> Result<Vec<Group>, FetchError>;
}

/// Plain unauthenticated `GET <url>` returning a JSON array of groups.
#[derive(Debug, Clone)]
pub struct HttpManifestSource {
    http: reqwest::Client,
    url: String,
}

impl HttpManifestSource {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_manifest(&self) -> Result<Vec<Group>, FetchError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let groups: Vec<Group> = serde_json::from_slice(&body)?;
        debug!(groups = groups.len(), bytes = body.len(), "Manifest fetched");
        Ok(groups)
    }
}
