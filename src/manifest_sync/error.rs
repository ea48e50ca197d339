use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("No manifest locations configured")]
    NoLocations,

    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The stored revision token is stale; someone else wrote in between.
    #[error("Manifest at {location} changed since it was read")]
    Conflict { location: String },

    #[error("Manifest content is not valid base64: {0}")]
    Decode(String),

    #[error("Malformed manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected manifest shape: {0}")]
    Shape(String),

    #[error("Product \"{0}\" not found in manifest")]
    NotFound(String),
}
