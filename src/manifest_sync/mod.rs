//! # Remote Manifest Sync
//!
//! Edits the authoritative manifest in place: read the file and its revision token
//! from each configured location, change one product's `imageUrl`, and write it back
//! conditioned on that token.
//!
//! Locations are updated concurrently and independently. A location that fails is
//! logged and reported without affecting the others.

pub mod contents;
pub mod edit;
pub mod error;

pub use contents::*;
pub use edit::*;
pub use error::*;

use crate::config::ManifestLocation;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A location that could not be updated.
#[derive(Debug)]
pub struct LocationFailure {
    pub location: String,
    pub error: ManifestError,
}

/// Per-location result of [`ManifestSync::update_product_image`].
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// Labels of locations that were written.
    pub updated: Vec<String>,
    pub failed: Vec<LocationFailure>,
}

impl UpdateReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Clone)]
pub struct ManifestSync {
    client: ContentsClient,
    locations: Arc<[ManifestLocation]>,
}

impl ManifestSync {
    pub fn new(client: ContentsClient, locations: Vec<ManifestLocation>) -> Self {
        Self {
            client,
            locations: locations.into(),
        }
    }

    pub fn locations(&self) -> &[ManifestLocation] {
        &self.locations
    }

    /// Points `product_name` at `image_url` (typically the URL an upload service
    /// returned), or clears its image with `None`, in every location.
    ///
    /// Succeeds if at least one location was written; the report lists the rest.
    ///
    /// # Errors
    /// [`ManifestError::NoLocations`] when nothing is configured; otherwise the
    /// first location's error when every location failed.
    #[instrument(skip(self))]
    pub async fn update_product_image(
        &self,
        product_name: &str,
        image_url: Option<&str>,
    ) -> Result<UpdateReport, ManifestError> {
        if self.locations.is_empty() {
            return Err(ManifestError::NoLocations);
        }

        let message = format!("Update image for {product_name}");
        let attempts = self.locations.iter().map(|location| {
            let message = message.as_str();
            async move {
                let result = self
                    .update_location(location, product_name, image_url, message)
                    .await;
                (location.label(), result)
            }
        });

        let mut report = UpdateReport::default();
        for (label, result) in join_all(attempts).await {
            match result {
                Ok(matched) => {
                    info!(location = %label, matched, "Manifest updated");
                    report.updated.push(label);
                }
                Err(error) => {
                    warn!(location = %label, error = %error, "Manifest update failed");
                    report.failed.push(LocationFailure {
                        location: label,
                        error,
                    });
                }
            }
        }

        if report.updated.is_empty() {
            let first = report.failed.into_iter().next().map(|f| f.error);
            return Err(first.unwrap_or(ManifestError::NoLocations));
        }
        Ok(report)
    }

    async fn update_location(
        &self,
        location: &ManifestLocation,
        product_name: &str,
        image_url: Option<&str>,
        message: &str,
    ) -> Result<usize, ManifestError> {
        let ContentsFile { sha, mut document } = self.client.read(location).await?;
        let matched = set_product_image(&mut document, product_name, image_url)?;
        self.client.write(location, &document, &sha, message).await?;
        Ok(matched)
    }
}
