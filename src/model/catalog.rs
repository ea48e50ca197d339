//! Catalog types: [`Product`] and its owning [`Group`] (a "brand").
//!
//! Field names on the wire follow the hosted manifest (`groupName`, `productName`,
//! `imageUrl`, ...). `localImagePath` and `isExpanded` only ever appear in the
//! locally persisted copy.
use serde::{Deserialize, Serialize};

/// A single catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_name: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub amount: f64,
    /// Remote image URL, if the product has one.
    #[serde(rename = "imageUrl", default)]
    pub remote_image_ref: Option<String>,
    /// Path of the locally cached copy of `remote_image_ref`.
    #[serde(rename = "localImagePath", default, skip_serializing_if = "Option::is_none")]
    pub local_image_ref: Option<String>,
}

/// Where a UI should load a product picture from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource<'a> {
    Local(&'a str),
    Remote(&'a str),
    Placeholder,
}

impl Product {
    /// Creates a product with no image and zeroed figures.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            product_name: name.into(),
            quantity: 0,
            rate: 0.0,
            amount: 0.0,
            remote_image_ref: None,
            local_image_ref: None,
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.remote_image_ref = Some(url.into());
        self
    }

    /// Cached file first, then the remote URL, then a placeholder.
    pub fn image_source(&self) -> ImageSource<'_> {
        match (&self.local_image_ref, &self.remote_image_ref) {
            (Some(local), _) => ImageSource::Local(local),
            (None, Some(remote)) => ImageSource::Remote(remote),
            (None, None) => ImageSource::Placeholder,
        }
    }
}

fn expanded_by_default() -> bool {
    true
}

/// A named collection of products, the catalog's top-level grouping unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(rename = "groupName")]
    pub name: String,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total_amount: f64,
    /// UI-only collapse state. Never present in the remote manifest.
    #[serde(default = "expanded_by_default")]
    pub is_expanded: bool,
}

impl Group {
    pub fn new(name: impl Into<String>, products: Vec<Product>) -> Self {
        let total_amount = products.iter().map(|p| p.amount).sum();
        Self {
            name: name.into(),
            products,
            total_amount,
            is_expanded: true,
        }
    }

    pub fn find_product(&self, product_name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.product_name == product_name)
    }
}
