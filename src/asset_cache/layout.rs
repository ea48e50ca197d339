//! Deterministic on-disk layout for cached product images.
//!
//! `<root>/<sanitized group name>/<last path segment of the image URL>`
//!
//! Group names are sanitized by replacing every character outside `[A-Za-z0-9]` with
//! `_`, so two groups can each hold an image with the same file name.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    root: PathBuf,
}

/// Where one product image lives locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocation {
    pub dir: PathBuf,
    pub file: PathBuf,
}

impl AssetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local location for `remote_ref` within `group_name`.
    ///
    /// `None` when the URL has no usable last segment (e.g. it ends in `/`).
    pub fn locate(&self, group_name: &str, remote_ref: &str) -> Option<AssetLocation> {
        let file_name = cache_file_name(remote_ref)?;
        let dir = self.root.join(sanitize_group_name(group_name));
        let file = dir.join(file_name);
        Some(AssetLocation { dir, file })
    }
}

pub fn sanitize_group_name(group_name: &str) -> String {
    group_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Last path segment of a URL, ignoring any query string or fragment.
pub fn cache_file_name(remote_ref: &str) -> Option<&str> {
    let without_fragment = remote_ref.split('#').next().unwrap_or(remote_ref);
    let path = without_fragment.split('?').next().unwrap_or(without_fragment);
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() && name != "." && name != ".." => Some(name),
        _ => None,
    }
}
