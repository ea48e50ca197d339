//! In-place edits of a raw manifest document.
//!
//! Works on [`serde_json::Value`] rather than the typed model so fields this crate
//! does not know about survive the round trip.

use super::ManifestError;
use serde_json::Value;

/// Sets (or, with `None`, nulls out) `imageUrl` on every product named `product_name`.
///
/// Returns how many products were changed.
///
/// # Errors
/// - [`ManifestError::Shape`] if the document is not an array of groups.
/// - [`ManifestError::NotFound`] if no product has that exact name.
pub fn set_product_image(
    document: &mut Value,
    product_name: &str,
    image_url: Option<&str>,
) -> Result<usize, ManifestError> {
    let groups = document
        .as_array_mut()
        .ok_or_else(|| ManifestError::Shape("top level is not an array".to_string()))?;

    let mut matched = 0;
    for group in groups.iter_mut() {
        let Some(products) = group.get_mut("products").and_then(Value::as_array_mut) else {
            continue;
        };
        for product in products.iter_mut() {
            if product.get("productName").and_then(Value::as_str) != Some(product_name) {
                continue;
            }
            let Some(fields) = product.as_object_mut() else {
                continue;
            };
            let value = image_url.map_or(Value::Null, |url| Value::String(url.to_string()));
            fields.insert("imageUrl".to_string(), value);
            matched += 1;
        }
    }

    if matched == 0 {
        return Err(ManifestError::NotFound(product_name.to_string()));
    }
    Ok(matched)
}
