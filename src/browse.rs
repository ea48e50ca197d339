//! Flattening the catalog into the rows a list view renders.

use crate::model::{Group, Product};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListingRow<'a> {
    /// A group header. `expanded` is the state to render, which a search forces on.
    Header { group: &'a Group, expanded: bool },
    Product {
        group_name: &'a str,
        product: &'a Product,
    },
}

/// Builds the visible rows for `query`.
///
/// With an empty (or all-whitespace) query every group gets a header and its
/// products are listed only when the group is expanded. Otherwise matching is a
/// case-insensitive substring test: a group whose name matches is shown whole, a
/// group with matching products shows just those, and anything else is left out.
/// Headers in search results are always expanded.
pub fn build_listing<'a>(groups: &'a [Group], query: &str) -> Vec<ListingRow<'a>> {
    let query = query.trim().to_lowercase();
    let mut rows = Vec::new();

    for group in groups {
        if query.is_empty() {
            rows.push(ListingRow::Header {
                group,
                expanded: group.is_expanded,
            });
            if group.is_expanded {
                rows.extend(product_rows(group, group.products.iter()));
            }
            continue;
        }

        if group.name.to_lowercase().contains(&query) {
            rows.push(ListingRow::Header {
                group,
                expanded: true,
            });
            rows.extend(product_rows(group, group.products.iter()));
            continue;
        }

        let matching: Vec<&Product> = group
            .products
            .iter()
            .filter(|p| p.product_name.to_lowercase().contains(&query))
            .collect();
        if !matching.is_empty() {
            rows.push(ListingRow::Header {
                group,
                expanded: true,
            });
            rows.extend(product_rows(group, matching.into_iter()));
        }
    }

    rows
}

fn product_rows<'a>(
    group: &'a Group,
    products: impl Iterator<Item = &'a Product> + 'a,
) -> impl Iterator<Item = ListingRow<'a>> + 'a {
    products.map(move |product| ListingRow::Product {
        group_name: &group.name,
        product,
    })
}
