//! Shareable order summaries built from the cart.

use crate::model::CartEntry;
use std::fmt::Write as _;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("Cart is empty")]
    EmptyCart,
}

/// Chat-style plain text (`*bold*` names, `>` quoted selections).
pub fn order_summary_text(cart: &[CartEntry]) -> Result<String, ExportError> {
    if cart.is_empty() {
        return Err(ExportError::EmptyCart);
    }
    let mut message = String::from("*Order Summary*\n\n");
    for entry in cart {
        let _ = writeln!(
            message,
            "*{}*\n> {}\n",
            entry.product.product_name, entry.selection
        );
    }
    Ok(message)
}

const HTML_STYLE: &str = "body { font-family: Helvetica; padding: 20px; }\n\
table { width: 100%; border-collapse: collapse; }\n\
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }\n\
th { background-color: #f2f2f2; }\n\
h1 { text-align: center; }";

/// A standalone HTML document with one table row per cart entry, suitable for
/// printing to PDF.
pub fn order_summary_html(cart: &[CartEntry]) -> Result<String, ExportError> {
    if cart.is_empty() {
        return Err(ExportError::EmptyCart);
    }
    let mut rows = String::new();
    for entry in cart {
        let name = entry.product.product_name.as_str();
        let selection = entry.selection.to_string();
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td>{}</td></tr>",
            html_escape::encode_text(name),
            html_escape::encode_text(&selection)
        );
    }
    Ok(format!(
        "<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n{HTML_STYLE}\n</style>\n</head>\n\
<body>\n<h1>Order Summary</h1>\n<table>\n<tr><th>Product Name</th><th>Quantity / Note</th></tr>\n\
{rows}</table>\n</body>\n</html>\n"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CartKeyPolicy, Product, Selection, SetCount};

    fn cart() -> Vec<CartEntry> {
        vec![
            CartEntry::new(CartKeyPolicy::GroupScoped, "Acme", Product::new("Bolt"), Selection::Sets(SetCount::Two)),
            CartEntry::new(
                CartKeyPolicy::GroupScoped,
                "Zen",
                Product::new("Cup & Saucer"),
                Selection::note("blue <only>"),
            ),
        ]
    }

    #[test]
    fn test_text_summary_layout() {
        let text = order_summary_text(&cart()).unwrap();
        assert_eq!(
            text,
            "*Order Summary*\n\n*Bolt*\n> 2 Sets\n\n*Cup & Saucer*\n> Note: blue <only>\n\n"
        );
    }

    #[test]
    fn test_html_summary_escapes_cells() {
        let html = order_summary_html(&cart()).unwrap();
        assert!(html.contains("<tr><th>Product Name</th><th>Quantity / Note</th></tr>"));
        assert!(html.contains("<tr><td>Bolt</td><td>2 Sets</td></tr>"));
        assert!(html.contains("<td>Cup &amp; Saucer</td><td>Note: blue &lt;only&gt;</td>"));
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        assert_eq!(order_summary_text(&[]), Err(ExportError::EmptyCart));
        assert_eq!(order_summary_html(&[]), Err(ExportError::EmptyCart));
    }
}
