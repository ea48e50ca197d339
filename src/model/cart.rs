//! Cart types.
//!
//! A cart holds at most one [`CartEntry`] per [`CartKey`]. How the key is derived is
//! a [`CartKeyPolicy`]: the legacy behaviour keyed entries by bare product name, which
//! makes same-named products in different groups overwrite each other.
use crate::model::Product;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifies a cart entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartKey(pub String);

impl Display for CartKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How cart keys are derived from a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartKeyPolicy {
    /// Key = group name + product name.
    #[default]
    GroupScoped,
    /// Key = product name only.
    ProductName,
}

impl CartKeyPolicy {
    pub fn key_for(&self, group_name: &str, product_name: &str) -> CartKey {
        match self {
            CartKeyPolicy::GroupScoped => CartKey(format!("{group_name}::{product_name}")),
            CartKeyPolicy::ProductName => CartKey(product_name.to_string()),
        }
    }
}

/// How many sets a selection asks for. Only one to three can be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetCount {
    One,
    Two,
    Three,
}

impl SetCount {
    pub fn get(self) -> u8 {
        match self {
            SetCount::One => 1,
            SetCount::Two => 2,
            SetCount::Three => 3,
        }
    }
}

impl TryFrom<u8> for SetCount {
    type Error = SelectionError;

    fn try_from(count: u8) -> Result<Self, Self::Error> {
        match count {
            1 => Ok(SetCount::One),
            2 => Ok(SetCount::Two),
            3 => Ok(SetCount::Three),
            other => Err(SelectionError::InvalidSetCount(other)),
        }
    }
}

/// What the user asked for: a fixed set count or a freeform note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Selection {
    Sets(SetCount),
    Note(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("set count must be 1, 2 or 3, got {0}")]
    InvalidSetCount(u8),
    #[error("unrecognised selection: {0:?}")]
    Unrecognised(String),
}

const NOTE_PREFIX: &str = "Note: ";

impl Selection {
    pub fn sets(count: u8) -> Result<Self, SelectionError> {
        SetCount::try_from(count).map(Selection::Sets)
    }

    pub fn note(text: impl Into<String>) -> Self {
        Selection::Note(text.into())
    }

    pub fn is_note(&self) -> bool {
        matches!(self, Selection::Note(_))
    }
}

impl Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::Sets(SetCount::One) => write!(f, "1 Set"),
            Selection::Sets(n) => write!(f, "{} Sets", n.get()),
            Selection::Note(text) => write!(f, "{NOTE_PREFIX}{text}"),
        }
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        selection.to_string()
    }
}

impl TryFrom<String> for Selection {
    type Error = SelectionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "1 Set" => Ok(Selection::Sets(SetCount::One)),
            "2 Sets" => Ok(Selection::Sets(SetCount::Two)),
            "3 Sets" => Ok(Selection::Sets(SetCount::Three)),
            _ => match value.strip_prefix(NOTE_PREFIX) {
                Some(text) => Ok(Selection::Note(text.to_string())),
                None => Err(SelectionError::Unrecognised(value)),
            },
        }
    }
}

/// One line of the cart: a product snapshot plus the user's selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    #[serde(rename = "id")]
    pub key: CartKey,
    pub group_name: String,
    pub product: Product,
    pub selection: Selection,
}

impl CartEntry {
    /// Builds an entry whose key is derived from `policy`.
    pub fn new(
        policy: CartKeyPolicy,
        group_name: impl Into<String>,
        product: Product,
        selection: Selection,
    ) -> Self {
        let group_name = group_name.into();
        Self {
            key: policy.key_for(&group_name, &product.product_name),
            group_name,
            product,
            selection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_wire_format() {
        assert_eq!(Selection::sets(1).unwrap().to_string(), "1 Set");
        assert_eq!(Selection::sets(3).unwrap().to_string(), "3 Sets");
        assert_eq!(Selection::note("blue only").to_string(), "Note: blue only");
        assert_eq!(Selection::sets(4), Err(SelectionError::InvalidSetCount(4)));

        let parsed: Selection = serde_json::from_str("\"2 Sets\"").unwrap();
        assert_eq!(parsed, Selection::Sets(SetCount::Two));
        let parsed: Selection = serde_json::from_str("\"Note: call first\"").unwrap();
        assert_eq!(parsed, Selection::note("call first"));
        assert!(serde_json::from_str::<Selection>("\"Custom\"").is_err());
    }

    #[test]
    fn test_every_set_count_survives_serialization() {
        for count in 1..=3 {
            let selection = Selection::sets(count).unwrap();
            let json = serde_json::to_string(&selection).unwrap();
            let back: Selection = serde_json::from_str(&json).unwrap();
            assert_eq!(back, selection);
        }
        assert_eq!(SetCount::try_from(0), Err(SelectionError::InvalidSetCount(0)));
    }

    #[test]
    fn test_key_policies() {
        let scoped = CartKeyPolicy::GroupScoped.key_for("Acme", "Bolt");
        let other = CartKeyPolicy::GroupScoped.key_for("Zenith", "Bolt");
        assert_ne!(scoped, other);

        let bare = CartKeyPolicy::ProductName.key_for("Acme", "Bolt");
        assert_eq!(bare, CartKeyPolicy::ProductName.key_for("Zenith", "Bolt"));
        assert_eq!(bare.to_string(), "Bolt");
    }
}
