//! Wire types for the hosted store's AJAX cart endpoints.
//!
//! Only the fields the storefront reads are modelled; everything else in the
//! store's cart JSON is ignored.

use serde::{Deserialize, Serialize};

/// A line of the hosted cart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteCartLine {
    /// Opaque line key used by `/cart/change.js`.
    pub key: String,
    /// Variant ID.
    pub id: u64,
    pub title: String,
    pub quantity: u32,
    /// Unit price in minor units.
    pub price: i64,
    /// Line total in minor units.
    pub line_price: i64,
}

/// Hosted cart as returned by `GET /cart.js`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteCartSummary {
    pub item_count: u32,
    /// Total in minor units.
    pub total_price: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub items: Vec<RemoteCartLine>,
}

/// Body of `POST /cart/add.js`.
#[derive(Debug, Serialize)]
pub(super) struct AddItems {
    pub items: Vec<AddItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct AddItem {
    pub id: u64,
    pub quantity: u32,
}

/// Body of `POST /cart/change.js`.
#[derive(Debug, Serialize)]
pub(super) struct ChangeLine<'a> {
    pub id: &'a str,
    pub quantity: u32,
}

/// Error body the store sends with 4xx responses.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub(super) fn into_message(self) -> Option<String> {
        self.description.or(self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_ignores_unknown_fields() {
        let json = r#"{
            "token": "c1-abc",
            "note": null,
            "item_count": 3,
            "total_price": 17600,
            "currency": "USD",
            "items": [{
                "key": "40123:9f1c",
                "id": 40123,
                "title": "Rise Leggings - M / Black",
                "quantity": 2,
                "price": 8800,
                "line_price": 17600,
                "vendor": "ATHYRE"
            }]
        }"#;

        let summary: RemoteCartSummary = serde_json::from_str(json).expect("parses");
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.total_price, 17600);
        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.items.first().map(|l| l.key.as_str()), Some("40123:9f1c"));
    }

    #[test]
    fn test_error_body_prefers_description() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"status": 422, "message": "Cart Error", "description": "Sold out"}"#,
        )
        .expect("parses");
        assert_eq!(body.into_message().as_deref(), Some("Sold out"));
    }
}
