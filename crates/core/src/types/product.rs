//! Catalog product records.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A purchasable catalog product.
///
/// Products are built once when the catalog is loaded and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// URL-safe handle used in product paths.
    pub handle: String,
    pub title: String,
    pub price: Price,
    /// Image URLs in display order.
    pub images: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub rating: f32,
    pub reviews: u32,
    pub category: String,
    #[serde(default)]
    pub is_new: bool,
}

impl Product {
    /// Whether `size` is one of the sizes this product is offered in.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    /// Whether `color` is one of the colors this product is offered in.
    #[must_use]
    pub fn offers_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }

    /// The color preselected on product cards and quick add.
    #[must_use]
    pub fn default_color(&self) -> Option<&str> {
        self.colors.first().map(String::as_str)
    }

    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Image swapped in on hover; falls back to the primary image.
    #[must_use]
    pub fn hover_image(&self) -> Option<&str> {
        self.images
            .get(1)
            .or_else(|| self.images.first())
            .map(String::as_str)
    }
}
