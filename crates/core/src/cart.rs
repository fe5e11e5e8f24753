//! Cart aggregation.
//!
//! A [`Cart`] holds at most one [`CartLine`] per distinct
//! (product, size, color) selection. Adding the same selection again bumps
//! that line's quantity; driving a quantity to zero or below removes the line.
//! These are the same two verbs a hosted store's AJAX cart exposes
//! (`/cart/add.js` merges, `/cart/change.js` deletes on zero), so swapping the
//! in-memory cart for a remote one changes storage only.
//!
//! Totals are recomputed from the lines on every read and never cached.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CurrencyCode, Price, Product, ProductId};

/// Which part of a selection was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionField {
    Size,
    Color,
}

impl fmt::Display for SelectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size => f.write_str("size"),
            Self::Color => f.write_str("color"),
        }
    }
}

/// Errors returned by cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The requested size or color is not offered by the product.
    #[error("{product} is not offered in {field} {value:?}")]
    InvalidSelection {
        product: String,
        field: SelectionField,
        value: String,
    },
}

/// Identity of a cart line: one product in one size and one color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
}

/// A line key token could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed line key: {0:?}")]
pub struct LineKeyError(pub String);

impl LineKey {
    #[must_use]
    pub fn new(product_id: ProductId, size: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            product_id,
            size: size.into(),
            color: color.into(),
        }
    }

    /// Text form used in forms and JSON bodies.
    ///
    /// The size is length-prefixed (`{id}:{size_len}:{size}:{color}`) so no
    /// size or color value can make two keys render the same.
    #[must_use]
    pub fn token(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.product_id,
            self.size.len(),
            self.size,
            self.color
        )
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

impl FromStr for LineKey {
    type Err = LineKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || LineKeyError(s.to_string());

        let (id, rest) = s.split_once(':').ok_or_else(malformed)?;
        let product_id = id.parse::<ProductId>().map_err(|_| malformed())?;

        let (len, rest) = rest.split_once(':').ok_or_else(malformed)?;
        let len = len.parse::<usize>().map_err(|_| malformed())?;

        let size = rest.get(..len).ok_or_else(malformed)?;
        let color = rest
            .get(len..)
            .and_then(|tail| tail.strip_prefix(':'))
            .ok_or_else(malformed)?;

        Ok(Self::new(product_id, size, color))
    }
}

/// One distinct selection in the cart and how many of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub key: LineKey,
    /// Snapshot of the product's display data at the time it was added.
    pub product: Product,
    /// Always at least one; a line at zero no longer exists.
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub fn selected_size(&self) -> &str {
        &self.key.size
    }

    #[must_use]
    pub fn selected_color(&self) -> &str {
        &self.key.color
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Outcome of a quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// No line had that key; the cart is untouched.
    Unchanged,
    /// The line now has this quantity.
    Updated(u32),
    /// The quantity reached zero and the line was dropped.
    Removed,
}

/// The shopper's cart: lines in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of `product` in `size` and `color`.
    ///
    /// Merges into the existing line for the same selection, otherwise
    /// appends a new line with quantity 1. Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSelection` if the product is not offered in `size` or
    /// `color` (an empty selection included). The cart is left unchanged.
    pub fn add(&mut self, product: &Product, size: &str, color: &str) -> Result<u32, CartError> {
        if !product.offers_size(size) {
            return Err(invalid(product, SelectionField::Size, size));
        }
        if !product.offers_color(color) {
            return Err(invalid(product, SelectionField::Color, color));
        }

        let key = LineKey::new(product.id, size, color);
        if let Some(line) = self.lines.iter_mut().find(|line| line.key == key) {
            line.quantity = line.quantity.saturating_add(1);
            return Ok(line.quantity);
        }

        self.lines.push(CartLine {
            key,
            product: product.clone(),
            quantity: 1,
        });
        Ok(1)
    }

    /// Shift a line's quantity by `delta`.
    ///
    /// Unknown keys are ignored, so replaying a removal is harmless. A
    /// resulting quantity of zero or less removes the line.
    pub fn update_quantity(&mut self, key: &LineKey, delta: i64) -> QuantityChange {
        let Some(line) = self.lines.iter_mut().find(|line| &line.key == key) else {
            return QuantityChange::Unchanged;
        };

        let new_quantity = i64::from(line.quantity).saturating_add(delta);
        if new_quantity <= 0 {
            self.lines.retain(|line| &line.key != key);
            return QuantityChange::Removed;
        }

        line.quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        QuantityChange::Updated(line.quantity)
    }

    /// Set a line to an absolute quantity; zero removes it.
    pub fn set_quantity(&mut self, key: &LineKey, quantity: u32) -> QuantityChange {
        let Some(current) = self.line(key).map(|line| line.quantity) else {
            return QuantityChange::Unchanged;
        };
        self.update_quantity(key, i64::from(quantity) - i64::from(current))
    }

    /// Drop a line regardless of its quantity.
    pub fn remove(&mut self, key: &LineKey) -> QuantityChange {
        self.set_quantity(key, 0)
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.key == key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of price times quantity over all lines, before shipping and tax.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_price).sum()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Count and total in the shape hosted cart endpoints return.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        let subtotal = self.subtotal();
        CartSummary {
            item_count: self.item_count(),
            total_price: subtotal.to_minor_units(),
            currency: subtotal.currency_code,
        }
    }
}

fn invalid(product: &Product, field: SelectionField, value: &str) -> CartError {
    CartError::InvalidSelection {
        product: product.title.clone(),
        field,
        value: value.to_string(),
    }
}

/// Cart count and total, as returned by `/cart.js`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    pub item_count: u32,
    /// Total in minor currency units (cents).
    pub total_price: i64,
    pub currency: CurrencyCode,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, title: &str, price: i64, colors: &[&str]) -> Product {
        Product {
            id: ProductId::new(id),
            handle: title.to_lowercase().replace(' ', "-"),
            title: title.to_string(),
            price: Price::from_major(price, CurrencyCode::USD),
            images: vec![format!("https://img.example/{id}.jpg")],
            sizes: ["XS", "S", "M", "L", "XL"].map(String::from).to_vec(),
            colors: colors.iter().map(|c| (*c).to_string()).collect(),
            rating: 4.8,
            reviews: 100,
            category: "Bottoms".to_string(),
            is_new: false,
        }
    }

    fn rise_leggings() -> Product {
        product(2, "Rise Leggings", 88, &["Black", "Navy", "Cherry"])
    }

    fn rise_tank() -> Product {
        product(3, "Rise Tank", 48, &["Black", "Navy", "Cherry"])
    }

    #[test]
    fn test_same_selection_merges_into_one_line() {
        let mut cart = Cart::new();
        let leggings = rise_leggings();

        assert_eq!(cart.add(&leggings, "M", "Black"), Ok(1));
        assert_eq!(cart.add(&leggings, "M", "Black"), Ok(2));

        assert_eq!(cart.lines().len(), 1);
        let line = cart.lines().first().expect("one line");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.selected_size(), "M");
        assert_eq!(line.selected_color(), "Black");
        assert_eq!(cart.subtotal(), Price::from_major(176, CurrencyCode::USD));
    }

    #[test]
    fn test_repeated_adds_count_every_call() {
        let mut cart = Cart::new();
        let leggings = rise_leggings();
        for _ in 0..7 {
            cart.add(&leggings, "XS", "Navy").expect("valid selection");
        }
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 7);
    }

    #[test]
    fn test_color_difference_makes_a_new_line() {
        let mut cart = Cart::new();
        let tank = rise_tank();

        cart.add(&tank, "S", "Navy").expect("valid selection");
        cart.add(&tank, "S", "Cherry").expect("valid selection");

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.item_count(), 2);
        assert!(cart.lines().iter().all(|line| line.quantity == 1));
    }

    #[test]
    fn test_distinct_selections_each_get_a_line_in_insertion_order() {
        let mut cart = Cart::new();
        let tank = rise_tank();
        let leggings = rise_leggings();

        cart.add(&leggings, "L", "Black").expect("valid");
        cart.add(&tank, "L", "Black").expect("valid");
        cart.add(&tank, "M", "Black").expect("valid");

        let keys: Vec<_> = cart.lines().iter().map(|line| line.key.clone()).collect();
        assert_eq!(
            keys,
            vec![
                LineKey::new(ProductId::new(2), "L", "Black"),
                LineKey::new(ProductId::new(3), "L", "Black"),
                LineKey::new(ProductId::new(3), "M", "Black"),
            ]
        );
        assert_eq!(cart.subtotal(), Price::from_major(88 + 48 + 48, CurrencyCode::USD));
    }

    #[test]
    fn test_decrement_then_remove() {
        let mut cart = Cart::new();
        let leggings = rise_leggings();
        for _ in 0..3 {
            cart.add(&leggings, "M", "Black").expect("valid");
        }
        let key = LineKey::new(leggings.id, "M", "Black");

        assert_eq!(cart.update_quantity(&key, -1), QuantityChange::Updated(2));
        assert_eq!(cart.line(&key).map(|line| line.quantity), Some(2));

        assert_eq!(cart.update_quantity(&key, -2), QuantityChange::Removed);
        assert!(cart.line(&key).is_none());
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Price::zero(CurrencyCode::USD));
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_overshooting_decrement_removes_line() {
        let mut cart = Cart::new();
        let tank = rise_tank();
        cart.add(&tank, "S", "Navy").expect("valid");
        let key = LineKey::new(tank.id, "S", "Navy");

        assert_eq!(cart.update_quantity(&key, -10), QuantityChange::Removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unknown_key_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        let tank = rise_tank();
        cart.add(&tank, "S", "Navy").expect("valid");
        let before = cart.clone();

        let missing = LineKey::new(tank.id, "S", "Cherry");
        assert_eq!(cart.update_quantity(&missing, -1), QuantityChange::Unchanged);
        assert_eq!(cart.update_quantity(&missing, 5), QuantityChange::Unchanged);
        assert_eq!(cart.remove(&missing), QuantityChange::Unchanged);

        assert_eq!(cart, before);
        assert_eq!(cart.item_count(), before.item_count());
        assert_eq!(cart.subtotal(), before.subtotal());
    }

    #[test]
    fn test_duplicate_removal_is_idempotent() {
        let mut cart = Cart::new();
        let tank = rise_tank();
        cart.add(&tank, "M", "Black").expect("valid");
        let key = LineKey::new(tank.id, "M", "Black");

        assert_eq!(cart.remove(&key), QuantityChange::Removed);
        assert_eq!(cart.remove(&key), QuantityChange::Unchanged);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_is_absolute() {
        let mut cart = Cart::new();
        let tank = rise_tank();
        cart.add(&tank, "M", "Black").expect("valid");
        let key = LineKey::new(tank.id, "M", "Black");

        assert_eq!(cart.set_quantity(&key, 4), QuantityChange::Updated(4));
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.set_quantity(&key, 0), QuantityChange::Removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_invalid_selection_is_rejected_without_mutation() {
        let mut cart = Cart::new();
        let tank = rise_tank();

        let err = cart.add(&tank, "", "Navy").expect_err("empty size");
        assert!(matches!(
            err,
            CartError::InvalidSelection {
                field: SelectionField::Size,
                ..
            }
        ));

        let err = cart.add(&tank, "M", "Chartreuse").expect_err("unknown color");
        assert_eq!(
            err.to_string(),
            "Rise Tank is not offered in color \"Chartreuse\""
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_reads_are_idempotent() {
        let mut cart = Cart::new();
        cart.add(&rise_leggings(), "M", "Black").expect("valid");
        cart.add(&rise_tank(), "S", "Navy").expect("valid");

        assert_eq!(cart.subtotal(), cart.subtotal());
        assert_eq!(cart.item_count(), cart.item_count());
        assert_eq!(cart.subtotal(), Price::from_major(136, CurrencyCode::USD));
    }

    #[test]
    fn test_summary_uses_minor_units() {
        let mut cart = Cart::new();
        let leggings = rise_leggings();
        cart.add(&leggings, "M", "Black").expect("valid");
        cart.add(&leggings, "M", "Black").expect("valid");

        let summary = cart.summary();
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total_price, 17_600);
        assert_eq!(summary.currency, CurrencyCode::USD);
    }

    #[test]
    fn test_line_key_token_round_trip() {
        let key = LineKey::new(ProductId::new(8), "M", "Black");
        assert_eq!(key.token(), "8:1:M:Black");
        assert_eq!("8:1:M:Black".parse::<LineKey>(), Ok(key));
    }

    #[test]
    fn test_line_key_separator_in_values_does_not_collide() {
        let a = LineKey::new(ProductId::new(1), "M:Black", "Navy");
        let b = LineKey::new(ProductId::new(1), "M", "Black:Navy");
        assert_ne!(a.token(), b.token());
        assert_eq!(a.token().parse::<LineKey>(), Ok(a));
        assert_eq!(b.token().parse::<LineKey>(), Ok(b));
    }

    #[test]
    fn test_line_key_rejects_malformed_tokens() {
        for token in ["", "1", "x:1:M:Black", "1:9:M:Black", "1:1:MBlack", "1:one:M:B"] {
            assert!(token.parse::<LineKey>().is_err(), "{token:?} should fail");
        }
    }

    #[test]
    fn test_cart_survives_serialization() {
        let mut cart = Cart::new();
        cart.add(&rise_leggings(), "M", "Black").expect("valid");
        let json = serde_json::to_string(&cart).expect("serialize");
        let back: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cart);
    }
}
