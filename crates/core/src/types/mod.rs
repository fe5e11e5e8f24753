//! Core types for ATHYRE.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod gift_card;
pub mod id;
pub mod price;
pub mod product;

pub use gift_card::{DeliveryMethod, GiftCardError, GiftCardSelection};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use product::Product;
