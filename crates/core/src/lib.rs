//! ATHYRE Core - Shared storefront types.
//!
//! This crate provides the types used across all ATHYRE components:
//! - `storefront` - Public-facing activewear store
//! - `cli` - Command-line tools for driving a hosted store's cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no sessions. The cart aggregator lives here so that the same
//! merge and removal rules apply wherever a cart is held.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids and prices, plus catalog records
//! - [`cart`] - The cart aggregator and its derived totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartError, CartLine, CartSummary, LineKey, LineKeyError, QuantityChange};
pub use types::*;
