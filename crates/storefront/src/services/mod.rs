//! Business logic services for storefront.
//!
//! # Services
//!
//! - `carts` - Per-visitor carts, one lock per cart
//! - `stylist` - AI styling assistant (Gemini) with per-visitor transcripts

pub mod carts;
pub mod stylist;
