//! Session-backed models for storefront.

pub mod session;

pub use session::keys as session_keys;
pub use session::{existing_visitor_id, visitor_id};
