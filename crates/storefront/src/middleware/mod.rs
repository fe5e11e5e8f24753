//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (fill the span field, tag Sentry, echo the header)
//! 4. Session layer (tower-sessions over a bounded in-memory store)

pub mod request_id;
pub mod session;
pub mod session_store;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
pub use session_store::BoundedMemoryStore;
