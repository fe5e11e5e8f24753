//! Session-stored state.
//!
//! The session holds a single visitor handle. Carts and assistant
//! transcripts live in their own stores keyed by it, so a request that only
//! touches the cart never rewrites the session record.

use tower_sessions::Session;
use uuid::Uuid;

use crate::error::Result;

/// Session keys.
pub mod keys {
    /// Key for the visitor handle that carts and transcripts are keyed by.
    pub const VISITOR: &str = "visitor";
}

/// The visitor's handle, if one was ever issued.
///
/// # Errors
///
/// Returns error if the session store fails.
pub async fn existing_visitor_id(session: &Session) -> Result<Option<Uuid>> {
    Ok(session.get::<Uuid>(keys::VISITOR).await?)
}

/// The visitor's handle, created on first use.
///
/// # Errors
///
/// Returns error if the session store fails.
pub async fn visitor_id(session: &Session) -> Result<Uuid> {
    if let Some(id) = existing_visitor_id(session).await? {
        return Ok(id);
    }
    let id = Uuid::new_v4();
    session.insert(keys::VISITOR, id).await?;
    Ok(id)
}
