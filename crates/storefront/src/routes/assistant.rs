//! Styling assistant route handlers.
//!
//! The chat widget swaps the whole transcript fragment on every send.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::visitor_id;
use crate::services::stylist::ChatMessage;
use crate::state::AppState;

/// Send message form data.
#[derive(Debug, Deserialize)]
pub struct SendMessageForm {
    #[serde(default)]
    pub message: String,
}

/// Transcript fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/assistant.html")]
pub struct AssistantTemplate {
    pub messages: Vec<ChatMessage>,
}

/// Display the visitor's transcript.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<AssistantTemplate> {
    let visitor = visitor_id(&session).await?;
    let transcript = state.assistant().transcript(visitor).await;

    Ok(AssistantTemplate {
        messages: transcript.messages().to_vec(),
    })
}

/// Send a message and return the updated transcript.
///
/// Waits for any earlier message from the same visitor to be answered first.
#[instrument(skip(state, session, form))]
pub async fn send(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SendMessageForm>,
) -> Result<AssistantTemplate> {
    let visitor = visitor_id(&session).await?;
    let transcript = state.assistant().send(visitor, &form.message).await;

    Ok(AssistantTemplate {
        messages: transcript.messages().to_vec(),
    })
}
