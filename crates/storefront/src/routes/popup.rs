//! Newsletter popup route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Response},
};
use tracing::instrument;

use crate::preferences::{PopupDismissed, popup_dismissed_cookie};
use crate::state::AppState;

/// Newsletter popup fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/popup.html")]
pub struct PopupTemplate;

/// Popup fragment, fetched by the home page after its delay.
///
/// Empty once the visitor has dismissed it.
#[instrument]
pub async fn show(PopupDismissed(dismissed): PopupDismissed) -> Response {
    if dismissed {
        return StatusCode::OK.into_response();
    }
    PopupTemplate.into_response()
}

/// Remember that the visitor dismissed the popup.
///
/// Idempotent; the popup stays hidden on every later page render.
#[instrument(skip(state))]
pub async fn dismiss(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = popup_dismissed_cookie(state.config().is_secure());
    (StatusCode::NO_CONTENT, AppendHeaders([(SET_COOKIE, cookie)]))
}
