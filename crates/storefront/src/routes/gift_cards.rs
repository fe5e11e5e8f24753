//! Gift card configurator route handler.
//!
//! The configurator is a GET form: every change re-renders the preview from
//! the query string, so the page holds no server state.

use askama::Template;
use askama_web::WebTemplate;
use athyre_core::types::gift_card::PRESET_AMOUNTS;
use athyre_core::{DeliveryMethod, GiftCardSelection};
use axum::extract::Query;
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;

/// Configurator query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct GiftCardQuery {
    pub amount: Option<u32>,
    pub custom: Option<String>,
    pub delivery: Option<String>,
}

/// Gift card configurator template.
#[derive(Template, WebTemplate)]
#[template(path = "gift_cards/show.html")]
pub struct GiftCardTemplate {
    pub presets: Vec<u32>,
    pub selected_preset: Option<u32>,
    pub custom_input: String,
    pub amount: u32,
    pub delivery: DeliveryMethod,
}

impl GiftCardTemplate {
    fn is_email(&self) -> bool {
        self.delivery == DeliveryMethod::Email
    }

    fn is_selected(&self, preset: &u32) -> bool {
        self.selected_preset == Some(*preset)
    }
}

/// Build the selection described by the query.
///
/// # Errors
///
/// Returns error for an unknown preset, an out-of-range custom amount, or an
/// unknown delivery method.
pub fn selection_from_query(query: &GiftCardQuery) -> Result<GiftCardSelection> {
    let mut selection = GiftCardSelection::default();

    if let Some(amount) = query.amount {
        selection = selection.with_preset(amount)?;
    }
    if let Some(custom) = query.custom.as_deref() {
        selection = selection.with_custom_input(custom)?;
    }
    if let Some(delivery) = query.delivery.as_deref() {
        selection = selection.with_delivery(delivery.parse()?);
    }

    Ok(selection)
}

/// Display the gift card configurator.
#[instrument]
pub async fn show(Query(query): Query<GiftCardQuery>) -> Result<GiftCardTemplate> {
    let selection = selection_from_query(&query)?;

    Ok(GiftCardTemplate {
        presets: PRESET_AMOUNTS.to_vec(),
        selected_preset: selection.selected_preset(),
        custom_input: query.custom.unwrap_or_default(),
        amount: selection.amount(),
        delivery: selection.delivery(),
    })
}
