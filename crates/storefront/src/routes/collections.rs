//! Collection page route handler.

use askama::Template;
use askama_web::WebTemplate;
use athyre_core::Product;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::CollectionFilter;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Collection query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CollectionQuery {
    pub category: Option<String>,
}

/// Rise collection template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/rise.html")]
pub struct RiseCollectionTemplate {
    pub tabs: Vec<CollectionFilter>,
    pub active: CollectionFilter,
    pub products: Vec<Product>,
}

impl RiseCollectionTemplate {
    fn is_active(&self, tab: &CollectionFilter) -> bool {
        self.active == *tab
    }
}

/// Display the Rise collection, optionally narrowed to one category.
#[instrument(skip(state))]
pub async fn rise(
    State(state): State<AppState>,
    Query(query): Query<CollectionQuery>,
) -> Result<RiseCollectionTemplate> {
    let active = match query.category.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(category) => category
            .parse::<CollectionFilter>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?,
        None => CollectionFilter::All,
    };

    Ok(RiseCollectionTemplate {
        tabs: CollectionFilter::TABS.to_vec(),
        active,
        products: state
            .catalog()
            .products_in(active)
            .into_iter()
            .cloned()
            .collect(),
    })
}
