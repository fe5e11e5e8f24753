//! Journal route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{JournalArticle, JournalFilter};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Journal query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct JournalQuery {
    pub category: Option<String>,
}

/// Journal index template.
#[derive(Template, WebTemplate)]
#[template(path = "journal/index.html")]
pub struct JournalIndexTemplate {
    pub featured: Option<JournalArticle>,
    pub tabs: Vec<JournalFilter>,
    pub active: JournalFilter,
    pub articles: Vec<JournalArticle>,
}

impl JournalIndexTemplate {
    fn is_active(&self, tab: &JournalFilter) -> bool {
        self.active == *tab
    }
}

/// Display the journal, optionally narrowed to one category.
///
/// The featured article stays the same whichever tab is open.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<JournalQuery>,
) -> Result<JournalIndexTemplate> {
    let active = match query.category.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(category) => category
            .parse::<JournalFilter>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?,
        None => JournalFilter::All,
    };

    let catalog = state.catalog();
    Ok(JournalIndexTemplate {
        featured: catalog.featured_article().cloned(),
        tabs: JournalFilter::TABS.to_vec(),
        active,
        articles: catalog.articles_in(active).into_iter().cloned().collect(),
    })
}
