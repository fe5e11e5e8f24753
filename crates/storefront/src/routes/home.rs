//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use athyre_core::Product;
use axum::extract::State;
use tracing::instrument;

use crate::catalog::{CollectionCard, HOME_ARTICLES_LIMIT, JournalArticle};
use crate::filters;
use crate::preferences::PopupDismissed;
use crate::state::AppState;

// =============================================================================
// Hero Configuration
// =============================================================================

/// Static hero banner content.
#[derive(Clone)]
pub struct Hero {
    pub eyebrow: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub button_text: &'static str,
    pub button_url: &'static str,
    pub image: &'static str,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            eyebrow: "New Season",
            title: "RISE ABOVE",
            subtitle: "Performance wear engineered for every rep, every mile, every rise.",
            button_text: "Shop The Collection",
            button_url: "/collections/rise",
            image: "https://images.unsplash.com/photo-1518611012118-696072aa579a?w=1920",
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub hero: Hero,
    pub cards: Vec<CollectionCard>,
    pub products: Vec<Product>,
    pub articles: Vec<JournalArticle>,
    /// Schedule the newsletter popup (the visitor has not dismissed it).
    pub show_popup: bool,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    PopupDismissed(dismissed): PopupDismissed,
) -> HomeTemplate {
    let catalog = state.catalog();

    HomeTemplate {
        hero: Hero::default(),
        cards: catalog.collection_cards().to_vec(),
        products: catalog.products().to_vec(),
        articles: catalog.latest_articles(HOME_ARTICLES_LIMIT).to_vec(),
        show_popup: !dismissed,
    }
}
