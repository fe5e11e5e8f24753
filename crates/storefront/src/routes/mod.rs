//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /products/{handle}      - Product detail
//! GET  /collections/rise       - Rise collection (?category=tops|bottoms|outerwear)
//! GET  /journal                - Journal (?category=recipe|playlist|fitness-tip)
//! GET  /gift-cards             - Gift card configurator
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart drawer
//! POST /cart/add               - Add to cart (drawer, triggers cart-updated and cart-open)
//! POST /cart/update            - Shift quantity (drawer)
//! POST /cart/remove            - Remove line (drawer)
//! GET  /cart/count             - Cart count badge
//!
//! # Cart (AJAX JSON)
//! GET  /cart.js                - Cart summary and lines
//! POST /cart/add.js            - Add quantity of a selection
//! POST /cart/change.js         - Set absolute quantity (0 removes)
//!
//! # Popup
//! GET  /popup                  - Popup fragment (empty once dismissed)
//! POST /popup/dismiss          - Remember popup dismissal
//!
//! # Styling assistant
//! GET  /assistant              - Transcript fragment
//! POST /assistant              - Send a message
//! ```

pub mod assistant;
pub mod cart;
pub mod collections;
pub mod gift_cards;
pub mod home;
pub mod journal;
pub mod popup;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/{handle}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
        .route("/add.js", post(cart::add_js))
        .route("/change.js", post(cart::change_js))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .nest("/products", product_routes())
        .route("/collections/rise", get(collections::rise))
        .route("/journal", get(journal::index))
        .route("/gift-cards", get(gift_cards::show))
        // Cart
        .route("/cart.js", get(cart::cart_js))
        .nest("/cart", cart_routes())
        // Popup
        .route("/popup", get(popup::show))
        .route("/popup/dismiss", post(popup::dismiss))
        // Styling assistant
        .route("/assistant", get(assistant::show).post(assistant::send))
}
