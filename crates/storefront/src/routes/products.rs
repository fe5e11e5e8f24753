//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use athyre_core::Product;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::catalog::RELATED_PRODUCTS_LIMIT;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: Product,
    pub related: Vec<Product>,
}

/// Display a product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<ProductShowTemplate> {
    let catalog = state.catalog();
    let product = catalog
        .product_by_handle(&handle)
        .ok_or_else(|| AppError::NotFound(format!("product {handle}")))?;

    add_breadcrumb(
        "navigation",
        "Viewed product page",
        Some(&[("handle", handle.as_str())]),
    );

    let related = catalog
        .related(product, RELATED_PRODUCTS_LIMIT)
        .into_iter()
        .cloned()
        .collect();

    Ok(ProductShowTemplate {
        product: product.clone(),
        related,
    })
}
