//! Cart route handlers.
//!
//! The HTMX endpoints return the drawer or badge fragments; the `.js`
//! endpoints speak the hosted store's AJAX cart JSON so theme scripts can
//! target either. Every mutation runs under the visitor's cart lock, so
//! concurrent requests from one visitor all land.

use askama::Template;
use askama_web::WebTemplate;
use athyre_core::{Cart, CartLine, CurrencyCode, LineKey, ProductId, QuantityChange};
use axum::{
    Form, Json,
    extract::State,
    response::{AppendHeaders, IntoResponse},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::Catalog;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::{existing_visitor_id, visitor_id};
use crate::state::AppState;

/// Orders at or above this subtotal (whole dollars) ship free.
pub const FREE_SHIPPING_THRESHOLD: u32 = 150;

/// Events fired after a successful add: refresh the badge, open the drawer.
const ADD_TRIGGER: &str = "cart-updated, cart-open";

/// Event fired after any other cart change.
const UPDATE_TRIGGER: &str = "cart-updated";

// =============================================================================
// View Models
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    /// Line token posted back by the quantity and remove buttons.
    pub token: String,
    pub handle: String,
    pub title: String,
    pub image: Option<String>,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            token: line.key.token(),
            handle: line.product.handle.clone(),
            title: line.product.title.clone(),
            image: line.product.primary_image().map(String::from),
            size: line.selected_size().to_string(),
            color: line.selected_color().to_string(),
            quantity: line.quantity,
            unit_price: line.product.price.display(),
            line_price: line.line_price().display(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            subtotal: cart.subtotal().display(),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Cart drawer fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_drawer.html")]
pub struct CartDrawerTemplate {
    pub cart: CartView,
    pub free_shipping_threshold: u32,
}

impl CartDrawerTemplate {
    fn new(cart: &Cart) -> Self {
        Self {
            cart: CartView::from(cart),
            free_shipping_threshold: FREE_SHIPPING_THRESHOLD,
        }
    }
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// HTMX Handlers
// =============================================================================

/// Add to cart form data.
///
/// Quick-add buttons post no color; the product's first color is used.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line: String,
    pub delta: i64,
}

/// Remove line form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line: String,
}

/// Display the cart drawer.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartDrawerTemplate> {
    let cart = current_cart(&state, &session).await?;
    Ok(CartDrawerTemplate::new(&cart))
}

/// Add one unit of a selection (HTMX).
///
/// Returns the drawer and triggers the badge refresh and drawer open.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<impl IntoResponse> {
    let visitor = visitor_id(&session).await?;
    let (cart, ()) = state
        .carts()
        .update(visitor, |cart| {
            add_selection(
                state.catalog(),
                cart,
                form.product_id,
                form.size.as_deref(),
                form.color.as_deref(),
                1,
            )
        })
        .await?;

    Ok((
        AppendHeaders([("HX-Trigger", ADD_TRIGGER)]),
        CartDrawerTemplate::new(&cart),
    ))
}

/// Shift a line's quantity (HTMX).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<impl IntoResponse> {
    let key: LineKey = form.line.parse()?;
    let cart = change_cart(&state, &session, |cart| {
        cart.update_quantity(&key, form.delta)
    })
    .await?;

    Ok((
        AppendHeaders([("HX-Trigger", UPDATE_TRIGGER)]),
        CartDrawerTemplate::new(&cart),
    ))
}

/// Remove a line (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<impl IntoResponse> {
    let key: LineKey = form.line.parse()?;
    let cart = change_cart(&state, &session, |cart| cart.remove(&key)).await?;

    Ok((
        AppendHeaders([("HX-Trigger", UPDATE_TRIGGER)]),
        CartDrawerTemplate::new(&cart),
    ))
}

/// Cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<CartCountTemplate> {
    let cart = current_cart(&state, &session).await?;
    Ok(CartCountTemplate {
        count: cart.item_count(),
    })
}

// =============================================================================
// AJAX (.js) Handlers
// =============================================================================

/// Cart JSON in the hosted store's `/cart.js` shape.
#[derive(Debug, Serialize)]
pub struct CartJson {
    pub item_count: u32,
    /// Total in minor units.
    pub total_price: i64,
    pub currency: CurrencyCode,
    pub items: Vec<CartLineJson>,
}

/// One line of [`CartJson`].
#[derive(Debug, Serialize)]
pub struct CartLineJson {
    pub key: String,
    pub product_id: ProductId,
    pub handle: String,
    pub title: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    /// Unit price in minor units.
    pub price: i64,
    /// Line total in minor units.
    pub line_price: i64,
}

impl From<&Cart> for CartJson {
    fn from(cart: &Cart) -> Self {
        let summary = cart.summary();
        Self {
            item_count: summary.item_count,
            total_price: summary.total_price,
            currency: summary.currency,
            items: cart
                .lines()
                .iter()
                .map(|line| CartLineJson {
                    key: line.key.token(),
                    product_id: line.key.product_id,
                    handle: line.product.handle.clone(),
                    title: line.product.title.clone(),
                    size: line.selected_size().to_string(),
                    color: line.selected_color().to_string(),
                    quantity: line.quantity,
                    price: line.product.price.to_minor_units(),
                    line_price: line.line_price().to_minor_units(),
                })
                .collect(),
        }
    }
}

/// Body of `POST /cart/add.js`.
#[derive(Debug, Deserialize)]
pub struct AddJsRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Body of `POST /cart/change.js`.
#[derive(Debug, Deserialize)]
pub struct ChangeJsRequest {
    pub line: String,
    pub quantity: u32,
}

/// Read the cart as JSON.
#[instrument(skip(state, session))]
pub async fn cart_js(State(state): State<AppState>, session: Session) -> Result<Json<CartJson>> {
    let cart = current_cart(&state, &session).await?;
    Ok(Json(CartJson::from(&cart)))
}

/// Add `quantity` units of a selection, merging by line identity.
#[instrument(skip(state, session))]
pub async fn add_js(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddJsRequest>,
) -> Result<Json<CartJson>> {
    let quantity = body.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let visitor = visitor_id(&session).await?;
    let (cart, ()) = state
        .carts()
        .update(visitor, |cart| {
            add_selection(
                state.catalog(),
                cart,
                body.product_id,
                body.size.as_deref(),
                body.color.as_deref(),
                quantity,
            )
        })
        .await?;

    Ok(Json(CartJson::from(&cart)))
}

/// Set a line's absolute quantity; 0 removes it.
#[instrument(skip(state, session))]
pub async fn change_js(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<ChangeJsRequest>,
) -> Result<Json<CartJson>> {
    let key: LineKey = body.line.parse()?;
    let cart = change_cart(&state, &session, |cart| {
        cart.set_quantity(&key, body.quantity)
    })
    .await?;

    Ok(Json(CartJson::from(&cart)))
}

// =============================================================================
// Helpers
// =============================================================================

/// The visitor's cart; empty for a visitor who has no handle yet.
async fn current_cart(state: &AppState, session: &Session) -> Result<Cart> {
    Ok(match existing_visitor_id(session).await? {
        Some(visitor) => state.carts().get(visitor).await,
        None => Cart::default(),
    })
}

/// Apply a quantity change to the visitor's cart.
///
/// A visitor with no handle has an empty cart, so every change is a no-op
/// and no handle is issued.
async fn change_cart(
    state: &AppState,
    session: &Session,
    change: impl FnOnce(&mut Cart) -> QuantityChange,
) -> Result<Cart> {
    let Some(visitor) = existing_visitor_id(session).await? else {
        return Ok(Cart::default());
    };
    let (cart, _) = state
        .carts()
        .update(visitor, |cart| Ok::<_, AppError>(change(cart)))
        .await?;
    Ok(cart)
}

/// Resolve the product and add `quantity` units of the selection.
fn add_selection(
    catalog: &Catalog,
    cart: &mut Cart,
    product_id: ProductId,
    size: Option<&str>,
    color: Option<&str>,
    quantity: u32,
) -> Result<()> {
    let product = catalog
        .product(product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let size = size.map(str::trim).unwrap_or_default();
    let color = color
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .or_else(|| product.default_color())
        .unwrap_or_default();

    cart.add(product, size, color)?;
    if quantity > 1 {
        let key = LineKey::new(product.id, size, color);
        cart.update_quantity(&key, i64::from(quantity) - 1);
    }

    let id = product_id.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", id.as_str()), ("size", size), ("color", color)]),
    );

    Ok(())
}
