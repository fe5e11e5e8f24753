//! Hosted cart commands.
//!
//! Each command prints the resulting cart. Failures the store might recover
//! from (timeouts, 429, 5xx) come with a hint to re-run the command.

use athyre_storefront::commerce::{
    AjaxCartClient, CommerceError, RemoteCartSummary, format_money,
};
use tracing::{info, warn};

/// Build a client for `store`, optionally resuming a cart.
///
/// # Errors
///
/// Returns an error if the store domain is unusable.
pub fn client(store: &str, cart_token: Option<String>) -> Result<AjaxCartClient, CommerceError> {
    let client = AjaxCartClient::new(store)?;
    Ok(match cart_token {
        Some(token) => client.with_cart_token(token),
        None => client,
    })
}

/// Show the cart.
///
/// # Errors
///
/// Returns an error if the store cannot be reached or answers with an error.
pub async fn show(client: &AjaxCartClient) -> Result<(), CommerceError> {
    let cart = client.summary().await.map_err(with_retry_hint)?;
    print_cart(client, &cart).await;
    Ok(())
}

/// Add `quantity` of `variant`.
///
/// # Errors
///
/// Returns an error if the store rejects the item or cannot be reached.
pub async fn add(client: &AjaxCartClient, variant: u64, quantity: u32) -> Result<(), CommerceError> {
    let cart = client
        .add(variant, quantity)
        .await
        .map_err(with_retry_hint)?;
    info!(variant, quantity, "Added to cart");
    print_cart(client, &cart).await;
    Ok(())
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns an error if the store rejects the line or cannot be reached.
pub async fn change(
    client: &AjaxCartClient,
    line: &str,
    quantity: u32,
) -> Result<(), CommerceError> {
    let cart = client
        .change(line, quantity)
        .await
        .map_err(with_retry_hint)?;
    info!(line, quantity, "Cart line changed");
    print_cart(client, &cart).await;
    Ok(())
}

fn with_retry_hint(err: CommerceError) -> CommerceError {
    if err.is_retryable() {
        warn!("The store did not complete the request; retry? Run the same command again.");
    }
    err
}

async fn print_cart(client: &AjaxCartClient, cart: &RemoteCartSummary) {
    for line in &cart.items {
        info!(
            key = %line.key,
            quantity = line.quantity,
            line_price = %format_money(line.line_price),
            "{}",
            line.title
        );
    }

    info!(
        items = cart.item_count,
        total = %format_money(cart.total_price),
        "Cart"
    );

    if let Some(token) = client.cart_token().await {
        info!(cart_token = %token, "Pass --cart-token to keep using this cart");
    }
}
