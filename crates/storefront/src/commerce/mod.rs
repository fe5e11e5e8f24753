//! Client for a hosted store's AJAX cart endpoints.
//!
//! # Endpoints
//!
//! - `POST /cart/add.js` - add a variant
//! - `POST /cart/change.js` - set a line's quantity (0 removes)
//! - `GET /cart.js` - read the cart
//!
//! The store identifies a cart by its `cart` cookie. The client captures it
//! from the first response and replays it on every later request, so one
//! client instance drives one cart.
//!
//! # Example
//!
//! ```rust,ignore
//! let client = AjaxCartClient::new("athyre.myshopify.com")?;
//! let cart = client.add(40123, 1).await?;
//! println!("{} items, {}", cart.item_count, format_money(cart.total_price));
//! ```

mod types;

pub use types::{RemoteCartLine, RemoteCartSummary};

use std::sync::Arc;
use std::time::Duration;

use athyre_core::{CurrencyCode, Price};
use reqwest::StatusCode;
use reqwest::header::{COOKIE, SET_COOKIE};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use types::{AddItem, AddItems, ChangeLine, ErrorBody};

/// Name of the cookie the store uses to identify a cart.
pub const CART_COOKIE: &str = "cart";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors talking to the hosted store.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store answered with a non-success status.
    #[error("Store error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Store domain or URL is unusable.
    #[error("Invalid store: {0}")]
    InvalidStore(String),
}

impl CommerceError {
    /// Whether repeating the same request could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => !e.is_builder() && !e.is_decode(),
            Self::Api { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
            }
            Self::Parse(_) | Self::InvalidStore(_) => false,
        }
    }
}

/// Format minor units as a display price, e.g. `1234` -> `"$12.34"`.
#[must_use]
pub fn format_money(cents: i64) -> String {
    Price::from_minor_units(cents, CurrencyCode::USD).display()
}

/// AJAX cart client bound to one store and one cart.
#[derive(Clone)]
pub struct AjaxCartClient {
    inner: Arc<AjaxCartClientInner>,
}

struct AjaxCartClientInner {
    client: reqwest::Client,
    base_url: String,
    cart_token: RwLock<Option<String>>,
}

impl AjaxCartClient {
    /// Create a client for `https://{store}`.
    ///
    /// # Errors
    ///
    /// Returns error if the domain is empty or the HTTP client fails to build.
    pub fn new(store: &str) -> Result<Self, CommerceError> {
        let store = store.trim().trim_end_matches('/');
        if store.is_empty() {
            return Err(CommerceError::InvalidStore("store domain is empty".to_string()));
        }
        Self::with_base_url(&format!("https://{store}"))
    }

    /// Create a client for an explicit base URL (scheme included).
    ///
    /// # Errors
    ///
    /// Returns error if the URL does not parse or the HTTP client fails to build.
    pub fn with_base_url(base_url: &str) -> Result<Self, CommerceError> {
        url::Url::parse(base_url).map_err(|e| CommerceError::InvalidStore(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(AjaxCartClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                cart_token: RwLock::new(None),
            }),
        })
    }

    /// Resume an existing cart by its token.
    #[must_use]
    pub fn with_cart_token(self, token: impl Into<String>) -> Self {
        let inner = AjaxCartClientInner {
            client: self.inner.client.clone(),
            base_url: self.inner.base_url.clone(),
            cart_token: RwLock::new(Some(token.into())),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Token of the cart this client drives, once the store has assigned one.
    pub async fn cart_token(&self) -> Option<String> {
        self.inner.cart_token.read().await.clone()
    }

    /// Add a variant, then return the refreshed cart.
    ///
    /// # Errors
    ///
    /// Returns error if either request fails.
    #[instrument(skip(self))]
    pub async fn add(
        &self,
        variant_id: u64,
        quantity: u32,
    ) -> Result<RemoteCartSummary, CommerceError> {
        let body = AddItems {
            items: vec![AddItem {
                id: variant_id,
                quantity,
            }],
        };
        let request = self.inner.client.post(self.url("/cart/add.js")).json(&body);
        self.send(request).await?;
        self.summary().await
    }

    /// Set a line's absolute quantity; 0 removes it.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the store rejects the line key.
    #[instrument(skip(self))]
    pub async fn change(
        &self,
        line_key: &str,
        quantity: u32,
    ) -> Result<RemoteCartSummary, CommerceError> {
        let body = ChangeLine {
            id: line_key,
            quantity,
        };
        let request = self
            .inner
            .client
            .post(self.url("/cart/change.js"))
            .json(&body);
        let text = self.send(request).await?;
        parse_summary(&text)
    }

    /// Read the current cart.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not cart JSON.
    #[instrument(skip(self))]
    pub async fn summary(&self) -> Result<RemoteCartSummary, CommerceError> {
        let request = self.inner.client.get(self.url("/cart.js"));
        let text = self.send(request).await?;
        parse_summary(&text)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Send a request carrying the cart cookie and return the body text.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, CommerceError> {
        let request = match self.inner.cart_token.read().await.as_deref() {
            Some(token) => request.header(COOKIE, format!("{CART_COOKIE}={token}")),
            None => request,
        };

        let response = request.header("Accept", "application/json").send().await?;
        let status = response.status();

        if let Some(token) = cart_token_from(response.headers()) {
            debug!("Store assigned cart token");
            *self.inner.cart_token.write().await = Some(token);
        }

        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(CommerceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(text)
    }
}

fn parse_summary(text: &str) -> Result<RemoteCartSummary, CommerceError> {
    serde_json::from_str(text)
        .map_err(|e| CommerceError::Parse(format!("Failed to parse cart: {e}")))
}

/// Extract the `cart` cookie value from `Set-Cookie` headers.
fn cart_token_from(headers: &reqwest::header::HeaderMap) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, value)| name.trim() == CART_COOKIE && !value.is_empty())
        .map(|(_, value)| value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn cart_json(item_count: u32, total_price: i64) -> serde_json::Value {
        json!({
            "token": "c1-abc",
            "item_count": item_count,
            "total_price": total_price,
            "currency": "USD",
            "items": []
        })
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(1234), "$12.34");
        assert_eq!(format_money(0), "$0.00");
        assert_eq!(format_money(17600), "$176.00");
    }

    #[test]
    fn test_retryable_classification() {
        let api = |status| CommerceError::Api {
            status,
            message: String::new(),
        };
        assert!(api(429).is_retryable());
        assert!(api(503).is_retryable());
        assert!(!api(422).is_retryable());
        assert!(!api(404).is_retryable());
        assert!(!CommerceError::Parse("bad".to_string()).is_retryable());
    }

    #[test]
    fn test_empty_store_is_rejected() {
        assert!(matches!(
            AjaxCartClient::new("  "),
            Err(CommerceError::InvalidStore(_))
        ));
    }

    #[tokio::test]
    async fn test_add_posts_then_reads_cart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cart/add.js"))
            .and(body_json(json!({ "items": [{ "id": 40123, "quantity": 2 }] })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "cart=c1-abc; path=/; HttpOnly")
                    .set_body_json(json!({ "items": [] })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/cart.js"))
            .and(header("cookie", "cart=c1-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(2, 17600)))
            .expect(1)
            .mount(&server)
            .await;

        let client = AjaxCartClient::with_base_url(&server.uri()).expect("client");
        let cart = client.add(40123, 2).await.expect("add succeeds");

        assert_eq!(cart.item_count, 2);
        assert_eq!(cart.total_price, 17600);
        assert_eq!(client.cart_token().await.as_deref(), Some("c1-abc"));
    }

    #[tokio::test]
    async fn test_change_returns_cart_from_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cart/change.js"))
            .and(header("cookie", "cart=c1-xyz"))
            .and(body_json(json!({ "id": "40123:9f1c", "quantity": 0 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(0, 0)))
            .expect(1)
            .mount(&server)
            .await;

        let client = AjaxCartClient::with_base_url(&server.uri())
            .expect("client")
            .with_cart_token("c1-xyz");
        let cart = client.change("40123:9f1c", 0).await.expect("change succeeds");

        assert_eq!(cart.item_count, 0);
    }

    #[tokio::test]
    async fn test_store_rejection_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cart/add.js"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "status": 422,
                "message": "Cart Error",
                "description": "All 1 Rise Jacket are in your cart."
            })))
            .mount(&server)
            .await;

        let client = AjaxCartClient::with_base_url(&server.uri()).expect("client");
        let err = client.add(1, 1).await.expect_err("store rejects");

        match &err {
            CommerceError::Api { status, message } => {
                assert_eq!(*status, 422);
                assert_eq!(message, "All 1 Rise Jacket are in your cart.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_server_error_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cart.js"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = AjaxCartClient::with_base_url(&server.uri()).expect("client");
        let err = client.summary().await.expect_err("unavailable");
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_unreachable_store_is_retryable() {
        let client = AjaxCartClient::with_base_url("http://127.0.0.1:9").expect("client");
        let err = client.summary().await.expect_err("no listener");
        assert!(matches!(err, CommerceError::Http(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_non_cart_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cart.js"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = AjaxCartClient::with_base_url(&server.uri()).expect("client");
        assert!(matches!(
            client.summary().await,
            Err(CommerceError::Parse(_))
        ));
    }
}
