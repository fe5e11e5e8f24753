//! Integration tests for ATHYRE.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p athyre-integration-tests
//! ```
//!
//! The storefront router runs in-process: requests go through
//! `tower::ServiceExt::oneshot` and [`TestApp`] carries cookies between them
//! the way a browser would, so each `TestApp` is one visitor.
//!
//! # Test Categories
//!
//! - `cart` - Drawer fragments and the aggregator rules over HTTP
//! - `cart_ajax` - `/cart.js`, `/cart/add.js`, `/cart/change.js`, concurrent adds
//! - `pages` - Home, product, collection, journal, gift cards, health
//! - `popup` - Delayed newsletter popup and its dismissal
//! - `assistant` - Styling assistant transcript and fallbacks

use std::collections::BTreeMap;
use std::time::Duration;

use athyre_storefront::config::{GeminiConfig, StorefrontConfig};
use athyre_storefront::state::AppState;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use tower::ServiceExt;

/// Configuration for a local test storefront with the assistant disabled.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        gemini: GeminiConfig::default(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Configuration whose assistant talks to `gemini_base_url`.
#[must_use]
pub fn test_config_with_gemini(gemini_base_url: &str) -> StorefrontConfig {
    StorefrontConfig {
        gemini: GeminiConfig {
            api_key: Some("AIzaIntegrationKey7x9Q2".into()),
            base_url: gemini_base_url.to_string(),
            timeout: Duration::from_secs(2),
            ..GeminiConfig::default()
        },
        ..test_config()
    }
}

/// A response with its body read to a string.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Header value as a string, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body is JSON")
    }
}

/// One visitor talking to an in-process storefront.
///
/// A clone copies the cookie jar, so it is the same visitor. Clones let one
/// visitor send requests concurrently.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
    cookies: BTreeMap<String, String>,
}

impl TestApp {
    /// Storefront with the assistant disabled.
    ///
    /// # Panics
    ///
    /// Panics if the application state cannot be built.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Storefront built from `config`.
    ///
    /// # Panics
    ///
    /// Panics if the application state cannot be built.
    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        let state = AppState::new(config).expect("state builds");
        Self {
            router: athyre_storefront::app(state),
            cookies: BTreeMap::new(),
        }
    }

    /// A second visitor on the same storefront (same sessions and assistant).
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookies: BTreeMap::new(),
        }
    }

    /// Whether the visitor holds a cookie named `name`.
    #[must_use]
    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).expect("request");
        self.send(request).await
    }

    /// POST an urlencoded form body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn post_form(&mut self, uri: &str, form: &str) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .expect("request");
        self.send(request).await
    }

    /// POST a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn post_json(&mut self, uri: &str, json: &serde_json::Value) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request");
        self.send(request).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        if self.cookies.is_empty() {
            return builder;
        }
        let cookie = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        builder.header(header::COOKIE, cookie)
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        for value in response.headers().get_all(header::SET_COOKIE) {
            let Some(pair) = value.to_str().ok().and_then(|v| v.split(';').next()) else {
                continue;
            };
            if let Some((name, value)) = pair.split_once('=') {
                self.cookies
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).expect("utf8 body"),
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
