//! Custom Askama template filters.

use std::fmt::Display;

/// Width requested for thumbnails in the cart drawer.
const THUMBNAIL_WIDTH: u32 = 200;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Rewrites a catalog image URL to its thumbnail width.
///
/// Catalog images carry a `?w=` query; anything else passes through.
///
/// Usage in templates: `{{ image|thumbnail }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn thumbnail(url: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(thumbnail_url(&url.to_string()))
}

fn thumbnail_url(url: &str) -> String {
    match url.split_once("?w=") {
        Some((base, _)) => format!("{base}?w={THUMBNAIL_WIDTH}"),
        None => url.to_string(),
    }
}
