//! Visitor preferences persisted on the device.
//!
//! The only one today is whether the newsletter popup was dismissed. It is a
//! long-lived cookie rather than session data so it outlives the session and
//! never touches server storage. Unset means "not dismissed".

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::COOKIE, request::Parts},
};
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};

/// Cookie recording a dismissed newsletter popup.
pub const POPUP_DISMISSED_COOKIE: &str = "athyre_popup_dismissed";

const POPUP_DISMISSED_VALUE: &str = "true";

/// How long the dismissal is remembered (one year).
const POPUP_DISMISSED_MAX_AGE_DAYS: i64 = 365;

/// Whether the visitor has dismissed the newsletter popup.
///
/// # Example
///
/// ```ignore
/// async fn handler(PopupDismissed(dismissed): PopupDismissed) -> impl IntoResponse {
///     HomeTemplate { show_popup: !dismissed, /* ... */ }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopupDismissed(pub bool);

impl PopupDismissed {
    /// Read the flag from request headers. Anything but `true` counts as unset.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let dismissed = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| Cookie::split_parse(value).filter_map(Result::ok))
            .any(|cookie| {
                cookie.name() == POPUP_DISMISSED_COOKIE && cookie.value() == POPUP_DISMISSED_VALUE
            });
        Self(dismissed)
    }
}

impl<S> FromRequestParts<S> for PopupDismissed
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// `Set-Cookie` value that records the dismissal.
#[must_use]
pub fn popup_dismissed_cookie(secure: bool) -> String {
    Cookie::build((POPUP_DISMISSED_COOKIE, POPUP_DISMISSED_VALUE))
        .path("/")
        .max_age(Duration::days(POPUP_DISMISSED_MAX_AGE_DAYS))
        .same_site(SameSite::Lax)
        .http_only(true)
        .secure(secure)
        .build()
        .to_string()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for cookie in cookies {
            map.append(COOKIE, HeaderValue::from_str(cookie).expect("valid header"));
        }
        map
    }

    #[test]
    fn test_absent_cookie_means_not_dismissed() {
        assert_eq!(PopupDismissed::from_headers(&HeaderMap::new()), PopupDismissed(false));
        assert_eq!(
            PopupDismissed::from_headers(&headers(&["athyre_session=abc"])),
            PopupDismissed(false)
        );
    }

    #[test]
    fn test_dismissed_cookie_among_others() {
        let map = headers(&["athyre_session=abc; athyre_popup_dismissed=true"]);
        assert_eq!(PopupDismissed::from_headers(&map), PopupDismissed(true));

        let map = headers(&["athyre_session=abc", "athyre_popup_dismissed=true"]);
        assert_eq!(PopupDismissed::from_headers(&map), PopupDismissed(true));
    }

    #[test]
    fn test_other_values_are_not_dismissed() {
        let map = headers(&["athyre_popup_dismissed=false"]);
        assert_eq!(PopupDismissed::from_headers(&map), PopupDismissed(false));
    }

    #[test]
    fn test_dismissal_cookie_attributes() {
        let cookie = popup_dismissed_cookie(true);
        assert!(cookie.starts_with("athyre_popup_dismissed=true"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=31536000"));
        assert!(cookie.contains("Secure"));

        assert!(!popup_dismissed_cookie(false).contains("Secure"));
    }
}
