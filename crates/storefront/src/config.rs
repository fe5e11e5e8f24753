//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `GEMINI_API_KEY` - Generative Language API key; without it the styling
//!   assistant answers with its "unavailable" message
//! - `GEMINI_MODEL` - Model name (default: gemini-3-flash-preview)
//! - `GEMINI_BASE_URL` - API root (default: <https://generativelanguage.googleapis.com>)
//! - `GEMINI_TIMEOUT_SECS` - Request timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Default model for styling advice.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Default Generative Language API root.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 30;

/// Keys below this many bits per character were typed by hand.
const MIN_KEY_ENTROPY: f64 = 3.3;

/// Fragments that mark a copied `.env.example` value (matched lowercase).
const PLACEHOLDER_FRAGMENTS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid environment variable {name}: {reason}")]
    InvalidEnvVar { name: &'static str, reason: String },
    #[error("{0} looks like a placeholder, not a real key: {1}")]
    PlaceholderKey(&'static str, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Styling assistant configuration
    pub gemini: GeminiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `STOREFRONT_BASE_URL` is missing, a value does
    /// not parse, or `GEMINI_API_KEY` is a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Missing .env is normal outside development
        let _ = dotenvy::dotenv();

        let base_url = std::env::var("STOREFRONT_BASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("STOREFRONT_BASE_URL"))?;
        url::Url::parse(&base_url).map_err(|e| ConfigError::InvalidEnvVar {
            name: "STOREFRONT_BASE_URL",
            reason: e.to_string(),
        })?;

        Ok(Self {
            host: env_or("STOREFRONT_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?,
            port: env_or("STOREFRONT_PORT", DEFAULT_PORT)?,
            base_url,
            gemini: GeminiConfig::from_env()?,
            sentry_dsn: env_opt("SENTRY_DSN"),
            sentry_environment: env_opt("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

/// Generative Language API configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; `None` disables outbound calls entirely
    pub api_key: Option<SecretString>,
    /// Model name (e.g. gemini-3-flash-preview)
    pub model: String,
    /// API root, overridable for local testing
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl GeminiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = env_opt("GEMINI_API_KEY")
            .map(|key| check_api_key("GEMINI_API_KEY", key))
            .transpose()?;

        Ok(Self {
            api_key,
            model: env_opt("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: env_opt("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            timeout: Duration::from_secs(env_or(
                "GEMINI_TIMEOUT_SECS",
                DEFAULT_GEMINI_TIMEOUT_SECS,
            )?),
        })
    }

    /// Whether a key is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_GEMINI_TIMEOUT_SECS),
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// A set, non-blank environment variable.
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable, falling back to `default` when unset.
fn env_or<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    env_opt(name).map_or(Ok(default), |raw| {
        raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar {
            name,
            reason: e.to_string(),
        })
    })
}

/// Reject keys copied from an example file or typed by hand.
fn check_api_key(name: &'static str, key: String) -> Result<SecretString, ConfigError> {
    let lower = key.to_lowercase();
    if let Some(fragment) = PLACEHOLDER_FRAGMENTS.iter().find(|f| lower.contains(**f)) {
        return Err(ConfigError::PlaceholderKey(
            name,
            format!("contains '{fragment}'"),
        ));
    }

    let entropy = entropy_bits_per_char(&key);
    if entropy < MIN_KEY_ENTROPY {
        return Err(ConfigError::PlaceholderKey(
            name,
            format!("only {entropy:.2} bits of entropy per character"),
        ));
    }

    Ok(SecretString::from(key))
}

/// Shannon entropy of `s` in bits per character.
fn entropy_bits_per_char(s: &str) -> f64 {
    let mut counts: HashMap<char, u32> = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
    }

    let total = f64::from(counts.values().sum::<u32>());
    counts
        .values()
        .map(|&n| {
            let p = f64::from(n) / total;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy() {
        assert!(entropy_bits_per_char("").abs() < f64::EPSILON);
        assert!((entropy_bits_per_char("abab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_placeholder_keys_rejected() {
        for key in ["your-gemini-key-here", "INSERT_KEY_7f3kQ9zL2m", "AIzaXXXXXXXXXXXXXXXXX"] {
            assert!(
                matches!(
                    check_api_key("GEMINI_API_KEY", key.to_string()),
                    Err(ConfigError::PlaceholderKey("GEMINI_API_KEY", _))
                ),
                "{key} should be rejected"
            );
        }
    }

    #[test]
    fn test_low_entropy_key_rejected() {
        let err = check_api_key("GEMINI_API_KEY", "a".repeat(39)).expect_err("low entropy");
        assert!(err.to_string().contains("entropy"));
    }

    #[test]
    fn test_real_looking_key_accepted() {
        assert!(check_api_key("GEMINI_API_KEY", "AIzaSyD3k9Qx7Lm2Vb8Np4Rt6Wz1Jc5Hf0Ug".to_string()).is_ok());
    }

    #[test]
    fn test_socket_addr_and_secure() {
        let mut config = StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            base_url: "http://localhost:3000".to_string(),
            gemini: GeminiConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert!(!config.is_secure());

        config.base_url = "https://athyre.com".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_gemini_config_debug_redacts_key() {
        let config = GeminiConfig {
            api_key: Some(SecretString::from("AIzaSuperSecretValue123")),
            ..GeminiConfig::default()
        };

        let debug_output = format!("{config:?}");

        assert!(config.is_enabled());
        assert!(debug_output.contains(DEFAULT_GEMINI_MODEL));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("AIzaSuperSecretValue123"));
        assert!(!GeminiConfig::default().is_enabled());
    }
}
