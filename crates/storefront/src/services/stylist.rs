//! AI styling assistant backed by the Gemini Generative Language API.
//!
//! The assistant forwards a shopper's goal, wrapped in a fixed stylist
//! preamble, and shows whatever advice comes back. It never surfaces an
//! error: a missing key, an empty reply, or a failed call each map to a
//! fixed fallback sentence.
//!
//! Each visitor's transcript lives behind an async mutex, so a second
//! message from the same visitor waits for the first reply instead of
//! racing it.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::instrument;
use uuid::Uuid;

use crate::config::GeminiConfig;

/// Shown when no API key is configured.
pub const UNAVAILABLE_MESSAGE: &str =
    "AI Styling is currently unavailable. Please provide an API Key.";

/// Shown when the model answers with no text.
pub const EMPTY_REPLY_MESSAGE: &str =
    "I recommend looking for high-performance pieces that move with you.";

/// Shown when the call fails for any reason.
pub const FAILURE_MESSAGE: &str =
    "I recommend our versatile Rise Collection pieces for your journey.";

/// First message of every transcript.
pub const WELCOME_MESSAGE: &str = "Welcome to ATHŸRE. I'm your AI styling assistant. What activity are you training for today?";

/// Idle transcripts are dropped after this long.
const TRANSCRIPT_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

const MAX_TRANSCRIPTS: u64 = 10_000;

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.8;
const TOP_K: u32 = 40;

/// Errors talking to the Generative Language API.
#[derive(Debug, Error)]
pub enum StylistError {
    /// HTTP request failed (includes timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Build the prompt sent for a shopper's goal.
#[must_use]
pub fn styling_prompt(goal: &str) -> String {
    format!(
        "You are a professional activewear stylist for ATHŸRE.\n\
         A customer is looking for gear advice. Their goal or activity is: \"{goal}\".\n\
         Provide a short, motivating styling recommendation (max 3 sentences) that suggests\n\
         what type of gear (Tops, Bottoms, Outerwear) would be best from our 'Rise' collection."
    )
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, with its parts joined.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

// =============================================================================
// Client
// =============================================================================

/// Generative Language API client.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl GeminiClient {
    /// Create a client, or `None` when no API key is configured.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn from_config(config: &GeminiConfig) -> Result<Option<Self>, StylistError> {
        let Some(api_key) = config.api_key.as_ref() else {
            return Ok(None);
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|e| StylistError::Config(format!("Invalid API key format: {e}")))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Some(Self {
            client,
            endpoint,
            model: config.model.clone(),
        }))
    }

    /// Generate text for a prompt. `Ok(None)` means the model returned nothing.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the API answers with a non-success
    /// status, or the body cannot be parsed.
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    pub async fn generate(&self, prompt: &str) -> Result<Option<String>, StylistError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                top_k: TOP_K,
            },
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StylistError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| StylistError::Parse(format!("Failed to parse response: {e}")))?;

        Ok(parsed.text())
    }
}

// =============================================================================
// Assistant
// =============================================================================

/// Who wrote a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the visible transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// The conversation shown in the chat widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage {
                role: Role::Assistant,
                text: WELCOME_MESSAGE.to_string(),
            }],
        }
    }
}

impl Transcript {
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, role: Role, text: String) {
        self.messages.push(ChatMessage { role, text });
    }
}

/// Styling assistant with per-visitor transcripts.
#[derive(Clone)]
pub struct StylingAssistant {
    client: Option<GeminiClient>,
    transcripts: Cache<Uuid, Arc<Mutex<Transcript>>>,
}

impl StylingAssistant {
    /// Create an assistant; `None` makes every reply the "unavailable" message.
    #[must_use]
    pub fn new(client: Option<GeminiClient>) -> Self {
        let transcripts = Cache::builder()
            .max_capacity(MAX_TRANSCRIPTS)
            .time_to_idle(TRANSCRIPT_IDLE_TIMEOUT)
            .build();
        Self {
            client,
            transcripts,
        }
    }

    /// Advice for a goal. Never fails; failures become fallback text.
    #[instrument(skip(self, goal))]
    pub async fn advise(&self, goal: &str) -> String {
        let Some(client) = self.client.as_ref() else {
            return UNAVAILABLE_MESSAGE.to_string();
        };

        match client.generate(&styling_prompt(goal)).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::warn!("Styling assistant returned an empty reply");
                EMPTY_REPLY_MESSAGE.to_string()
            }
            Err(e) => {
                tracing::error!(error = %e, "Styling assistant request failed");
                FAILURE_MESSAGE.to_string()
            }
        }
    }

    async fn transcript_for(&self, visitor: Uuid) -> Arc<Mutex<Transcript>> {
        self.transcripts
            .get_with(visitor, async { Arc::new(Mutex::new(Transcript::default())) })
            .await
    }

    /// Current transcript for a visitor.
    pub async fn transcript(&self, visitor: Uuid) -> Transcript {
        self.transcript_for(visitor).await.lock().await.clone()
    }

    /// Send a message and wait for the reply.
    ///
    /// Blank input is ignored. Messages from one visitor are handled one at a
    /// time; each gets exactly one reply appended.
    pub async fn send(&self, visitor: Uuid, input: &str) -> Transcript {
        let transcript = self.transcript_for(visitor).await;
        let mut transcript = transcript.lock().await;

        let input = input.trim();
        if input.is_empty() {
            return transcript.clone();
        }

        transcript.push(Role::User, input.to_string());
        let advice = self.advise(input).await;
        transcript.push(Role::Assistant, advice);
        transcript.clone()
    }
}
