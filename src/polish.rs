//! External text-polisher client with mandatory pass-through fallback.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Input ceiling enforced by the collaborator; larger notes are rejected
/// with a 413 and take the normal fallback path.
pub const MAX_CONTEXT_CHARS: usize = 8000;

#[derive(Debug)]
pub enum PolishError {
    Http(reqwest::Error),
    Server { status: u16, body: String },
}

impl From<reqwest::Error> for PolishError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// One-shot text transform collaborator.
///
/// A single request per invocation: no retry, no cancellation once sent.
/// Preventing a concurrent second invocation is the caller's responsibility.
#[allow(async_fn_in_trait)]
pub trait Polisher {
    /// Transforms free-text notes into formalized report text.
    async fn polish(&self, notes: &str) -> Result<String, PolishError>;
}

#[derive(Debug, Serialize)]
struct PolishRequest<'a> {
    context: &'a str,
}

#[derive(Debug, Deserialize)]
struct PolishResponse {
    text: String,
}

/// HTTP client for the polish endpoint.
pub struct HttpPolisher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPolisher {
    /// Creates a client for `base_url` (trailing slash tolerated).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Polisher for HttpPolisher {
    async fn polish(&self, notes: &str) -> Result<String, PolishError> {
        let url = format!("{}/api/polish", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&PolishRequest { context: notes })
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PolishError::Server {
                status: status.as_u16(),
                body,
            });
        }
        let parsed: PolishResponse = resp.json().await?;
        Ok(parsed.text)
    }
}

/// Polishes `notes`, returning the original text unchanged on any transport
/// failure, non-success status, malformed body, or blank result.
///
/// The fallback is the contract: this never errors and is never surfaced to
/// the operator as a failure.
pub async fn polish_or_original(polisher: &impl Polisher, notes: &str) -> String {
    match polisher.polish(notes).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => notes.to_string(),
        Err(err) => {
            warn!(err = ?err, "polish failed, keeping original text");
            notes.to_string()
        }
    }
}
