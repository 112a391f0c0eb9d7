use thiserror::Error;

/// Top-level error type for the `ticketdesk-api` crate.
///
/// Covers every failure mode of the REST boundary: transport, HTTP status,
/// and payload decoding. `ticketdesk-core` maps these into user-facing
/// errors and notifications.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Backend rejected the submitted credentials (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-2xx response. `body` is the raw response text, which the
    /// backend uses for messages such as "Email is already in use."
    #[error("Backend error (HTTP {status}): {}", display_body(body))]
    Status { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Serializing a request part failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn display_body(body: &str) -> &str {
    if body.trim().is_empty() {
        "<empty body>"
    } else {
        body.trim()
    }
}

impl Error {
    /// Returns `true` if the backend answered 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::Status { status: 401, .. }
        )
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Status { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` for connection-level failures (no response received).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout { .. })
    }

    /// The server-provided message, if the backend sent a non-empty body.
    ///
    /// The backend answers errors with either plain text or a JSON object
    /// carrying a `message` field; both are handled.
    pub fn server_message(&self) -> Option<String> {
        let body = match self {
            Self::Status { body, .. } => body.trim(),
            Self::Authentication { message } => message.trim(),
            _ => return None,
        };
        if body.is_empty() {
            return None;
        }
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(body) {
            return map
                .get("message")
                .and_then(serde_json::Value::as_str)
                .filter(|m| !m.trim().is_empty())
                .map(str::to_owned);
        }
        Some(body.to_owned())
    }
}
