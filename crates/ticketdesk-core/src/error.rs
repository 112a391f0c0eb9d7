// ── Core error types ──
//
// User-facing errors from ticketdesk-core. Consumers never see reqwest
// errors or JSON parse failures directly; the `From<ticketdesk_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Message shown for any failed login, whichever endpoint rejected it.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Client-side checks ───────────────────────────────────────────
    /// Form values failed local validation. No request was sent.
    #[error("{message}")]
    Validation {
        fields: Vec<&'static str>,
        message: String,
    },

    #[error("Page {page} is out of range (last page is {last})")]
    InvalidPage { page: usize, last: usize },

    #[error("Page size must be at least 1")]
    InvalidPageSize,

    // ── Session errors ───────────────────────────────────────────────
    #[error("{INVALID_CREDENTIALS}")]
    InvalidCredentials,

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("{action} is only available to {required} accounts")]
    Forbidden { action: String, required: String },

    // ── Backend errors ───────────────────────────────────────────────
    /// The collection could not be fetched.
    #[error("Could not load {entity}: {reason}")]
    Fetch { entity: &'static str, reason: String },

    /// A create, update or delete was rejected. `message` is the server's
    /// text when it sent one.
    #[error("{message}")]
    Write { message: String, status: Option<u16> },

    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    #[error("Backend error: {message}")]
    Api { message: String, status: Option<u16> },

    #[error("Operation not supported: {operation}")]
    Unsupported { operation: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build a `Write` error from a failed request, preferring the
    /// server's own message over `fallback`.
    pub(crate) fn write(err: &ticketdesk_api::Error, fallback: impl FnOnce() -> String) -> Self {
        let status = match err {
            ticketdesk_api::Error::Status { status, .. } => Some(*status),
            ticketdesk_api::Error::Authentication { .. } => Some(401),
            _ => None,
        };
        let message = if err.is_transport() {
            fallback()
        } else {
            err.server_message().unwrap_or_else(fallback)
        };
        Self::Write { message, status }
    }

    /// True when the failure happened before anything was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::InvalidPage { .. }
                | Self::InvalidPageSize
                | Self::NotAuthenticated
                | Self::Forbidden { .. }
                | Self::Unsupported { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ticketdesk_api::Error> for CoreError {
    fn from(err: ticketdesk_api::Error) -> Self {
        let server_message = err.server_message();
        match err {
            ticketdesk_api::Error::Authentication { message } => CoreError::Api {
                message,
                status: Some(401),
            },
            ticketdesk_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ticketdesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ticketdesk_api::Error::Timeout { .. } => CoreError::Timeout,
            ticketdesk_api::Error::ClientBuild(message) => CoreError::Config { message },
            ticketdesk_api::Error::Status { status, .. } => CoreError::Api {
                message: server_message.unwrap_or_else(|| format!("HTTP {status}")),
                status: Some(status),
            },
            ticketdesk_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            ticketdesk_api::Error::Serialization(e) => {
                CoreError::Internal(format!("Serialization error: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_keep_server_text() {
        let err: CoreError = ticketdesk_api::Error::Status {
            status: 409,
            body: "Category name already exists".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Api { status: Some(409), .. }));
        assert_eq!(err.to_string(), "Backend error: Category name already exists");
    }

    #[test]
    fn write_prefers_server_message() {
        let api = ticketdesk_api::Error::Status {
            status: 400,
            body: "Email is already in use.".into(),
        };
        let err = CoreError::write(&api, || "Could not save customer.".into());
        assert_eq!(err.to_string(), "Email is already in use.");

        let empty = ticketdesk_api::Error::Status {
            status: 500,
            body: String::new(),
        };
        let err = CoreError::write(&empty, || "Could not save customer.".into());
        assert_eq!(err.to_string(), "Could not save customer.");
        assert!(matches!(err, CoreError::Write { status: Some(500), .. }));
    }

    #[test]
    fn invalid_credentials_message_is_generic() {
        assert_eq!(CoreError::InvalidCredentials.to_string(), INVALID_CREDENTIALS);
    }
}
