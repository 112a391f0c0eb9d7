//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use ticketdesk_config::ConfigError;
use ticketdesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const VALIDATION: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to backend at {url}")]
    #[diagnostic(
        code(ticketdesk::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}\n\
             Try: ticketdesk --backend http://localhost:8080 whoami"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(ticketdesk::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(ticketdesk::auth_failed),
        help("Forgot it? Run: ticketdesk reset-password --email <EMAIL>")
    )]
    InvalidCredentials { message: String },

    #[error("Not signed in")]
    #[diagnostic(code(ticketdesk::not_signed_in), help("Run: ticketdesk login"))]
    NotSignedIn,

    #[error("{message}")]
    #[diagnostic(
        code(ticketdesk::forbidden),
        help("Run `ticketdesk menu` to see what your account can do.")
    )]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(ticketdesk::not_found),
        help("Run: ticketdesk {list_command} to see available records")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(code(ticketdesk::rejected))]
    Rejected { message: String },

    #[error("{message}")]
    #[diagnostic(code(ticketdesk::api_error))]
    ApiError { message: String },

    #[error("Operation not supported: {operation}")]
    #[diagnostic(code(ticketdesk::unsupported))]
    Unsupported { operation: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("{reason}")]
    #[diagnostic(code(ticketdesk::validation), help("Check: {field}"))]
    Validation { field: String, reason: String },

    #[error("{message}")]
    #[diagnostic(code(ticketdesk::paging), help("Use --page within the listed range."))]
    Paging { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ticketdesk::profile_not_found),
        help(
            "Known profiles: {available}\n\
             Create one with: ticketdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(ticketdesk::config),
        help("Inspect it with: ticketdesk config show")
    )]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(ticketdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Prompt failed: {reason}")]
    #[diagnostic(code(ticketdesk::prompt))]
    Prompt { reason: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(ticketdesk::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::InvalidCredentials { .. } | Self::NotSignedIn => exit_code::AUTH,
            Self::Forbidden { .. } | Self::Unsupported { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::VALIDATION,
            Self::Paging { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::Prompt { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn not_found(resource_type: &str, id: i64, list_command: &str) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: id.to_string(),
            list_command: list_command.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { fields, message } => Self::Validation {
                field: fields.join(", "),
                reason: message,
            },
            e @ CoreError::InvalidCredentials => Self::InvalidCredentials {
                message: e.to_string(),
            },
            CoreError::NotAuthenticated => Self::NotSignedIn,
            e @ CoreError::Forbidden { .. } => Self::Forbidden {
                message: e.to_string(),
            },
            e @ (CoreError::InvalidPage { .. } | CoreError::InvalidPageSize) => Self::Paging {
                message: e.to_string(),
            },
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::Write { message, .. } => Self::Rejected { message },
            CoreError::Unsupported { operation } => Self::Unsupported { operation },
            CoreError::Config { message } => Self::Config { message },
            e @ (CoreError::Fetch { .. } | CoreError::Api { .. } | CoreError::Internal(_)) => {
                Self::ApiError {
                    message: e.to_string(),
                }
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownProfile { name, known } => Self::ProfileNotFound {
                name,
                available: known,
            },
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_core_errors() {
        let code = |e: CoreError| CliError::from(e).exit_code();
        assert_eq!(code(CoreError::InvalidCredentials), exit_code::AUTH);
        assert_eq!(code(CoreError::NotAuthenticated), exit_code::AUTH);
        assert_eq!(code(CoreError::Timeout), exit_code::TIMEOUT);
        assert_eq!(
            code(CoreError::Validation {
                fields: vec!["name"],
                message: "Category name is required.".into(),
            }),
            exit_code::VALIDATION
        );
        assert_eq!(
            code(CoreError::Forbidden {
                action: "Sending reminders".into(),
                required: "admin".into(),
            }),
            exit_code::PERMISSION
        );
        assert_eq!(code(CoreError::InvalidPage { page: 9, last: 2 }), exit_code::USAGE);
        assert_eq!(
            code(CoreError::Write {
                message: "Email is already in use.".into(),
                status: Some(400),
            }),
            exit_code::GENERAL
        );
    }

    #[test]
    fn server_message_is_the_headline() {
        let err = CliError::from(CoreError::Write {
            message: "Email is already in use.".into(),
            status: None,
        });
        assert_eq!(err.to_string(), "Email is already in use.");
    }
}
