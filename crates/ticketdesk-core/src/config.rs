// ── Runtime connection configuration ──
//
// Describes how to reach the backend. Never touches disk: the CLI builds a
// `ClientConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use ticketdesk_api::{TicketClient, TransportConfig};
use url::Url;

use crate::error::CoreError;

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Configuration for talking to one backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend root, e.g. `http://localhost:8080`.
    pub url: Url,
    pub timeout: Duration,
    /// Initial page size for list controllers.
    pub page_size: usize,
    pub ca_cert: Option<PathBuf>,
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: Duration::from_secs(30),
            page_size: DEFAULT_PAGE_SIZE,
            ca_cert: None,
            accept_invalid_certs: false,
        }
    }

    fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            ca_cert: self.ca_cert.clone(),
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }

    /// Build the HTTP client described by this config.
    pub fn build_client(&self) -> Result<TicketClient, CoreError> {
        Ok(TicketClient::new(self.url.clone(), &self.transport())?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::new("http://localhost:8080".parse().unwrap());
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.timeout, Duration::from_secs(30));
        let client = config.build_client().unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/");
    }

    #[test]
    fn missing_ca_cert_is_config_error() {
        let mut config = ClientConfig::new("http://localhost:8080".parse().unwrap());
        config.ca_cert = Some(PathBuf::from("/nonexistent/ca.pem"));
        let err = config.build_client().err().unwrap();
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
