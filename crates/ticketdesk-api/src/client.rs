// Backend HTTP client
//
// Wraps `reqwest::Client` with URL construction and status handling for
// the ticketing backend. Entity-specific and account endpoints are
// implemented as inherent methods in sibling modules to keep this one
// focused on transport mechanics.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{Attachment, RecordId};
use crate::resource::{ListScope, Resource};
use crate::transport::TransportConfig;

/// Raw HTTP client for the ticketing backend.
///
/// Collections are fetched wholesale (`GET /{entity}/all`); writes answer
/// with either JSON or plain text, so write helpers hand back the body text
/// and leave interpretation to the caller.
#[derive(Clone)]
pub struct TicketClient {
    http: reqwest::Client,
    base_url: Url,
    /// Request timeout, when the client was built from a `TransportConfig`.
    timeout: Option<Duration>,
}

impl TicketClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root, e.g. `http://localhost:8080`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            timeout: Some(transport.timeout),
            ..Self::with_client(http, base_url)
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
            timeout: None,
        }
    }

    /// Parse `base_url` and wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let url = Url::parse(base_url)?;
        Ok(Self::with_client(http, url))
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// A timeout is reported with the configured limit when it is known.
    fn map_transport(&self, err: reqwest::Error) -> Error {
        match self.timeout {
            Some(limit) if err.is_timeout() => Error::Timeout {
                timeout_secs: limit.as_secs(),
            },
            _ => Error::Transport(err),
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve a backend-relative path such as `categories/all`.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Generic resource operations ──────────────────────────────────

    /// `GET /{entity}/all` (or the scoped variant).
    pub async fn list<R: Resource>(&self, scope: ListScope) -> Result<Vec<R>, Error> {
        let url = self.url(&R::list_path(scope))?;
        debug!(entity = R::NAME, "listing collection");
        self.get_list(url).await
    }

    /// Create a record from a JSON body.
    pub async fn create<R: Resource>(&self, input: &R::Input) -> Result<String, Error> {
        let url = self.url(&R::create_path())?;
        debug!(entity = R::NAME, "creating record");
        self.post_json(url, input).await
    }

    /// Create a record as multipart: the record as a JSON `event`-style
    /// part plus the attachment as the `image` part.
    pub async fn create_with_attachment<R: Resource>(
        &self,
        part_name: &str,
        input: &R::Input,
        attachment: &Attachment,
    ) -> Result<String, Error> {
        let url = self.url(&R::create_path())?;
        debug!(entity = R::NAME, file = %attachment.file_name, "creating record with attachment");
        let form = multipart_form(part_name, input, Some(attachment))?;
        self.send(self.http.post(url).multipart(form)).await
    }

    /// Update a record. Kinds without an update endpoint fail locally with
    /// a 405 status and no request is sent.
    pub async fn update<R: Resource>(&self, id: RecordId, input: &R::Input) -> Result<String, Error> {
        let path = R::update_path(id).ok_or_else(|| unsupported::<R>("updated"))?;
        let url = self.url(&path)?;
        debug!(entity = R::NAME, id, "updating record");
        self.put_json(url, input).await
    }

    /// Multipart update with an optional replacement attachment.
    pub async fn update_with_attachment<R: Resource>(
        &self,
        id: RecordId,
        part_name: &str,
        input: &R::Input,
        attachment: Option<&Attachment>,
    ) -> Result<String, Error> {
        let path = R::update_path(id).ok_or_else(|| unsupported::<R>("updated"))?;
        let url = self.url(&path)?;
        debug!(entity = R::NAME, id, "updating record with attachment");
        let form = multipart_form(part_name, input, attachment)?;
        self.send(self.http.put(url).multipart(form)).await
    }

    /// Delete a record. Success is any 2xx (the backend uses 200 and 204).
    pub async fn delete<R: Resource>(&self, id: RecordId) -> Result<(), Error> {
        let path = R::delete_path(id).ok_or_else(|| unsupported::<R>("deleted"))?;
        let url = self.url(&path)?;
        debug!(entity = R::NAME, id, "deleting record");
        self.send(self.http.delete(url)).await.map(|_| ())
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode a JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let body = self.send(self.http.get(url)).await?;
        decode(&body)
    }

    /// Send a GET request for a collection.
    ///
    /// Some endpoints answer a lone object instead of a one-element array;
    /// that is accepted and wrapped.
    pub(crate) async fn get_list<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        debug!("GET {}", url);
        let body = self.send(self.http.get(url)).await?;
        match serde_json::from_str::<Vec<T>>(&body) {
            Ok(items) => Ok(items),
            Err(list_err) => match serde_json::from_str::<T>(&body) {
                Ok(single) => Ok(vec![single]),
                Err(_) => Err(Error::Deserialization {
                    message: list_err.to_string(),
                    body,
                }),
            },
        }
    }

    /// Send a POST request with JSON body, returning the raw body text.
    pub(crate) async fn post_json(&self, url: Url, body: &impl Serialize) -> Result<String, Error> {
        debug!("POST {}", url);
        self.send(self.http.post(url).json(body)).await
    }

    /// Send a POST request with no body.
    pub(crate) async fn post_empty(&self, url: Url) -> Result<String, Error> {
        debug!("POST {}", url);
        self.send(self.http.post(url)).await
    }

    /// Send a PUT request with JSON body, returning the raw body text.
    pub(crate) async fn put_json(&self, url: Url, body: &impl Serialize) -> Result<String, Error> {
        debug!("PUT {}", url);
        self.send(self.http.put(url).json(body)).await
    }

    /// Dispatch a request and map non-2xx statuses into errors.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, Error> {
        let resp = request.send().await.map_err(|e| self.map_transport(e))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.map_transport(e))?;

        if status.is_success() {
            return Ok(body);
        }

        debug!(status = status.as_u16(), "backend rejected request");
        if status == reqwest::StatusCode::UNAUTHORIZED {
            let message = if body.trim().is_empty() {
                "invalid credentials".to_owned()
            } else {
                body
            };
            return Err(Error::Authentication { message });
        }

        Err(Error::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// Ensure the base URL ends in `/` so relative joins append instead of
/// replacing the last path segment.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn unsupported<R: Resource>(action: &str) -> Error {
    Error::Status {
        status: 405,
        body: format!("{} records cannot be {action}", R::NAME),
    }
}


pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })
}

fn multipart_form(
    part_name: &str,
    input: &impl Serialize,
    attachment: Option<&Attachment>,
) -> Result<Form, Error> {
    let json = serde_json::to_string(input)?;
    let mut form = Form::new().part(
        part_name.to_owned(),
        Part::text(json).mime_str("application/json")?,
    );
    if let Some(attachment) = attachment {
        let mut part = Part::bytes(attachment.bytes.clone()).file_name(attachment.file_name.clone());
        if let Some(ref content_type) = attachment.content_type {
            part = part.mime_str(content_type)?;
        }
        form = form.part("image", part);
    }
    Ok(form)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client =
            TicketClient::from_reqwest("http://localhost:8080/api", reqwest::Client::new()).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/api/");
        assert_eq!(
            client.url("categories/all").unwrap().as_str(),
            "http://localhost:8080/api/categories/all"
        );
    }

    #[test]
    fn leading_slash_does_not_escape_base_path() {
        let client =
            TicketClient::from_reqwest("http://localhost:8080/api/", reqwest::Client::new()).unwrap();
        assert_eq!(
            client.url("/events/3").unwrap().as_str(),
            "http://localhost:8080/api/events/3"
        );
    }
}
