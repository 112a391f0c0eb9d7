// Account endpoints: login (admin and customer), registration, password
// reset, and profile update.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;

use crate::client::{TicketClient, decode};
use crate::error::Error;
use crate::models::{Customer, RecordId, RegisterRequest, UserUpdate};

/// Email + password pair submitted to either login endpoint.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

impl TicketClient {
    /// `POST /users/login`.
    ///
    /// The admin endpoint answers with a confirmation string rather than a
    /// user record; a JSON object is returned as-is, anything else comes
    /// back as `Value::String`.
    pub async fn login_admin(&self, credentials: &Credentials) -> Result<serde_json::Value, Error> {
        let url = self.url("users/login")?;
        debug!(email = %credentials.email, "admin login attempt");
        let body = self
            .post_json(
                url,
                &LoginBody {
                    email: &credentials.email,
                    password: credentials.password.expose_secret(),
                },
            )
            .await?;
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }

    /// `POST /customers/login`. Answers with the customer record.
    pub async fn login_customer(&self, credentials: &Credentials) -> Result<Customer, Error> {
        let url = self.url("customers/login")?;
        debug!(email = %credentials.email, "customer login attempt");
        let body = self
            .post_json(
                url,
                &LoginBody {
                    email: &credentials.email,
                    password: credentials.password.expose_secret(),
                },
            )
            .await?;
        // A 200 with an empty body is how a rejected login looks on some
        // backend versions.
        if body.trim().is_empty() || body.trim() == "null" {
            return Err(Error::Authentication {
                message: "invalid credentials".into(),
            });
        }
        decode(&body)
    }

    /// `POST /users/register`. Returns the backend's confirmation text.
    pub async fn register(&self, request: &RegisterRequest) -> Result<String, Error> {
        let url = self.url("users/register")?;
        debug!(email = %request.email, "registering account");
        self.post_json(url, request).await
    }

    /// `POST /users/forgot-password?email=&newPassword=`.
    pub async fn forgot_password(&self, email: &str, new_password: &SecretString) -> Result<String, Error> {
        let mut url = self.url("users/forgot-password")?;
        url.query_pairs_mut()
            .append_pair("email", email)
            .append_pair("newPassword", new_password.expose_secret());
        debug!(%email, "resetting password");
        self.post_empty(url).await
    }

    /// `PUT /users/{id}`.
    pub async fn update_user(&self, id: RecordId, update: &UserUpdate) -> Result<String, Error> {
        let url = self.url(&format!("users/{id}"))?;
        debug!(id, "updating user profile");
        self.put_json(url, update).await
    }
}
