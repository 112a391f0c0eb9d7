// ── Account flows ──
//
// Login fallback chain (admin endpoint, then customer endpoint), sign-up,
// password reset and profile update. The login chain never reveals which
// endpoint rejected the credentials.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use ticketdesk_api::models::{RegisterRequest, UserUpdate};
use ticketdesk_api::{Credentials, TicketClient};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::session::{Principal, Role, Session};
use crate::validate::{ALL_FIELDS_REQUIRED, Checks, PASSWORD_RULES, is_strong_password, is_valid_email};

pub const NO_CHANGES: &str = "No changes detected.";

pub const PASSWORD_UPDATED: &str = "Password updated successfully!";

impl Session {
    /// Sign in, trying the admin endpoint first and the customer endpoint
    /// second. Both failing yields [`CoreError::InvalidCredentials`].
    pub async fn login(
        &self,
        client: &TicketClient,
        credentials: &Credentials,
    ) -> Result<Arc<Principal>, CoreError> {
        let mut checks = Checks::new();
        checks.required(&[
            ("email", credentials.email.as_str()),
            ("password", credentials.password.expose_secret()),
        ]);
        checks.finish()?;

        let email = credentials.email.trim();
        let principal = match client.login_admin(credentials).await {
            Ok(reply) => Principal::admin(email, reply),
            Err(admin_err) => {
                debug!(error = %admin_err, "admin login rejected, trying customer login");
                match client.login_customer(credentials).await {
                    Ok(customer) => Principal::student(&customer, email),
                    Err(customer_err) => {
                        debug!(error = %customer_err, "customer login rejected");
                        // Connection problems are not a credentials problem.
                        if admin_err.is_transport() && customer_err.is_transport() {
                            return Err(customer_err.into());
                        }
                        return Err(CoreError::InvalidCredentials);
                    }
                }
            }
        };

        info!(email, role = %principal.role, "login succeeded");
        self.establish(principal)
    }
}

// ── Sign-up ──────────────────────────────────────────────────────────

/// Values from the sign-up form.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl SignUp {
    pub fn validate(&self) -> Result<(), CoreError> {
        let password = self.password.expose_secret();
        let mut checks = Checks::new();
        checks.required(&[
            ("firstname", self.first_name.as_str()),
            ("lastname", self.last_name.as_str()),
            ("email", self.email.as_str()),
            ("password", password),
        ]);
        if !self.email.trim().is_empty() && !is_valid_email(&self.email) {
            checks.fail("email", "Please enter a valid email address.");
        }
        if password != self.confirm_password.expose_secret() {
            checks.fail("confirmPassword", "Passwords do not match");
        } else if !password.is_empty() && !is_strong_password(password) {
            checks.fail("password", PASSWORD_RULES);
        }
        checks.finish()
    }
}

/// Create an account. Returns the backend's confirmation text.
pub async fn register(client: &TicketClient, form: &SignUp) -> Result<String, CoreError> {
    form.validate()?;
    let request = RegisterRequest {
        firstname: form.first_name.trim().to_owned(),
        lastname: form.last_name.trim().to_owned(),
        email: form.email.trim().to_owned(),
        password: form.password.expose_secret().to_owned(),
    };
    let reply = client
        .register(&request)
        .await
        .map_err(|e| CoreError::write(&e, || "Registration failed.".into()))?;
    info!(email = %request.email, "account registered");
    Ok(reply_or(reply, "Registration successful."))
}

/// Set a new password for `email`.
pub async fn reset_password(
    client: &TicketClient,
    email: &str,
    new_password: &SecretString,
) -> Result<String, CoreError> {
    let mut checks = Checks::new();
    checks.required(&[("email", email), ("newPassword", new_password.expose_secret())]);
    if !email.trim().is_empty() && !is_valid_email(email) {
        checks.fail("email", "Please enter a valid email address.");
    }
    if !new_password.expose_secret().is_empty() && !is_strong_password(new_password.expose_secret()) {
        checks.fail("newPassword", PASSWORD_RULES);
    }
    checks.finish()?;

    client
        .forgot_password(email.trim(), new_password)
        .await
        .map_err(|e| CoreError::write(&e, || "Email not found.".into()))?;
    info!(email = email.trim(), "password reset");
    Ok(PASSWORD_UPDATED.to_owned())
}

// ── Profile ──────────────────────────────────────────────────────────

/// Editable profile fields. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileOutcome {
    Updated,
    /// Nothing differed from the stored profile; no request was made.
    Unchanged,
}

impl ProfileOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Updated => "Updated successfully!",
            Self::Unchanged => NO_CHANGES,
        }
    }
}

impl Session {
    /// Update the signed-in admin's profile and refresh the stored
    /// principal.
    pub async fn update_profile(
        &self,
        client: &TicketClient,
        changes: &ProfileChanges,
    ) -> Result<ProfileOutcome, CoreError> {
        let current = self.require(Role::Admin, "Editing the profile")?;
        let Some(id) = current.id else {
            return Err(CoreError::Validation {
                fields: vec!["id"],
                message: "User data is missing. Please login again.".into(),
            });
        };

        let stored = |key: &str| {
            current
                .raw
                .get(key)
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        };
        let changed = |new: &Option<String>, key: &str| {
            new.as_deref()
                .map(str::trim)
                .filter(|v| Some(*v) != stored(key).as_deref())
                .map(str::to_owned)
        };

        let first = changed(&changes.first_name, "firstname");
        let last = changed(&changes.last_name, "lastname");
        let email = changed(&changes.email, "email");
        let password = changes
            .password
            .as_ref()
            .map(|p| p.expose_secret().to_owned())
            .filter(|p| !p.is_empty());

        if first.is_none() && last.is_none() && email.is_none() && password.is_none() {
            return Ok(ProfileOutcome::Unchanged);
        }

        let mut checks = Checks::new();
        if let Some(email) = &email {
            if email.is_empty() {
                checks.fail("email", ALL_FIELDS_REQUIRED);
            } else if !is_valid_email(email) {
                checks.fail("email", "Please enter a valid email address.");
            }
        }
        if let Some(password) = &password {
            if !is_strong_password(password) {
                checks.fail("password", PASSWORD_RULES);
            }
        }
        checks.finish()?;

        let update = UserUpdate {
            id,
            firstname: first.or_else(|| stored("firstname")),
            lastname: last.or_else(|| stored("lastname")),
            email: email.unwrap_or_else(|| current.email.clone()),
            password,
        };
        let reply = client
            .update_user(id, &update)
            .await
            .map_err(|e| CoreError::write(&e, || "Error updating user details.".into()))?;

        let mut principal = (*current).clone();
        principal.raw = match serde_json::from_str::<serde_json::Value>(&reply) {
            Ok(record @ serde_json::Value::Object(_)) => record,
            _ => {
                let mut raw = serde_json::to_value(&update).unwrap_or_default();
                if let Some(map) = raw.as_object_mut() {
                    map.remove("password");
                }
                raw
            }
        };
        let refreshed = Principal::admin(&update.email, principal.raw.clone());
        principal.email = refreshed.email;
        principal.display_name = refreshed.display_name;
        self.establish(principal)?;
        Ok(ProfileOutcome::Updated)
    }
}

fn reply_or(reply: String, fallback: &str) -> String {
    let trimmed = reply.trim();
    if trimmed.is_empty() || trimmed.starts_with('{') {
        fallback.to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sign_up(password: &str, confirm: &str) -> SignUp {
        SignUp {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: password.to_owned().into(),
            confirm_password: confirm.to_owned().into(),
        }
    }

    fn message(err: CoreError) -> String {
        match err {
            CoreError::Validation { message, .. } => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn sign_up_rules() {
        assert!(sign_up("Passw0rd!", "Passw0rd!").validate().is_ok());
        assert_eq!(
            message(sign_up("Passw0rd!", "Passw0rd?").validate().unwrap_err()),
            "Passwords do not match"
        );
        assert_eq!(
            message(sign_up("weak", "weak").validate().unwrap_err()),
            PASSWORD_RULES
        );
    }

    #[test]
    fn reply_text_fallbacks() {
        assert_eq!(reply_or("User registered".into(), "x"), "User registered");
        assert_eq!(reply_or("  ".into(), "Registration successful."), "Registration successful.");
        assert_eq!(reply_or("{\"id\":1}".into(), "ok"), "ok");
    }

    #[test]
    fn profile_outcome_messages() {
        assert_eq!(ProfileOutcome::Unchanged.message(), NO_CHANGES);
        assert_eq!(ProfileOutcome::Updated.message(), "Updated successfully!");
    }
}
