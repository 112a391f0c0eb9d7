// Client-side field checks shared by entity forms and account flows.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required.";

pub const PASSWORD_RULES: &str = "Password must be at least 8 characters long, contain uppercase and \
     lowercase letters, a number, and a special character.";

const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

#[allow(clippy::unwrap_used)]
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

/// At least 8 characters with upper, lower, digit and one of
/// `!@#$%^&*(),.?":{}|<>`.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

/// Collects failing fields; the first failure's message wins.
#[derive(Debug, Default)]
pub(crate) struct Checks {
    fields: Vec<&'static str>,
    message: Option<String>,
}

impl Checks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail(&mut self, field: &'static str, message: &str) {
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
        self.message.get_or_insert_with(|| message.to_owned());
    }

    /// Flag every blank field in `fields` as required.
    pub(crate) fn required(&mut self, fields: &[(&'static str, &str)]) {
        for (name, value) in fields {
            if value.trim().is_empty() {
                self.fail(name, ALL_FIELDS_REQUIRED);
            }
        }
    }

    pub(crate) fn finish(self) -> Result<(), CoreError> {
        match self.message {
            None => Ok(()),
            Some(message) => Err(CoreError::Validation {
                fields: self.fields,
                message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email(" ada@mail.example.org "));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn password_rules() {
        assert!(is_strong_password("Passw0rd!"));
        assert!(!is_strong_password("Pa0!"));
        assert!(!is_strong_password("password0!"));
        assert!(!is_strong_password("PASSWORD0!"));
        assert!(!is_strong_password("Password!!"));
        assert!(!is_strong_password("Password00"));
        assert!(!is_strong_password("Passw0rd_"));
    }

    #[test]
    fn checks_keep_first_message_and_all_fields() {
        let mut checks = Checks::new();
        checks.required(&[("name", ""), ("description", "x"), ("city", " ")]);
        checks.fail("capacity", "Capacity cannot be negative.");
        let Err(CoreError::Validation { fields, message }) = checks.finish() else {
            panic!("expected validation error");
        };
        assert_eq!(fields, vec!["name", "city", "capacity"]);
        assert_eq!(message, ALL_FIELDS_REQUIRED);
    }
}
