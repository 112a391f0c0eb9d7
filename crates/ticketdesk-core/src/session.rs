// ── Session/role store ──
//
// Holds the signed-in principal and its role. The current principal lives
// in an `ArcSwapOption` so every screen can read it without locking;
// persistence goes through a pluggable `SessionStorage`.

use std::sync::{Arc, Mutex};

use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};
use ticketdesk_api::ListScope;
use ticketdesk_api::models::{Customer, RecordId};
use tracing::{info, warn};

use crate::error::CoreError;
use crate::nav::{self, Screen};

// ── Role ─────────────────────────────────────────────────────────────

/// Role tag of the signed-in principal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Role {
    #[strum(to_string = "admin")]
    Admin,
    /// Customers sign in as students. `customer` is accepted when reading.
    #[serde(alias = "customer")]
    #[strum(to_string = "student", serialize = "customer")]
    Student,
}

// ── Principal ────────────────────────────────────────────────────────

/// The authenticated identity for this session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub email: String,
    pub role: Role,
    pub display_name: String,
    /// Whatever the login endpoint returned, kept for profile screens.
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl Principal {
    /// Build an admin principal from the `/users/login` reply.
    ///
    /// Older backends answer with a bare confirmation string; in that case
    /// the principal is made from the submitted email.
    pub fn admin(email: &str, reply: serde_json::Value) -> Self {
        let record = reply.as_object();
        let field = |name: &str| {
            record
                .and_then(|r| r.get(name))
                .and_then(serde_json::Value::as_str)
                .filter(|s| !s.trim().is_empty())
        };
        let id = record
            .and_then(|r| r.get("id"))
            .and_then(serde_json::Value::as_i64);
        let display_name = match (field("firstname"), field("lastname")) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.to_owned(),
            _ => email.to_owned(),
        };
        let email = field("email").unwrap_or(email).to_owned();
        let raw = if record.is_some() {
            reply
        } else {
            serde_json::json!({ "email": &email })
        };
        Self {
            id,
            email,
            role: Role::Admin,
            display_name,
            raw,
        }
    }

    /// Build a student principal from the `/customers/login` record.
    pub fn student(customer: &Customer, submitted_email: &str) -> Self {
        let name = customer.full_name();
        let email = customer
            .email
            .clone()
            .unwrap_or_else(|| submitted_email.to_owned());
        Self {
            id: Some(customer.id),
            display_name: if name.is_empty() { email.clone() } else { name },
            email,
            role: Role::Student,
            raw: serde_json::to_value(customer).unwrap_or_default(),
        }
    }
}

// ── Storage ──────────────────────────────────────────────────────────

/// Where the session survives between runs.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<Principal>, CoreError>;
    fn save(&self, principal: &Principal) -> Result<(), CoreError>;
    fn clear(&self) -> Result<(), CoreError>;
}

/// Process-local storage. Nothing outlives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<Principal>>,
}

impl MemoryStorage {
    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<Principal>>, CoreError> {
        self.slot
            .lock()
            .map_err(|_| CoreError::Internal("session storage lock poisoned".into()))
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Principal>, CoreError> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, principal: &Principal) -> Result<(), CoreError> {
        *self.slot()? = Some(principal.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.slot()? = None;
        Ok(())
    }
}

// ── Session ──────────────────────────────────────────────────────────

/// Shared session handle. Cheap to clone.
///
/// List controllers only read from it; the login and profile flows are
/// the only writers.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    current: ArcSwapOption<Principal>,
    storage: Box<dyn SessionStorage>,
}

impl Session {
    /// Open a session over `storage`, restoring any persisted principal.
    ///
    /// Unreadable state is logged and treated as signed out.
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        let restored = match storage.load() {
            Ok(principal) => principal.map(Arc::new),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable session state");
                None
            }
        };
        Self {
            inner: Arc::new(SessionInner {
                current: ArcSwapOption::new(restored),
                storage: Box::new(storage),
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::default())
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn principal(&self) -> Option<Arc<Principal>> {
        self.inner.current.load_full()
    }

    pub fn current_role(&self) -> Option<Role> {
        self.inner.current.load().as_ref().map(|p| p.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.current.load().is_some()
    }

    /// Whether the current role may open `screen`. UX gating only; the
    /// backend enforces access.
    pub fn can_access(&self, screen: Screen) -> bool {
        nav::can_access(self.current_role(), screen)
    }

    /// Which registrations this session should see.
    pub fn registration_scope(&self) -> ListScope {
        match self.principal() {
            Some(p) if p.role == Role::Student => p.id.map_or(ListScope::All, ListScope::Customer),
            _ => ListScope::All,
        }
    }

    /// The principal, provided it has `role`.
    pub fn require(&self, role: Role, action: &str) -> Result<Arc<Principal>, CoreError> {
        let principal = self.principal().ok_or(CoreError::NotAuthenticated)?;
        if principal.role == role {
            Ok(principal)
        } else {
            Err(CoreError::Forbidden {
                action: action.to_owned(),
                required: role.to_string(),
            })
        }
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Make `principal` the active identity and persist it.
    pub(crate) fn establish(&self, principal: Principal) -> Result<Arc<Principal>, CoreError> {
        self.inner.storage.save(&principal)?;
        let principal = Arc::new(principal);
        self.inner.current.store(Some(Arc::clone(&principal)));
        info!(email = %principal.email, role = %principal.role, "session established");
        Ok(principal)
    }

    /// Forget the principal. Local only; calling it twice is harmless.
    pub fn logout(&self) -> Result<(), CoreError> {
        let previous = self.inner.current.swap(None);
        self.inner.storage.clear()?;
        if let Some(p) = previous {
            info!(email = %p.email, "signed out");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("principal", &self.principal())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn student(id: RecordId) -> Principal {
        Principal {
            id: Some(id),
            email: "ada@example.com".into(),
            role: Role::Student,
            display_name: "Ada".into(),
            raw: json!({}),
        }
    }

    #[test]
    fn role_parses_customer_alias() {
        assert_eq!("customer".parse::<Role>().unwrap(), Role::Student);
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::Student.to_string(), "student");
        let role: Role = serde_json::from_value(json!("customer")).unwrap();
        assert_eq!(role, Role::Student);
        assert_eq!(serde_json::to_value(Role::Student).unwrap(), json!("student"));
    }

    #[test]
    fn admin_principal_from_plain_text_reply() {
        let p = Principal::admin("root@example.com", json!("Login successful!"));
        assert_eq!(p.role, Role::Admin);
        assert_eq!(p.email, "root@example.com");
        assert_eq!(p.display_name, "root@example.com");
        assert_eq!(p.id, None);
    }

    #[test]
    fn admin_principal_from_record_reply() {
        let p = Principal::admin(
            "root@example.com",
            json!({ "id": 3, "firstname": "Grace", "lastname": "Hopper", "email": "grace@example.com" }),
        );
        assert_eq!(p.id, Some(3));
        assert_eq!(p.display_name, "Grace Hopper");
        assert_eq!(p.email, "grace@example.com");
        assert_eq!(p.raw["firstname"], "Grace");
    }

    #[test]
    fn logout_is_idempotent() {
        let session = Session::in_memory();
        session.establish(student(4)).unwrap();
        assert_eq!(session.current_role(), Some(Role::Student));

        session.logout().unwrap();
        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.current_role(), None);
    }

    #[test]
    fn restores_from_storage() {
        let storage = MemoryStorage::default();
        storage.save(&student(9)).unwrap();
        let session = Session::new(storage);
        assert_eq!(session.principal().unwrap().id, Some(9));
    }

    #[test]
    fn registration_scope_follows_role() {
        let session = Session::in_memory();
        assert_eq!(session.registration_scope(), ListScope::All);

        session.establish(student(12)).unwrap();
        assert_eq!(session.registration_scope(), ListScope::Customer(12));

        session
            .establish(Principal::admin("root@example.com", json!("ok")))
            .unwrap();
        assert_eq!(session.registration_scope(), ListScope::All);
    }

    #[test]
    fn require_checks_role() {
        let session = Session::in_memory();
        assert!(matches!(
            session.require(Role::Student, "Registering"),
            Err(CoreError::NotAuthenticated)
        ));
        session
            .establish(Principal::admin("root@example.com", json!("ok")))
            .unwrap();
        let err = session.require(Role::Student, "Registering").unwrap_err();
        assert_eq!(err.to_string(), "Registering is only available to student accounts");
    }
}
