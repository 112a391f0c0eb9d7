// File-backed session storage: the signed-in user and role survive
// between CLI invocations the way a browser keeps them in local storage.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use ticketdesk_core::{CoreError, Principal, Role, SessionStorage};

use crate::ConfigError;

/// On-disk layout. The role is stored next to the user record, and wins
/// if the two disagree.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    user: Principal,
    role: Role,
}

#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at the platform data directory.
    pub fn at_default_location() -> Self {
        Self::new(crate::session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<Principal>, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(None);
        }
        let stored: StoredSession = serde_json::from_str(&text)?;
        let mut user = stored.user;
        user.role = stored.role;
        Ok(Some(user))
    }

    fn write(&self, principal: &Principal) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stored = StoredSession {
            user: principal.clone(),
            role: principal.role,
        };
        std::fs::write(&self.path, serde_json::to_vec_pretty(&stored)?)?;
        restrict_permissions(&self.path)?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn remove(&self) -> Result<(), ConfigError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

fn to_core(err: ConfigError) -> CoreError {
    CoreError::Config {
        message: err.to_string(),
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<Principal>, CoreError> {
        self.read().map_err(to_core)
    }

    fn save(&self, principal: &Principal) -> Result<(), CoreError> {
        self.write(principal).map_err(to_core)
    }

    fn clear(&self) -> Result<(), CoreError> {
        self.remove().map_err(to_core)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ticketdesk_core::Session;

    fn student() -> Principal {
        Principal {
            id: Some(4),
            email: "ada@example.com".into(),
            role: Role::Student,
            display_name: "Ada Lovelace".into(),
            raw: serde_json::json!({ "id": 4, "firstName": "Ada" }),
        }
    }

    #[test]
    fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("data").join("session.json"));
        assert_eq!(storage.load().unwrap(), None);

        storage.save(&student()).unwrap();
        assert_eq!(storage.load().unwrap(), Some(student()));

        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
        // Clearing twice is fine.
        storage.clear().unwrap();
    }

    #[test]
    fn legacy_customer_role_reads_as_student() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"user":{"id":4,"email":"ada@example.com","role":"customer","displayName":"Ada"},"role":"customer"}"#,
        )
        .unwrap();

        let principal = FileSessionStorage::new(&path).load().unwrap().unwrap();
        assert_eq!(principal.role, Role::Student);
    }

    #[test]
    fn corrupt_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = FileSessionStorage::new(&path).load().unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }

    #[test]
    fn session_restores_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        FileSessionStorage::new(&path).save(&student()).unwrap();

        let session = Session::new(FileSessionStorage::new(&path));
        assert_eq!(session.current_role(), Some(Role::Student));

        session.logout().unwrap();
        assert!(!path.exists());
    }
}
