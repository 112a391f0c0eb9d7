//! CLI configuration: a thin layer over `ticketdesk_config` that applies
//! `GlobalOpts` overrides (--backend, --timeout, --profile).

use std::time::Duration;

use ticketdesk_core::{ClientConfig, Session};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use ticketdesk_config::{
    Config, DEFAULT_PROFILE, FileSessionStorage, Profile, config_path, load_config,
    load_config_or_default, profile_to_client_config, save_config, session_path,
};

/// Resolve the active profile name from flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| DEFAULT_PROFILE.into())
}

/// Build the connection config: profile values, then flag overrides.
pub fn client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config()?;
    let (name, mut profile) = match cfg.resolve_profile(global.profile.as_deref()) {
        Ok(found) => found,
        // A backend flag alone is enough to run without a profile.
        Err(_) if global.backend.is_some() => (active_profile_name(global, &cfg), Profile::default()),
        Err(e) => return Err(e.into()),
    };
    if let Some(ref backend) = global.backend {
        profile.backend.clone_from(backend);
    }
    tracing::debug!(profile = %name, backend = %profile.backend, "resolved profile");

    let mut client = profile_to_client_config(&profile, &cfg.defaults)?;
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }
    Ok(client)
}

/// The persisted session shared by every command.
pub fn open_session() -> Session {
    Session::new(FileSessionStorage::at_default_location())
}
