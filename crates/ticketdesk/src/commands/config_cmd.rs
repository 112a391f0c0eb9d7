//! Config subcommand handlers.

use dialoguer::Input;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, DEFAULT_PROFILE, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

fn invalid(field: &str, reason: &str) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

fn known_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

fn describe(cfg: &Config) -> String {
    let profiles: Vec<(String, String)> = cfg
        .profiles
        .iter()
        .map(|(name, p)| (format!("[{name}]"), p.backend.clone()))
        .collect();
    let mut fields = vec![
        (
            "Default profile",
            cfg.default_profile
                .clone()
                .unwrap_or_else(|| DEFAULT_PROFILE.into()),
        ),
        ("Output", cfg.defaults.output.clone()),
        ("Color", cfg.defaults.color.clone()),
        ("Timeout", format!("{}s", cfg.defaults.timeout)),
        ("Page size", cfg.defaults.page_size.to_string()),
    ];
    fields.extend(profiles.iter().map(|(k, v)| (k.as_str(), v.clone())));
    output::detail_lines(&fields)
}

/// Apply `key = value` to a profile.
fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "backend" | "url" => {
            let url: url::Url = value
                .parse()
                .map_err(|_| invalid("backend", "must be a URL such as http://localhost:8080"))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(invalid("backend", "scheme must be http or https"));
            }
            profile.backend = value;
        }
        "timeout" => {
            profile.timeout = Some(
                value
                    .parse()
                    .map_err(|_| invalid("timeout", "must be a number (seconds)"))?,
            );
        }
        "page_size" | "page-size" => {
            let size: usize = value
                .parse()
                .map_err(|_| invalid("page_size", "must be a positive number"))?;
            if size == 0 {
                return Err(invalid("page_size", "must be a positive number"));
            }
            profile.page_size = Some(size);
        }
        "insecure" => {
            profile.insecure = Some(
                value
                    .parse()
                    .map_err(|_| invalid("insecure", "must be 'true' or 'false'"))?,
            );
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        other => {
            return Err(invalid(
                other,
                &format!(
                    "unknown config key '{other}'. Valid keys: backend, timeout, page_size, \
                     insecure, ca_cert"
                ),
            ));
        }
    }
    Ok(())
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let path = config::config_path();
            eprintln!("ticketdesk configuration");
            eprintln!("   Config path: {}\n", path.display());

            let name: String = Input::new()
                .with_prompt("Profile name")
                .default(DEFAULT_PROFILE.into())
                .interact_text()
                .map_err(prompt_err)?;
            let backend: String = Input::new()
                .with_prompt("Backend URL")
                .default(ticketdesk_config::DEFAULT_BACKEND.into())
                .interact_text()
                .map_err(prompt_err)?;
            let page_size: String = Input::new()
                .with_prompt("Rows per page")
                .default(ticketdesk_core::DEFAULT_PAGE_SIZE.to_string())
                .interact_text()
                .map_err(prompt_err)?;

            let mut profile = Profile::default();
            set_key(&mut profile, "backend", backend)?;
            set_key(&mut profile, "page_size", page_size)?;

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(name.clone(), profile);
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("  Active profile: {name}");
            eprintln!("\n  Next: ticketdesk login");
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(&global.output, &cfg, describe, |_| {
                config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config()?;
            let name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(name.clone()).or_default();
            set_key(profile, &key, value)?;
            config::save_config(&cfg)?;
            output::status(&format!("✓ Set {key} on profile '{name}'"), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            if cfg.profiles.is_empty() {
                output::status("No profiles configured. Run: ticketdesk config init", global.quiet);
                return Ok(());
            }
            let default = cfg.default_profile.as_deref().unwrap_or(DEFAULT_PROFILE);
            for (name, profile) in &cfg.profiles {
                let marker = if name == default { " *" } else { "" };
                println!("{name}{marker}\t{}", profile.backend);
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: known_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::status(&format!("✓ Default profile set to '{name}'"), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("config  {}", config::config_path().display());
            println!("session {}", config::session_path().display());
            Ok(())
        }
    }
}
