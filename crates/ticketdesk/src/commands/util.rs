//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDateTime;
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;

use ticketdesk_core::Attachment;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, global: &GlobalOpts) -> Result<bool, CliError> {
    if global.yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Prompt {
        reason: e.to_string(),
    }
}

pub fn prompt_text(label: &str) -> Result<String, CliError> {
    dialoguer::Input::<String>::new()
        .with_prompt(label)
        .interact_text()
        .map_err(prompt_err)
}

pub fn prompt_password(label: &str) -> Result<SecretString, CliError> {
    let pass = rpassword::prompt_password(format!("{label}: ")).map_err(prompt_err)?;
    Ok(SecretString::from(pass))
}

/// Ask twice and hand both answers back; matching them is the core's job.
pub fn prompt_new_password() -> Result<(SecretString, SecretString), CliError> {
    Ok((
        prompt_password("New password")?,
        prompt_password("Confirm password")?,
    ))
}

/// Spinner on stderr while a request is in flight. Hidden unless a human
/// is watching a table.
pub fn spinner(message: &str, global: &GlobalOpts) -> ProgressBar {
    let interactive = matches!(global.output, OutputFormat::Table)
        && !global.quiet
        && std::io::stderr().is_terminal();
    if !interactive {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Read an image for upload, guessing the content type from the extension.
pub fn read_attachment(path: &Path) -> Result<Attachment, CliError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".into(), |n| n.to_string_lossy().into_owned());
    let content_type = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .and_then(|ext| match ext.as_str() {
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            _ => None,
        })
        .map(str::to_owned);
    Ok(Attachment {
        file_name,
        content_type,
        bytes,
    })
}

pub fn fmt_time(at: Option<NaiveDateTime>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

pub fn or_dash(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("-")
        .to_owned()
}

/// Overwrite `slot` when a flag was given.
pub fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn attachment_content_type_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Poster.JPG");
        std::fs::write(&path, [0xff, 0xd8]).unwrap();

        let file = read_attachment(&path).unwrap();
        assert_eq!(file.file_name, "Poster.JPG");
        assert_eq!(file.content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(file.bytes, vec![0xff, 0xd8]);
    }

    #[test]
    fn set_only_when_given() {
        let mut name = String::from("Music");
        set(&mut name, None);
        assert_eq!(name, "Music");
        set(&mut name, Some("Art".into()));
        assert_eq!(name, "Art");
    }

    #[test]
    fn dash_for_blank() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(or_dash(Some("Open")), "Open");
    }
}
