use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    /// Page origin allowed by CORS; `*` allows any origin.
    pub allowed_origin: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            database_url: "sqlite://./data/notes.db".into(),
            allowed_origin: "http://127.0.0.1:5500".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    database_url: Option<String>,
    allowed_origin: Option<String>,
}

pub fn load_settings() -> Settings {
    let file_contents = match fs::read_to_string(SETTINGS_FILE) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            warn!(file = SETTINGS_FILE, %err, "failed to read settings file; using defaults");
            None
        }
    };
    load_settings_from(file_contents.as_deref(), |name| std::env::var(name).ok())
}

/// Defaults, then the settings file, then environment variables (`APP__*` wins).
pub fn load_settings_from(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    settings.server_bind = v;
                }
                if let Some(v) = file_cfg.database_url {
                    settings.database_url = v;
                }
                if let Some(v) = file_cfg.allowed_origin {
                    settings.allowed_origin = v;
                }
            }
            Err(err) => warn!(file = SETTINGS_FILE, %err, "ignoring malformed settings file"),
        }
    }

    let overrides: [(&[&str], &mut String); 3] = [
        (&["SERVER_BIND", "APP__BIND_ADDR"], &mut settings.server_bind),
        (&["DATABASE_URL", "APP__DATABASE_URL"], &mut settings.database_url),
        (
            &["ALLOWED_ORIGIN", "APP__ALLOWED_ORIGIN"],
            &mut settings.allowed_origin,
        ),
    ];
    for (names, slot) in overrides {
        for &name in names {
            if let Some(v) = env(name).filter(|v| !v.trim().is_empty()) {
                *slot = v;
            }
        }
    }

    settings
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    if let Some(parent) = sqlite_file_path(&database_url).and_then(Path::parent) {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!(
                    "failed to create parent directory '{}' for database url '{database_url}'",
                    parent.display()
                )
            })?;
        }
    }
    Ok(database_url)
}

pub(crate) fn normalize_database_url(raw_database_url: &str) -> String {
    let raw = raw_database_url.trim();

    if raw.is_empty() {
        return Settings::default().database_url;
    }
    if raw.starts_with("sqlite:") || raw.contains("://") {
        return raw.to_string();
    }
    format!("sqlite://{}", raw.replace('\\', "/"))
}

fn sqlite_file_path(database_url: &str) -> Option<&Path> {
    if database_url.starts_with("sqlite::memory:") {
        return None;
    }
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?
        .split('?')
        .next()
        .filter(|p| !p.is_empty())?;
    Some(Path::new(path))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
