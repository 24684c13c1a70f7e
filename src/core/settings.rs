use crate::shared::paths::{ensure_dir, get_database_path, get_storage_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/data";
pub const DEFAULT_ASSIST_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ASSIST_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    #[serde(default = "default_assist_endpoint")]
    pub assist_endpoint: String,
    #[serde(default = "default_assist_model")]
    pub assist_model: String,
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout_ms() -> u64 {
    2000
}

fn default_body_limit_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_assist_endpoint() -> String {
    DEFAULT_ASSIST_ENDPOINT.to_string()
}

fn default_assist_model() -> String {
    DEFAULT_ASSIST_MODEL.to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            api_url: default_api_url(),
            request_timeout_ms: default_request_timeout_ms(),
            body_limit_bytes: default_body_limit_bytes(),
            database_path: None,
            assist_endpoint: default_assist_endpoint(),
            assist_model: default_assist_model(),
        }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl AppSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(get_database_path)
    }

    /// Applies environment overrides on top of file values.
    ///
    /// `lookup` is usually `std::env::var(..).ok()`; tests pass a map.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup("KOGE_BIND") {
            self.bind_address = bind;
        } else if let Some(port) = lookup("PORT").and_then(|p| p.parse::<u16>().ok()) {
            let host = self
                .bind_address
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| "0.0.0.0".to_string());
            self.bind_address = format!("{}:{}", host, port);
        }

        if let Some(url) = lookup("KOGE_API_URL") {
            self.api_url = url;
        }

        if let Some(path) = lookup("KOGE_DB_PATH") {
            self.database_path = Some(PathBuf::from(path));
        }

        match lookup("KOGE_REQUEST_TIMEOUT_MS").map(|v| v.parse::<u64>()) {
            Some(Ok(ms)) => self.request_timeout_ms = ms,
            Some(Err(e)) => {
                tracing::warn!(target: "system", "Ignoring KOGE_REQUEST_TIMEOUT_MS: {}", e)
            }
            None => {}
        }
    }
}

/// API key for the assist client. Never persisted.
pub fn assist_api_key() -> Option<String> {
    assist_api_key_from(|key| std::env::var(key).ok())
}

/// `GEMINI_API_KEY`, else `API_KEY`. Blank values count as unset.
pub fn assist_api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    ["GEMINI_API_KEY", "API_KEY"]
        .into_iter()
        .filter_map(lookup)
        .find(|key| !key.trim().is_empty())
}

fn get_settings_path() -> PathBuf {
    get_storage_dir().join("settings.json")
}

/// Loads settings from the storage dir and applies process environment overrides.
pub fn load_settings() -> AppSettings {
    let mut settings = load_settings_from(&get_settings_path());
    settings.apply_overrides(|key| std::env::var(key).ok());
    settings
}

/// Loads settings from `path`, falling back to defaults when missing or invalid.
pub fn load_settings_from(path: &Path) -> AppSettings {
    if !path.exists() {
        return AppSettings::default();
    }

    match load_settings_from_file(path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(target: "system", "Invalid settings at {:?}, using defaults: {}", path, e);
            AppSettings::default()
        }
    }
}

fn load_settings_from_file(path: &Path) -> Result<AppSettings, SettingsError> {
    let contents = std::fs::read_to_string(path)?;
    let settings = serde_json::from_str(&contents)?;
    Ok(settings)
}

pub fn save_settings_to(settings: &AppSettings, path: &Path) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let contents = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, contents)?;
    Ok(())
}
