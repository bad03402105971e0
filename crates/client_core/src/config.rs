use std::{collections::HashMap, fs, time::Duration};

use shared::protocol::{HEALTH_PATH, SUBMIT_COMPLAINT_PATH};
use url::Url;

use crate::{
    error::ConfigError,
    escalation::{DEFAULT_MESSAGING_GREETING, DEFAULT_MESSAGING_NUMBER},
};

pub const SETTINGS_FILE: &str = "intake.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub messaging_number: String,
    pub messaging_greeting: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".into(),
            request_timeout_secs: 30,
            messaging_number: DEFAULT_MESSAGING_NUMBER.into(),
            messaging_greeting: DEFAULT_MESSAGING_GREETING.into(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn submit_url(&self) -> Result<Url, ConfigError> {
        endpoint_url(&self.api_base_url, SUBMIT_COMPLAINT_PATH)
    }

    pub fn health_url(&self) -> Result<Url, ConfigError> {
        endpoint_url(&self.api_base_url, HEALTH_PATH)
    }
}

/// Defaults, then `intake.toml` in the working directory, then the environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());

    settings
}

pub fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        tracing::warn!(file = SETTINGS_FILE, "ignoring unparseable settings file");
        return;
    };

    if let Some(v) = file_cfg.get("api_base_url").and_then(toml::Value::as_str) {
        settings.api_base_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("request_timeout_secs") {
        let parsed = match v {
            toml::Value::Integer(secs) => u64::try_from(*secs).ok(),
            toml::Value::String(secs) => secs.parse::<u64>().ok(),
            _ => None,
        };
        if let Some(secs) = parsed {
            settings.request_timeout_secs = secs;
        }
    }
    if let Some(v) = file_cfg.get("messaging_number").and_then(toml::Value::as_str) {
        settings.messaging_number = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("messaging_greeting")
        .and_then(toml::Value::as_str)
    {
        settings.messaging_greeting = v.to_string();
    }
}

pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    if let Some(v) = lookup("APP__MESSAGING_NUMBER") {
        settings.messaging_number = v;
    }
    if let Some(v) = lookup("APP__MESSAGING_GREETING") {
        settings.messaging_greeting = v;
    }
}

fn endpoint_url(base_url: &str, path: &str) -> Result<Url, ConfigError> {
    let base = base_url.trim().trim_end_matches('/');
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let url = Url::parse(&format!("{base}{path}")).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
