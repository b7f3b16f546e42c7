use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::{anyhow, Context};
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "client.toml";

/// Everything a controller needs to know about its environment. Built once
/// and handed to each controller at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    /// Fixed identity sent with recommendation requests; there is no real
    /// user or session.
    pub user_id: String,
    pub request_timeout: Duration,
    pub clock_tick: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".into(),
            user_id: "react_user".into(),
            request_timeout: Duration::from_secs(30),
            clock_tick: Duration::from_secs(1),
        }
    }
}

impl Settings {
    pub fn with_base_url(api_base_url: impl Into<String>) -> anyhow::Result<Self> {
        let mut settings = Self::default();
        settings.set_api_base_url(&api_base_url.into())?;
        Ok(settings)
    }

    pub fn set_api_base_url(&mut self, raw: &str) -> anyhow::Result<()> {
        self.api_base_url = normalize_base_url(raw)?;
        Ok(())
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE))
}

/// Defaults, then the optional settings file, then environment overrides.
pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        apply_overrides(&mut settings, |key| {
            file_cfg.get(key).map(|value| match value {
                toml::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        })?;
    }

    let base_url_env = std::env::var("APP__API_BASE_URL")
        .or_else(|_| std::env::var("API_BASE_URL"))
        .ok();
    apply_overrides(&mut settings, |key| match key {
        "api_base_url" => base_url_env.clone(),
        "user_id" => std::env::var("APP__USER_ID").ok(),
        "request_timeout_secs" => std::env::var("APP__REQUEST_TIMEOUT_SECS").ok(),
        "clock_tick_ms" => std::env::var("APP__CLOCK_TICK_MS").ok(),
        _ => None,
    })?;

    Ok(settings)
}

fn apply_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("api_base_url") {
        settings.set_api_base_url(&v)?;
    }
    if let Some(v) = lookup("user_id") {
        let v = v.trim();
        if !v.is_empty() {
            settings.user_id = v.to_string();
        }
    }
    if let Some(v) = lookup("request_timeout_secs") {
        let secs = v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("invalid request_timeout_secs '{v}'"))?;
        settings.request_timeout = Duration::from_secs(secs.max(1));
    }
    if let Some(v) = lookup("clock_tick_ms") {
        let millis = v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("invalid clock_tick_ms '{v}'"))?;
        settings.clock_tick = Duration::from_millis(millis.max(1));
    }
    Ok(())
}

fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    let parsed = Url::parse(raw).with_context(|| format!("invalid API base url '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(anyhow!(
            "API base url must use http or https, got '{}'",
            parsed.scheme()
        ));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
