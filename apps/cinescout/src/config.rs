use std::{collections::HashMap, fs};

use anyhow::{bail, Context};
use shared::domain::DEFAULT_IMAGE_BASE;
use url::Url;

pub const SETTINGS_FILE: &str = "cinescout.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base: String,
    pub image_base: String,
    pub default_query: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".into(),
            image_base: DEFAULT_IMAGE_BASE.into(),
            default_query: "Inception".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then environment overrides.
pub fn load_settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
            if let Some(v) = file_cfg.get("api_base") {
                settings.api_base = v.clone();
            }
            if let Some(v) = file_cfg.get("image_base") {
                settings.image_base = v.clone();
            }
            if let Some(v) = file_cfg.get("default_query") {
                settings.default_query = v.clone();
            }
        }
    }

    if let Some(v) = env("CINESCOUT_API_BASE") {
        settings.api_base = v;
    }
    if let Some(v) = env("APP__API_BASE") {
        settings.api_base = v;
    }

    if let Some(v) = env("APP__IMAGE_BASE") {
        settings.image_base = v;
    }

    if let Some(v) = env("APP__DEFAULT_QUERY") {
        settings.default_query = v;
    }

    settings
}

pub fn prepare_api_base(raw_api_base: &str) -> anyhow::Result<String> {
    let api_base = normalize_api_base(raw_api_base);
    let parsed = Url::parse(&api_base)
        .with_context(|| format!("invalid catalog api base '{api_base}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        bail!("catalog api base must be an http(s) address, got '{api_base}'");
    }
    Ok(api_base)
}

fn normalize_api_base(raw_api_base: &str) -> String {
    let raw_api_base = raw_api_base.trim();

    if raw_api_base.is_empty() {
        return Settings::default().api_base;
    }

    raw_api_base.trim_end_matches('/').to_string()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
