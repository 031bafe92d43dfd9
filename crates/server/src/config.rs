use std::{collections::HashMap, fs, net::SocketAddr};

use anyhow::Context;
use serde::Deserialize;

/// The service always listens on this port; only the interface is configurable.
pub const SERVER_PORT: u16 = 3000;

const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub bind_host: String,
    pub log_filter: String,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".into(),
            log_filter: "info".into(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Settings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let host = self.bind_host.trim();
        let raw = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{SERVER_PORT}")
        } else {
            format!("{host}:{SERVER_PORT}")
        };
        raw.parse()
            .with_context(|| format!("invalid bind host '{}'", self.bind_host))
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        return;
    };
    if let Some(v) = file_cfg.get("bind_host").and_then(toml::Value::as_str) {
        settings.bind_host = v.to_string();
    }
    if let Some(v) = file_cfg.get("log_filter").and_then(toml::Value::as_str) {
        settings.log_filter = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("max_body_bytes")
        .and_then(toml::Value::as_integer)
        .and_then(|v| usize::try_from(v).ok())
    {
        settings.max_body_bytes = v;
    }
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("APP__BIND_HOST") {
        settings.bind_host = v;
    }
    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
    if let Some(parsed) = var("APP__MAX_BODY_BYTES").and_then(|v| v.parse::<usize>().ok()) {
        settings.max_body_bytes = parsed;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
