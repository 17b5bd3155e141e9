use std::{collections::HashMap, fs};

use serde::Deserialize;

/// Client settings layered from defaults, an optional `docqa.toml` in the
/// working directory, and environment overrides. CLI flags are applied on
/// top by the binaries.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("docqa.toml") {
        apply_file_overrides(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("DOCQA_SERVER_URL") {
        if !v.trim().is_empty() {
            settings.server_url = v;
        }
    }

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("server_url") {
            settings.server_url = v.clone();
        }
    }
}
