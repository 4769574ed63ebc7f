//! Layered app settings: compiled-in default, then `blogdesk.toml`,
//! then environment overrides.

use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

/// The deployment the original site was built against; override via
/// `blogdesk.toml` or the env vars below when pointing elsewhere.
const DEFAULT_API_BASE_URL: &str =
    "https://1hmfpsvto6.execute-api.ap-northeast-1.amazonaws.com/dev";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_base_url: Option<String>,
}

pub fn load_settings() -> Settings {
    let file = match read_file_config(Path::new("blogdesk.toml")) {
        Ok(file) => file,
        Err(err) => {
            tracing::warn!("ignoring unusable blogdesk.toml: {err:#}");
            None
        }
    };
    resolve_settings(file, |name| std::env::var(name).ok())
}

fn read_file_config(path: &Path) -> anyhow::Result<Option<FileConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config =
        toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(config))
}

fn resolve_settings(
    file: Option<FileConfig>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(value) = file.unwrap_or_default().api_base_url {
        settings.api_base_url = value;
    }
    if let Some(value) = env("BLOG_API_URL") {
        settings.api_base_url = value;
    }
    if let Some(value) = env("APP__API_BASE_URL") {
        settings.api_base_url = value;
    }

    settings.api_base_url = settings.api_base_url.trim_end_matches('/').to_string();
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_the_compiled_in_deployment() {
        let settings = resolve_settings(None, |_| None);
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn file_value_overrides_the_default() {
        let file = FileConfig {
            api_base_url: Some("https://staging.example/api".to_string()),
        };
        let settings = resolve_settings(Some(file), |_| None);
        assert_eq!(settings.api_base_url, "https://staging.example/api");
    }

    #[test]
    fn env_overrides_file_and_app_alias_wins_last() {
        let file = FileConfig {
            api_base_url: Some("https://from-file.example".to_string()),
        };
        let settings = resolve_settings(Some(file), |name| match name {
            "BLOG_API_URL" => Some("https://from-env.example".to_string()),
            "APP__API_BASE_URL" => Some("https://from-alias.example".to_string()),
            _ => None,
        });
        assert_eq!(settings.api_base_url, "https://from-alias.example");
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let settings = resolve_settings(None, |name| {
            (name == "BLOG_API_URL").then(|| "https://api.example/dev///".to_string())
        });
        assert_eq!(settings.api_base_url, "https://api.example/dev");
    }

    #[test]
    fn malformed_file_is_reported_not_fatal() {
        let dir = std::env::temp_dir().join(format!(
            "blogdesk_settings_test_{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("blogdesk.toml");
        fs::write(&path, "api_base_url = [not toml").expect("write config");

        assert!(read_file_config(&path).is_err());

        fs::remove_dir_all(dir).expect("cleanup");
    }
}
