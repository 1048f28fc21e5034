use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::sources::applemusic::AppleMusicOptions;

/// Environment variable that overrides the token stored in the config file.
pub const TOKEN_ENV: &str = "AMRESOLVE_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub applemusic: AppleMusicConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppleMusicConfig {
    pub storefront_code: Option<String>,
    pub token: Option<String>,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    pub default_source: Option<String>,
}

impl AppleMusicConfig {
    pub fn options(&self) -> AppleMusicOptions {
        AppleMusicOptions {
            storefront_code: self.storefront_code.clone(),
            image_width: self.image_width,
            image_height: self.image_height,
            default_source: self.default_source.clone(),
        }
    }

    /// Token from the environment, else from the config file.
    pub fn token(&self) -> Option<String> {
        resolve_token(std::env::var(TOKEN_ENV).ok(), self.token.clone())
    }
}

fn resolve_token(from_env: Option<String>, from_file: Option<String>) -> Option<String> {
    from_env
        .filter(|t| !t.is_empty())
        .or(from_file.filter(|t| !t.is_empty()))
}

fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".config")
        .join("amresolve")
        .join("config.toml")
}

pub fn load_config() -> Config {
    let path = config_path();
    if !path.exists() {
        return Config::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            log::warn!("Ignoring invalid config {}: {e}", path.display());
            Config::default()
        }),
        Err(e) => {
            log::warn!("Could not read {}: {e}", path.display());
            Config::default()
        }
    }
}

fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content)?;
    Ok(())
}
