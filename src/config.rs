use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_CONFIG_PATH: &str = "~/.media-relay/media-relay.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub owner_id: Option<i64>,
    pub telegram: TelegramConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub api_base: String,
    pub poll_timeout_seconds: u64,
    pub retry_delay_seconds: u64,
    pub queue_capacity: usize,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            poll_timeout_seconds: 60,
            retry_delay_seconds: 3,
            queue_capacity: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub account_id: Option<String>,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    pub bucket: Option<String>,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub public_base_url: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            access_key_id: None,
            access_key_secret: None,
            bucket: None,
            region: "auto".to_string(),
            endpoint_url: None,
            public_base_url: None,
        }
    }
}

/// Validated, immutable settings established once at startup.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub owner_id: i64,
    pub telegram: TelegramSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone)]
pub struct TelegramSettings {
    pub bot_token: String,
    pub api_base: String,
    pub poll_timeout_seconds: u64,
    pub retry_delay_seconds: u64,
    pub queue_capacity: usize,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub access_key_id: String,
    pub access_key_secret: String,
    pub bucket: String,
    pub region: String,
    pub endpoint_url: String,
    pub public_base_url: String,
}

pub fn r2_endpoint(account_id: &str) -> String {
    format!("https://{}.r2.cloudflarestorage.com", account_id)
}

impl Config {
    pub fn resolve(self) -> Result<RelaySettings, ConfigError> {
        let owner_id = self.owner_id.ok_or(ConfigError::Missing("OWNER_ID"))?;
        let bot_token = required(self.telegram.bot_token, "TELEGRAM_BOT_TOKEN")?;
        let account_id = required(self.storage.account_id, "CF_ACCOUNT_ID")?;
        let access_key_id = required(self.storage.access_key_id, "CF_ACCESS_KEY_ID")?;
        let access_key_secret =
            required(self.storage.access_key_secret, "CF_ACCESS_KEY_SECRET")?;
        let bucket = required(self.storage.bucket, "CF_BUCKET_NAME")?;

        let endpoint_url = self
            .storage
            .endpoint_url
            .unwrap_or_else(|| r2_endpoint(&account_id));
        let public_base_url = self
            .storage
            .public_base_url
            .unwrap_or_else(|| r2_endpoint(&account_id));

        Ok(RelaySettings {
            owner_id,
            telegram: TelegramSettings {
                bot_token,
                api_base: self.telegram.api_base,
                poll_timeout_seconds: self.telegram.poll_timeout_seconds,
                retry_delay_seconds: self.telegram.retry_delay_seconds,
                queue_capacity: self.telegram.queue_capacity.max(1),
            },
            storage: StorageSettings {
                access_key_id,
                access_key_secret,
                bucket,
                region: self.storage.region,
                endpoint_url,
                public_base_url,
            },
        })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

fn config_path_with<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup("MEDIA_RELAY_CONFIG")
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| expand_tilde(DEFAULT_CONFIG_PATH))
}

pub fn load_config_file(path: &Path) -> Result<Option<Config>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let cfg = serde_json::from_str::<Config>(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(cfg))
}

/// Loads the optional config file, then applies process environment overrides.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_with(|key| env::var(key).ok())
}

pub fn load_config_with<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = config_path_with(&lookup);
    let mut cfg = load_config_file(&path)?.unwrap_or_default();
    apply_env_overrides(&mut cfg, &lookup)?;
    Ok(cfg)
}

fn apply_env_overrides<F>(cfg: &mut Config, lookup: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(raw) = var("OWNER_ID") {
        let owner = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidOwnerId(raw.clone()))?;
        cfg.owner_id = Some(owner);
    }

    if let Some(token) = var("TELEGRAM_BOT_TOKEN") {
        cfg.telegram.bot_token = Some(token);
    }

    if let Some(base) = var("TELEGRAM_API_BASE") {
        cfg.telegram.api_base = base;
    }

    if let Some(account) = var("CF_ACCOUNT_ID") {
        cfg.storage.account_id = Some(account);
    }

    if let Some(key_id) = var("CF_ACCESS_KEY_ID") {
        cfg.storage.access_key_id = Some(key_id);
    }

    if let Some(secret) = var("CF_ACCESS_KEY_SECRET") {
        cfg.storage.access_key_secret = Some(secret);
    }

    if let Some(bucket) = var("CF_BUCKET_NAME") {
        cfg.storage.bucket = Some(bucket);
    }

    if let Some(url) = var("CF_ENDPOINT_URL") {
        cfg.storage.endpoint_url = Some(url);
    }

    if let Some(url) = var("CF_PUBLIC_BASE_URL") {
        cfg.storage.public_base_url = Some(url);
    }

    Ok(())
}
