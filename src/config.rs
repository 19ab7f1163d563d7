// src/config.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::raddb::MasterKey;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("master_key_hex must be 64 hex characters: {0}")]
    MasterKey(#[from] hex::FromHexError),
    #[error("master_key_hex is required when db_path is set")]
    MissingMasterKey,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Путь к базе; без него данные живут только в памяти
    #[serde(default)]
    pub db_path: Option<String>,

    /// Ключ шифрования базы (32 байта в hex); обязателен вместе с `db_path`
    #[serde(default)]
    pub master_key_hex: Option<String>,

    #[serde(default)]
    pub web_server: ServerConfig,

    #[serde(default)]
    pub license: LicenseConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    #[serde(default)]
    pub syncables: SyncablesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            master_key_hex: None,
            web_server: ServerConfig::default(),
            license: LicenseConfig::default(),
            security: SecurityConfig::default(),
            syncables: SyncablesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
}

fn default_address() -> String {
    "127.0.0.1:8065".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: default_address() }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LicenseConfig {
    /// Включённые функции лицензии, например `["LDAP"]`
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SecurityConfig {
    #[serde(default)]
    pub jwt: JwtConfig,
    /// Роли с правом `manage_system`
    #[serde(default = "default_admin_roles")]
    pub admin_roles: Vec<String>,
}

fn default_admin_roles() -> Vec<String> {
    vec!["system_admin".to_string()]
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            admin_roles: default_admin_roles(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JwtConfig {
    pub secret_key: Option<String>,
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: i64,
}

fn default_token_expiry() -> i64 {
    24 * 3600
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            token_expiry_secs: default_token_expiry(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SyncablesConfig {
    /// Требовать функцию `LDAP` для изменения привязок (по умолчанию нет)
    #[serde(default)]
    pub require_license: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Загрузить файл, если он есть, иначе конфигурация по умолчанию
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn master_key(&self) -> Result<MasterKey, ConfigError> {
        let hex_key = self.master_key_hex.as_deref().ok_or(ConfigError::MissingMasterKey)?;
        let mut key = [0u8; 32];
        hex::decode_to_slice(hex_key, &mut key)?;
        Ok(key)
    }
}
