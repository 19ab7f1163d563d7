// src/app.rs

use std::sync::Arc;
use thiserror::Error;

use crate::auth::{AuthError, JwtKeys};
use crate::config::{AppConfig, ConfigError};
use crate::events::EventHub;
use crate::group_service::{Collaborators, GroupService};
use crate::oracles::{RolePermissions, StaticLicense};
use crate::raddb::RadDB;
use crate::store::{GroupStore, RadStore, StoreError};
use crate::syncable_service::{Channel, SyncablePolicy, SyncableService, Team};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),
    #[error("failed to set up authentication: {0}")]
    Auth(#[from] AuthError),
}

/// Собранное приложение: сервисы, ключи сессий и шина аудита
#[derive(Clone)]
pub struct App {
    pub groups: GroupService,
    pub teams: SyncableService<Team>,
    pub channels: SyncableService<Channel>,
    pub keys: Arc<JwtKeys>,
    pub events: Arc<EventHub>,
}

impl App {
    /// Открыть хранилище из конфигурации и собрать сервисы
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let store: Arc<dyn GroupStore> = match &config.db_path {
            Some(path) => Arc::new(RadStore::open(path, &config.master_key()?)?),
            None => {
                tracing::warn!("db_path не задан, данные хранятся только в памяти");
                Arc::new(RadStore::in_memory())
            }
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: &AppConfig, store: Arc<dyn GroupStore>) -> Result<Self, StartupError> {
        let events = Arc::new(EventHub::new());
        let ctx = Collaborators {
            store,
            license: Arc::new(StaticLicense::new(config.license.features.iter().cloned())),
            permissions: Arc::new(RolePermissions::new(config.security.admin_roles.clone())),
            audit: events.clone(),
        };

        let policy = SyncablePolicy {
            require_license: config.syncables.require_license,
        };

        let secret = match &config.security.jwt.secret_key {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                tracing::warn!("security.jwt.secret_key не задан, токены действуют только до перезапуска");
                RadDB::generate_key().to_vec()
            }
        };
        let keys = JwtKeys::from_secret(&secret, config.security.jwt.token_expiry_secs)?;

        Ok(Self {
            groups: GroupService::new(ctx.clone()),
            teams: SyncableService::new(ctx.clone(), policy),
            channels: SyncableService::new(ctx, policy),
            keys: Arc::new(keys),
            events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db_path() -> String {
        std::env::temp_dir()
            .join(format!("nextgroups-{}.db", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn file_store_requires_master_key() {
        let config = AppConfig {
            db_path: Some(temp_db_path()),
            ..AppConfig::default()
        };

        let err = App::from_config(&config).err().unwrap();
        assert!(matches!(err, StartupError::Config(ConfigError::MissingMasterKey)));
    }

    #[test]
    fn file_store_opens_with_master_key() {
        let path = temp_db_path();
        let config = AppConfig {
            db_path: Some(path.clone()),
            master_key_hex: Some(hex::encode(RadDB::generate_key())),
            ..AppConfig::default()
        };

        assert!(App::from_config(&config).is_ok());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn memory_store_needs_no_master_key() {
        assert!(App::from_config(&AppConfig::default()).is_ok());
    }
}
