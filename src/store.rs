// src/store.rs

//! Хранилище групп и их привязок.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Group, GroupSyncable, SyncableType};

pub mod rad_store;

pub use rad_store::RadStore;

/// Размер страницы по умолчанию
pub const DEFAULT_PER_PAGE: usize = 60;
/// Максимальный размер страницы
pub const MAX_PER_PAGE: usize = 200;

/// Приводит запрошенный размер страницы к допустимому
pub fn clamp_per_page(per_page: Option<usize>) -> usize {
    per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} already exists")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<crate::raddb::RadDbError> for StoreError {
    fn from(e: crate::raddb::RadDbError) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Транзакционное хранилище.
///
/// Хранилище назначает `id` и метки времени, обеспечивает уникальность
/// имени группы и тройки `(group_id, syncable_id, type)` атомарно при записи.
/// Удаление всегда мягкое.
#[async_trait]
pub trait GroupStore: Send + Sync {
    // ───────────────────────────── Groups ─────────────────────────────

    async fn create_group(&self, group: Group) -> Result<Group, StoreError>;

    /// Возвращает запись, в том числе удалённую
    async fn get_group(&self, id: &str) -> Result<Group, StoreError>;

    /// Неудалённые группы в порядке создания
    async fn list_groups(&self, page: usize, per_page: usize) -> Result<Vec<Group>, StoreError>;

    async fn update_group(&self, group: Group) -> Result<Group, StoreError>;

    /// Повторное удаление даёт `NotFound`
    async fn delete_group(&self, id: &str) -> Result<Group, StoreError>;

    // ───────────────────────────── Syncables ──────────────────────────

    async fn create_group_syncable(&self, syncable: GroupSyncable) -> Result<GroupSyncable, StoreError>;

    async fn get_group_syncable(
        &self,
        group_id: &str,
        syncable_id: &str,
        syncable_type: SyncableType,
    ) -> Result<GroupSyncable, StoreError>;

    async fn list_group_syncables(
        &self,
        group_id: &str,
        syncable_type: SyncableType,
    ) -> Result<Vec<GroupSyncable>, StoreError>;

    async fn update_group_syncable(&self, syncable: GroupSyncable) -> Result<GroupSyncable, StoreError>;

    async fn delete_group_syncable(
        &self,
        group_id: &str,
        syncable_id: &str,
        syncable_type: SyncableType,
    ) -> Result<GroupSyncable, StoreError>;
}
