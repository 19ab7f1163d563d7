// src/models/group_syncable.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::id::is_valid_id;
use crate::models::tombstone::Tombstone;
use crate::models::validation::ValidationError;

/// К чему привязывается группа
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncableType {
    Team,
    Channel,
}

impl SyncableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncableType::Team => "Team",
            SyncableType::Channel => "Channel",
        }
    }

    /// Формат идентификатора команды/канала. Сейчас у обоих типов
    /// обычный 26-символьный id.
    pub fn is_valid_reference(&self, id: &str) -> bool {
        match self {
            SyncableType::Team | SyncableType::Channel => is_valid_id(id),
        }
    }
}

impl fmt::Display for SyncableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Привязка группы к команде или каналу.
/// Ключ: тройка `(group_id, syncable_id, syncable_type)`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GroupSyncable {
    pub group_id: String,
    pub syncable_id: String,
    #[serde(rename = "type")]
    pub syncable_type: SyncableType,
    pub auto_add: bool,
    pub create_at: i64,
    pub update_at: i64,
    #[serde(rename = "delete_at")]
    pub deleted: Tombstone,
}

impl GroupSyncable {
    pub fn new(group_id: String, syncable_id: String, syncable_type: SyncableType, auto_add: bool) -> Self {
        Self {
            group_id,
            syncable_id,
            syncable_type,
            auto_add,
            create_at: 0,
            update_at: 0,
            deleted: Tombstone::Active,
        }
    }

    pub fn is_deleted(&self) -> bool {
        !self.deleted.is_active()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_valid_id(&self.group_id) {
            return Err(ValidationError::SyncableGroupId);
        }
        if !self.syncable_type.is_valid_reference(&self.syncable_id) {
            return Err(ValidationError::SyncableId { kind: self.syncable_type.as_str() });
        }
        Ok(())
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(data: &[u8]) -> Option<GroupSyncable> {
        serde_json::from_slice::<Option<GroupSyncable>>(data).ok().flatten()
    }
}

/// Тело запроса на создание/обновление привязки.
///
/// Группа и тип берутся из маршрута, поэтому здесь их нет: поля `group_id`
/// и `type` в теле просто игнорируются. `auto_add` обязан быть булевым,
/// иначе разбор вернёт `None`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct GroupSyncablePatch {
    pub syncable_id: String,
    pub auto_add: bool,
}

impl GroupSyncablePatch {
    pub fn from_json(data: &[u8]) -> Option<GroupSyncablePatch> {
        serde_json::from_slice::<Option<GroupSyncablePatch>>(data).ok().flatten()
    }
}
