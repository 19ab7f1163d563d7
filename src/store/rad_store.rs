// src/store/rad_store.rs

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{get_millis, new_id, Group, GroupSyncable, SyncableType, Tombstone};
use crate::raddb::{MasterKey, RadDB};
use crate::store::{GroupStore, StoreError, MAX_PER_PAGE};

const ALL_GROUPS_INDEX: &str = "all_groups_index";

fn group_key(id: &str) -> String {
    format!("group:{}", id)
}

fn group_name_key(name: &str) -> String {
    format!("group_name_index:{}", name)
}

fn syncable_key(group_id: &str, syncable_type: SyncableType, syncable_id: &str) -> String {
    format!("group_syncable:{}:{}:{}", group_id, syncable_type, syncable_id)
}

fn syncables_index_key(group_id: &str, syncable_type: SyncableType) -> String {
    format!("group_syncables_index:{}:{}", group_id, syncable_type)
}

/// `GroupStore` поверх RadDB.
///
/// Каждое изменение выполняется целиком под блокировкой на запись:
/// проверка уникальности и запись не разделяются, поэтому из двух
/// одновременных `create` с одним ключом проходит ровно один.
#[derive(Clone)]
pub struct RadStore {
    db: Arc<RwLock<RadDB>>,
}

impl RadStore {
    /// Открыть хранилище с путём к базе и мастер-ключом
    pub fn open<P: AsRef<Path>>(path: P, key: &MasterKey) -> Result<Self, StoreError> {
        let db = RadDB::open(path, key)?;
        Ok(Self {
            db: Arc::new(RwLock::new(db)),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            db: Arc::new(RwLock::new(RadDB::in_memory(&RadDB::generate_key()))),
        }
    }
}

/// Загрузить объект из базы
fn load<T: DeserializeOwned>(db: &RadDB, key: &str) -> Result<Option<T>, StoreError> {
    match db.get(key) {
        Some(data) => bincode::deserialize(data)
            .map(Some)
            .map_err(|e| StoreError::Unavailable(format!("corrupt record {}: {}", key, e))),
        None => Ok(None),
    }
}

/// Положить объект в базу (на диск попадёт при `flush`)
fn put<T: Serialize>(db: &mut RadDB, key: String, value: &T) -> Result<(), StoreError> {
    let data = bincode::serialize(value).map_err(|e| StoreError::Unavailable(e.to_string()))?;
    db.insert(key, data);
    Ok(())
}

/// Выполнить изменение целиком: при ошибке внутри `f` или при неудачном
/// `flush` в памяти не остаётся ни одной из сделанных записей
fn transaction<T>(db: &mut RadDB, f: impl FnOnce(&mut RadDB) -> Result<T, StoreError>) -> Result<T, StoreError> {
    match f(db) {
        Ok(value) => {
            db.flush()?;
            Ok(value)
        }
        Err(e) => {
            db.rollback();
            Err(e)
        }
    }
}

fn load_active_group(db: &RadDB, id: &str) -> Result<Group, StoreError> {
    match load::<Group>(db, &group_key(id))? {
        Some(group) if !group.is_deleted() => Ok(group),
        _ => Err(StoreError::NotFound(format!("group {}", id))),
    }
}

#[async_trait]
impl GroupStore for RadStore {
    // === GROUP ===

    async fn create_group(&self, mut group: Group) -> Result<Group, StoreError> {
        let mut db = self.db.write().await;

        transaction(&mut db, |db| {
            // Имя уникально среди всех записей, включая удалённые
            let name_key = group_name_key(&group.name);
            if db.contains_key(&name_key) {
                return Err(StoreError::Conflict(format!("group name {}", group.name)));
            }

            let now = get_millis();
            group.id = new_id();
            group.create_at = now;
            group.update_at = now;
            group.deleted = Tombstone::Active;

            put(db, group_key(&group.id), &group)?;
            put(db, name_key, &group.id)?;

            let mut all_groups: Vec<String> = load(db, ALL_GROUPS_INDEX)?.unwrap_or_default();
            all_groups.push(group.id.clone());
            put(db, ALL_GROUPS_INDEX.to_string(), &all_groups)?;

            Ok(group)
        })
    }

    async fn get_group(&self, id: &str) -> Result<Group, StoreError> {
        let db = self.db.read().await;
        load(&db, &group_key(id))?.ok_or_else(|| StoreError::NotFound(format!("group {}", id)))
    }

    async fn list_groups(&self, page: usize, per_page: usize) -> Result<Vec<Group>, StoreError> {
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let db = self.db.read().await;

        let ids: Vec<String> = load(&db, ALL_GROUPS_INDEX)?.unwrap_or_default();
        let mut groups = Vec::new();
        for id in ids {
            if let Some(group) = load::<Group>(&db, &group_key(&id))? {
                if !group.is_deleted() {
                    groups.push(group);
                }
            }
        }

        Ok(groups
            .into_iter()
            .skip(page.saturating_mul(per_page))
            .take(per_page)
            .collect())
    }

    async fn update_group(&self, mut group: Group) -> Result<Group, StoreError> {
        let mut db = self.db.write().await;

        transaction(&mut db, |db| {
            let existing = load_active_group(db, &group.id)?;

            if existing.name != group.name {
                let new_name_key = group_name_key(&group.name);
                if db.contains_key(&new_name_key) {
                    return Err(StoreError::Conflict(format!("group name {}", group.name)));
                }
                db.remove(&group_name_key(&existing.name));
                put(db, new_name_key, &group.id)?;
            }

            group.create_at = existing.create_at;
            group.update_at = get_millis();
            group.deleted = existing.deleted;

            put(db, group_key(&group.id), &group)?;
            Ok(group)
        })
    }

    async fn delete_group(&self, id: &str) -> Result<Group, StoreError> {
        let mut db = self.db.write().await;

        transaction(&mut db, |db| {
            let mut group = load_active_group(db, id)?;

            let now = get_millis();
            group.deleted = Tombstone::Deleted(now);
            group.update_at = now;

            put(db, group_key(id), &group)?;
            Ok(group)
        })
    }

    // === GROUP SYNCABLE ===

    async fn create_group_syncable(&self, mut syncable: GroupSyncable) -> Result<GroupSyncable, StoreError> {
        let mut db = self.db.write().await;

        transaction(&mut db, |db| {
            load_active_group(db, &syncable.group_id)?;

            let key = syncable_key(&syncable.group_id, syncable.syncable_type, &syncable.syncable_id);
            let now = get_millis();

            match load::<GroupSyncable>(db, &key)? {
                Some(existing) if !existing.is_deleted() => {
                    return Err(StoreError::Conflict(format!(
                        "group {} {} binding {}",
                        syncable.group_id, syncable.syncable_type, syncable.syncable_id
                    )));
                }
                // Удалённая привязка оживает с новыми атрибутами
                Some(existing) => {
                    syncable.create_at = existing.create_at;
                }
                None => {
                    let index_key = syncables_index_key(&syncable.group_id, syncable.syncable_type);
                    let mut ids: Vec<String> = load(db, &index_key)?.unwrap_or_default();
                    ids.push(syncable.syncable_id.clone());
                    put(db, index_key, &ids)?;
                    syncable.create_at = now;
                }
            }

            syncable.update_at = now;
            syncable.deleted = Tombstone::Active;

            put(db, key, &syncable)?;
            Ok(syncable)
        })
    }

    async fn get_group_syncable(
        &self,
        group_id: &str,
        syncable_id: &str,
        syncable_type: SyncableType,
    ) -> Result<GroupSyncable, StoreError> {
        let db = self.db.read().await;
        load(&db, &syncable_key(group_id, syncable_type, syncable_id))?.ok_or_else(|| {
            StoreError::NotFound(format!("group {} {} binding {}", group_id, syncable_type, syncable_id))
        })
    }

    async fn list_group_syncables(
        &self,
        group_id: &str,
        syncable_type: SyncableType,
    ) -> Result<Vec<GroupSyncable>, StoreError> {
        let db = self.db.read().await;
        load_active_group(&db, group_id)?;

        let ids: Vec<String> = load(&db, &syncables_index_key(group_id, syncable_type))?.unwrap_or_default();
        let mut syncables = Vec::new();
        for syncable_id in ids {
            if let Some(syncable) = load::<GroupSyncable>(&db, &syncable_key(group_id, syncable_type, &syncable_id))? {
                if !syncable.is_deleted() {
                    syncables.push(syncable);
                }
            }
        }
        Ok(syncables)
    }

    async fn update_group_syncable(&self, syncable: GroupSyncable) -> Result<GroupSyncable, StoreError> {
        let mut db = self.db.write().await;

        transaction(&mut db, |db| {
            load_active_group(db, &syncable.group_id)?;
            let key = syncable_key(&syncable.group_id, syncable.syncable_type, &syncable.syncable_id);

            let mut existing = match load::<GroupSyncable>(db, &key)? {
                Some(existing) if !existing.is_deleted() => existing,
                _ => {
                    return Err(StoreError::NotFound(format!(
                        "group {} {} binding {}",
                        syncable.group_id, syncable.syncable_type, syncable.syncable_id
                    )));
                }
            };

            existing.auto_add = syncable.auto_add;
            existing.update_at = get_millis();

            put(db, key, &existing)?;
            Ok(existing)
        })
    }

    async fn delete_group_syncable(
        &self,
        group_id: &str,
        syncable_id: &str,
        syncable_type: SyncableType,
    ) -> Result<GroupSyncable, StoreError> {
        let mut db = self.db.write().await;

        transaction(&mut db, |db| {
            load_active_group(db, group_id)?;
            let key = syncable_key(group_id, syncable_type, syncable_id);

            let mut syncable = match load::<GroupSyncable>(db, &key)? {
                Some(existing) if !existing.is_deleted() => existing,
                _ => {
                    return Err(StoreError::NotFound(format!(
                        "group {} {} binding {}",
                        group_id, syncable_type, syncable_id
                    )));
                }
            };

            let now = get_millis();
            syncable.deleted = Tombstone::Deleted(now);
            syncable.update_at = now;

            put(db, key, &syncable)?;
            Ok(syncable)
        })
    }
}
