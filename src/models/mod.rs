// src/models/mod.rs

pub mod id;
pub mod tombstone;
pub mod validation;
pub mod group;
pub mod group_syncable;

// Re-exports

pub use id::{new_id, is_valid_id, ID_LENGTH};
pub use tombstone::Tombstone;
pub use validation::ValidationError;
pub use group::{Group, groups_to_json, requires_remote_id};
pub use group_syncable::{GroupSyncable, GroupSyncablePatch, SyncableType};

/// Текущее время в миллисекундах
pub fn get_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
