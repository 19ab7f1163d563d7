// src/models/tombstone.rs

use serde::{Deserialize, Serialize};

/// Состояние мягкого удаления записи.
///
/// На проводе это одно поле `delete_at`: `0` означает активную запись,
/// любое другое значение означает время удаления в миллисекундах.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(from = "i64", into = "i64")]
pub enum Tombstone {
    #[default]
    Active,
    Deleted(i64),
}

impl Tombstone {
    pub fn is_active(&self) -> bool {
        matches!(self, Tombstone::Active)
    }

    /// Время удаления или `0` для активной записи
    pub fn delete_at(&self) -> i64 {
        match self {
            Tombstone::Active => 0,
            Tombstone::Deleted(at) => *at,
        }
    }
}

impl From<i64> for Tombstone {
    fn from(delete_at: i64) -> Self {
        if delete_at == 0 {
            Tombstone::Active
        } else {
            Tombstone::Deleted(delete_at)
        }
    }
}

impl From<Tombstone> for i64 {
    fn from(state: Tombstone) -> Self {
        state.delete_at()
    }
}
