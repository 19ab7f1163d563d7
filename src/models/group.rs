// src/models/group.rs

use serde::{Deserialize, Serialize};

use crate::models::id::ID_LENGTH;
use crate::models::tombstone::Tombstone;
use crate::models::validation::ValidationError;

// ========================================
// 📏 Ограничения полей
// ========================================

pub const GROUP_TYPE_LDAP: &str = "ldap";
pub const GROUP_NAME_MAX_LENGTH: usize = 64;
pub const GROUP_DISPLAY_NAME_MAX_LENGTH: usize = 128;
pub const GROUP_DESCRIPTION_MAX_LENGTH: usize = 1024;
pub const GROUP_REMOTE_ID_MAX_LENGTH: usize = 2048;

/// Допустимые типы групп
pub const GROUP_TYPES: &[&str] = &[GROUP_TYPE_LDAP];

/// Типы, для которых обязателен `remote_id`
pub const GROUP_TYPES_REQUIRING_REMOTE_ID: &[&str] = &[GROUP_TYPE_LDAP];

/// Нужен ли `remote_id` для данного типа группы
pub fn requires_remote_id(group_type: &str) -> bool {
    GROUP_TYPES_REQUIRING_REMOTE_ID.contains(&group_type)
}

// ========================================
// 👥 Group
// ========================================

/// Группа из внешнего каталога (например, LDAP).
///
/// Все поля имеют значения по умолчанию: при разборе JSON отсутствующее
/// поле становится пустым, а не ошибкой. Тип хранится строкой, чтобы
/// неизвестный тип отсекала валидация, а не декодер.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub group_type: String,
    pub remote_id: String,
    pub create_at: i64,
    pub update_at: i64,
    #[serde(rename = "delete_at")]
    pub deleted: Tombstone,
}

impl Group {
    pub fn new(name: String, display_name: String, group_type: String, remote_id: String) -> Self {
        Self {
            name,
            display_name,
            group_type,
            remote_id,
            ..Self::default()
        }
    }

    pub fn is_deleted(&self) -> bool {
        !self.deleted.is_active()
    }

    pub fn requires_remote_id(&self) -> bool {
        requires_remote_id(&self.group_type)
    }

    /// Проверка перед созданием. Возвращает первое нарушение в порядке:
    /// name, display_name, description, type, remote_id.
    pub fn validate_for_create(&self) -> Result<(), ValidationError> {
        let name_len = self.name.chars().count();
        if name_len == 0 || name_len > GROUP_NAME_MAX_LENGTH {
            return Err(ValidationError::Name { max: GROUP_NAME_MAX_LENGTH });
        }

        let display_name_len = self.display_name.chars().count();
        if display_name_len == 0 || display_name_len > GROUP_DISPLAY_NAME_MAX_LENGTH {
            return Err(ValidationError::DisplayName { max: GROUP_DISPLAY_NAME_MAX_LENGTH });
        }

        if self.description.chars().count() > GROUP_DESCRIPTION_MAX_LENGTH {
            return Err(ValidationError::Description { max: GROUP_DESCRIPTION_MAX_LENGTH });
        }

        if !GROUP_TYPES.contains(&self.group_type.as_str()) {
            return Err(ValidationError::Type { valid: GROUP_TYPES.join(", ") });
        }

        let remote_id_len = self.remote_id.chars().count();
        if remote_id_len > GROUP_REMOTE_ID_MAX_LENGTH || (remote_id_len == 0 && self.requires_remote_id()) {
            return Err(ValidationError::RemoteId { max: GROUP_REMOTE_ID_MAX_LENGTH });
        }

        Ok(())
    }

    /// Проверка перед обновлением: запись уже должна быть сохранена
    pub fn validate_for_update(&self) -> Result<(), ValidationError> {
        if self.id.chars().count() != ID_LENGTH {
            return Err(ValidationError::Id);
        }
        if self.create_at == 0 {
            return Err(ValidationError::CreateAt);
        }
        if self.update_at == 0 {
            return Err(ValidationError::UpdateAt);
        }
        self.validate_for_create()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Разбор тела запроса. Некорректный JSON или `null` дают `None`.
    pub fn from_json(data: &[u8]) -> Option<Group> {
        serde_json::from_slice::<Option<Group>>(data).ok().flatten()
    }
}

pub fn groups_to_json(groups: &[Group]) -> String {
    serde_json::to_string(groups).unwrap_or_else(|_| "[]".to_string())
}
