// src/models/validation.rs

use thiserror::Error;

/// Нарушение инварианта сущности. Проверки идут по порядку полей
/// и возвращают только первое нарушение.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("group id must be a 26 character identifier")]
    Id,
    #[error("group create_at must be set")]
    CreateAt,
    #[error("group update_at must be set")]
    UpdateAt,
    #[error("group name must be between 1 and {max} characters")]
    Name { max: usize },
    #[error("group display_name must be between 1 and {max} characters")]
    DisplayName { max: usize },
    #[error("group description must be at most {max} characters")]
    Description { max: usize },
    #[error("group type must be one of: {valid}")]
    Type { valid: String },
    #[error("group remote_id is missing or longer than {max} characters")]
    RemoteId { max: usize },
    #[error("group_id must be a 26 character identifier")]
    SyncableGroupId,
    #[error("{kind} id must be a 26 character identifier")]
    SyncableId { kind: &'static str },
}

impl ValidationError {
    /// Стабильный идентификатор сообщения для клиента
    pub fn message_id(&self) -> &'static str {
        match self {
            ValidationError::Id => "model.group.id.app_error",
            ValidationError::CreateAt => "model.group.create_at.app_error",
            ValidationError::UpdateAt => "model.group.update_at.app_error",
            ValidationError::Name { .. } => "model.group.name.app_error",
            ValidationError::DisplayName { .. } => "model.group.display_name.app_error",
            ValidationError::Description { .. } => "model.group.description.app_error",
            ValidationError::Type { .. } => "model.group.type.app_error",
            ValidationError::RemoteId { .. } => "model.group.remote_id.app_error",
            ValidationError::SyncableGroupId => "model.group_syncable.group_id.app_error",
            ValidationError::SyncableId { .. } => "model.group_syncable.syncable_id.app_error",
        }
    }
}
