// src/group_service.rs

use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::Session;
use crate::error::AppError;
use crate::events::AuditSink;
use crate::models::{is_valid_id, Group, Tombstone};
use crate::oracles::{LicenseOracle, Permission, PermissionOracle, LICENSE_FEATURE_LDAP};
use crate::store::{clamp_per_page, GroupStore};

/// Внешние зависимости сервисов. Собственного изменяемого состояния
/// у сервисов нет, всё состояние живёт в хранилище.
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn GroupStore>,
    pub license: Arc<dyn LicenseOracle>,
    pub permissions: Arc<dyn PermissionOracle>,
    pub audit: Arc<dyn AuditSink>,
}

impl Collaborators {
    pub(crate) fn require_license(&self, message_id: &'static str) -> Result<(), AppError> {
        if self.license.feature_enabled(LICENSE_FEATURE_LDAP) {
            return Ok(());
        }
        warn!(operation = message_id, "license feature {} is not enabled", LICENSE_FEATURE_LDAP);
        Err(AppError::NotImplemented(message_id))
    }

    pub(crate) fn require_permission(&self, session: &Session, permission: Permission) -> Result<(), AppError> {
        if self.permissions.has_permission(session, permission) {
            return Ok(());
        }
        warn!(user_id = %session.user_id, permission = permission.id(), "permission denied");
        Err(AppError::Forbidden(permission.id()))
    }
}

/// Проверка идентификатора из пути
pub(crate) fn require_id(name: &str, value: &str) -> Result<(), AppError> {
    if is_valid_id(value) {
        Ok(())
    } else {
        Err(AppError::invalid_param(name))
    }
}

/// Жизненный цикл групп: создание, чтение, список, обновление, удаление.
///
/// Порядок проверок во всех операциях одинаковый: параметры пути, тело,
/// лицензия, права, валидация и только потом запись в хранилище.
#[derive(Clone)]
pub struct GroupService {
    ctx: Collaborators,
}

impl GroupService {
    pub fn new(ctx: Collaborators) -> Self {
        Self { ctx }
    }

    pub async fn create(&self, session: &Session, group: Option<Group>) -> Result<Group, AppError> {
        let mut group = group.ok_or_else(|| AppError::invalid_param("group"))?;
        self.ctx.require_license("api.group.create_group.license.error")?;
        self.ctx.require_permission(session, Permission::ManageSystem)?;

        // id и метки времени назначает хранилище
        group.id.clear();
        group.create_at = 0;
        group.update_at = 0;
        group.deleted = Tombstone::Active;
        group.validate_for_create()?;

        let group = self.ctx.store.create_group(group).await?;
        self.ctx.audit.audit("group.create", session, &group.id);
        info!(group_id = %group.id, name = %group.name, "group created");
        Ok(group)
    }

    /// Возвращает группу по id, включая удалённые
    pub async fn get(&self, session: &Session, group_id: &str) -> Result<Group, AppError> {
        require_id("group_id", group_id)?;
        self.ctx.require_permission(session, Permission::ManageSystem)?;

        Ok(self.ctx.store.get_group(group_id).await?)
    }

    pub async fn list(&self, session: &Session, page: usize, per_page: Option<usize>) -> Result<Vec<Group>, AppError> {
        self.ctx.require_permission(session, Permission::ManageSystem)?;

        Ok(self.ctx.store.list_groups(page, clamp_per_page(per_page)).await?)
    }

    pub async fn update(&self, session: &Session, group_id: &str, patch: Option<Group>) -> Result<Group, AppError> {
        require_id("group_id", group_id)?;
        let mut patch = patch.ok_or_else(|| AppError::invalid_param("group"))?;
        self.ctx.require_license("api.group.update_group.license.error")?;
        self.ctx.require_permission(session, Permission::ManageSystem)?;

        // Обновляется всегда запись из пути, id из тела игнорируется
        patch.id = group_id.to_string();
        patch.validate_for_update()?;

        let group = self.ctx.store.update_group(patch).await?;
        self.ctx.audit.audit("group.update", session, &group.id);
        info!(group_id = %group.id, "group updated");
        Ok(group)
    }

    /// Мягкое удаление. Повторное удаление даёт `NotFound`.
    pub async fn delete(&self, session: &Session, group_id: &str) -> Result<(), AppError> {
        require_id("group_id", group_id)?;
        self.ctx.require_license("api.group.delete_group.license.error")?;
        self.ctx.require_permission(session, Permission::ManageSystem)?;

        let group = self.ctx.store.delete_group(group_id).await?;
        self.ctx.audit.audit("group.delete", session, &group.id);
        info!(group_id = %group.id, delete_at = group.deleted.delete_at(), "group deleted");
        Ok(())
    }
}
