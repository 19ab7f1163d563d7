// src/syncable_service.rs

use std::marker::PhantomData;
use tracing::info;

use crate::auth::Session;
use crate::error::AppError;
use crate::group_service::{require_id, Collaborators};
use crate::models::{GroupSyncable, GroupSyncablePatch, SyncableType};
use crate::oracles::Permission;

/// Цель привязки группы. Реализуется маркерными типами `Team` и `Channel`,
/// тип выбирается при регистрации маршрутов, а не по данным запроса.
pub trait SyncableTarget: Send + Sync + 'static {
    const KIND: SyncableType;
    /// Сегмент пути: `/groups/:group_id/<segment>`
    const ROUTE_SEGMENT: &'static str;
    /// Имя параметра пути с id команды/канала
    const ID_PARAM: &'static str;

    fn validate_reference(id: &str) -> bool {
        Self::KIND.is_valid_reference(id)
    }
}

pub struct Team;

impl SyncableTarget for Team {
    const KIND: SyncableType = SyncableType::Team;
    const ROUTE_SEGMENT: &'static str = "teams";
    const ID_PARAM: &'static str = "team_id";
}

pub struct Channel;

impl SyncableTarget for Channel {
    const KIND: SyncableType = SyncableType::Channel;
    const ROUTE_SEGMENT: &'static str = "channels";
    const ID_PARAM: &'static str = "channel_id";
}

/// Политика привязок из конфигурации
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncablePolicy {
    /// Требовать функцию `LDAP` в лицензии для изменения привязок
    pub require_license: bool,
}

/// CRUD привязок группы к цели `T`
pub struct SyncableService<T: SyncableTarget> {
    ctx: Collaborators,
    policy: SyncablePolicy,
    _target: PhantomData<fn() -> T>,
}

impl<T: SyncableTarget> Clone for SyncableService<T> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            policy: self.policy,
            _target: PhantomData,
        }
    }
}

impl<T: SyncableTarget> SyncableService<T> {
    pub fn new(ctx: Collaborators, policy: SyncablePolicy) -> Self {
        Self {
            ctx,
            policy,
            _target: PhantomData,
        }
    }

    fn require_license(&self, message_id: &'static str) -> Result<(), AppError> {
        if self.policy.require_license {
            self.ctx.require_license(message_id)
        } else {
            Ok(())
        }
    }

    fn require_syncable_id(syncable_id: &str) -> Result<(), AppError> {
        if T::validate_reference(syncable_id) {
            Ok(())
        } else {
            Err(AppError::invalid_param(T::ID_PARAM))
        }
    }

    fn action(verb: &str) -> String {
        format!("group_syncable.{}.{}", T::ROUTE_SEGMENT, verb)
    }

    fn target(group_id: &str, syncable_id: &str) -> String {
        format!("{}:{}:{}", group_id, T::KIND, syncable_id)
    }

    pub async fn create_syncable(
        &self,
        session: &Session,
        group_id: &str,
        body: Option<GroupSyncablePatch>,
    ) -> Result<GroupSyncable, AppError> {
        require_id("group_id", group_id)?;
        let body = body.ok_or_else(|| AppError::invalid_param("group_syncable"))?;
        self.require_license("api.group.create_group_syncable.license.error")?;
        self.ctx.require_permission(session, Permission::ManageSystem)?;

        let syncable = GroupSyncable::new(group_id.to_string(), body.syncable_id, T::KIND, body.auto_add);
        syncable.validate()?;

        let syncable = self.ctx.store.create_group_syncable(syncable).await?;
        self.ctx.audit.audit(&Self::action("create"), session, &Self::target(group_id, &syncable.syncable_id));
        info!(group_id, syncable_type = %T::KIND, syncable_id = %syncable.syncable_id, "group syncable created");
        Ok(syncable)
    }

    /// Неудалённые привязки группы этого типа
    pub async fn list_syncables(&self, session: &Session, group_id: &str) -> Result<Vec<GroupSyncable>, AppError> {
        require_id("group_id", group_id)?;
        self.ctx.require_permission(session, Permission::ManageSystem)?;

        Ok(self.ctx.store.list_group_syncables(group_id, T::KIND).await?)
    }

    pub async fn get_syncable(
        &self,
        session: &Session,
        group_id: &str,
        syncable_id: &str,
    ) -> Result<GroupSyncable, AppError> {
        require_id("group_id", group_id)?;
        Self::require_syncable_id(syncable_id)?;
        self.ctx.require_permission(session, Permission::ManageSystem)?;

        Ok(self.ctx.store.get_group_syncable(group_id, syncable_id, T::KIND).await?)
    }

    pub async fn update_syncable(
        &self,
        session: &Session,
        group_id: &str,
        syncable_id: &str,
        patch: Option<GroupSyncablePatch>,
    ) -> Result<GroupSyncable, AppError> {
        require_id("group_id", group_id)?;
        Self::require_syncable_id(syncable_id)?;
        let patch = patch.ok_or_else(|| AppError::invalid_param("group_syncable"))?;
        self.require_license("api.group.update_group_syncable.license.error")?;
        self.ctx.require_permission(session, Permission::ManageSystem)?;

        // Ключ привязки всегда из пути
        let syncable = GroupSyncable::new(group_id.to_string(), syncable_id.to_string(), T::KIND, patch.auto_add);
        syncable.validate()?;

        let syncable = self.ctx.store.update_group_syncable(syncable).await?;
        self.ctx.audit.audit(&Self::action("update"), session, &Self::target(group_id, syncable_id));
        info!(group_id, syncable_type = %T::KIND, syncable_id, auto_add = syncable.auto_add, "group syncable updated");
        Ok(syncable)
    }

    pub async fn delete_syncable(&self, session: &Session, group_id: &str, syncable_id: &str) -> Result<(), AppError> {
        require_id("group_id", group_id)?;
        Self::require_syncable_id(syncable_id)?;
        self.require_license("api.group.delete_group_syncable.license.error")?;
        self.ctx.require_permission(session, Permission::ManageSystem)?;

        self.ctx.store.delete_group_syncable(group_id, syncable_id, T::KIND).await?;
        self.ctx.audit.audit(&Self::action("delete"), session, &Self::target(group_id, syncable_id));
        info!(group_id, syncable_type = %T::KIND, syncable_id, "group syncable deleted");
        Ok(())
    }
}
