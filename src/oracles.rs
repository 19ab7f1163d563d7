// src/oracles.rs

//! Внешние "оракулы": лицензия и права доступа.

use std::collections::HashSet;

use crate::auth::Session;

/// Функция лицензии, открывающая управление группами
pub const LICENSE_FEATURE_LDAP: &str = "LDAP";

/// Права, которые проверяют сервисы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ManageSystem,
}

impl Permission {
    pub fn id(&self) -> &'static str {
        match self {
            Permission::ManageSystem => "manage_system",
        }
    }
}

pub trait LicenseOracle: Send + Sync {
    fn feature_enabled(&self, name: &str) -> bool;
}

pub trait PermissionOracle: Send + Sync {
    fn has_permission(&self, session: &Session, permission: Permission) -> bool;
}

/// Лицензия из конфигурации: фиксированный набор включённых функций
#[derive(Debug, Clone, Default)]
pub struct StaticLicense {
    features: HashSet<String>,
}

impl StaticLicense {
    pub fn new<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            features: features.into_iter().map(Into::into).collect(),
        }
    }
}

impl LicenseOracle for StaticLicense {
    fn feature_enabled(&self, name: &str) -> bool {
        self.features.contains(name)
    }
}

/// Права по ролям: `manage_system` есть у любой из админских ролей
#[derive(Debug, Clone)]
pub struct RolePermissions {
    admin_roles: Vec<String>,
}

impl RolePermissions {
    pub fn new(admin_roles: Vec<String>) -> Self {
        Self { admin_roles }
    }
}

impl PermissionOracle for RolePermissions {
    fn has_permission(&self, session: &Session, permission: Permission) -> bool {
        match permission {
            Permission::ManageSystem => self.admin_roles.iter().any(|role| session.has_role(role)),
        }
    }
}
