// src/events.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::Utc;
use tokio::sync::broadcast;

use crate::auth::Session;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AuditEvent {
    pub id: Uuid,
    pub action: String,
    pub actor_id: Option<String>,
    pub target_id: Option<String>,
    pub metadata: std::collections::HashMap<String, String>,
    pub timestamp: chrono::DateTime<Utc>,
}

/// Приёмник аудита. Вызывается только после успешного изменения,
/// ошибки доставки никогда не возвращаются вызывающему.
pub trait AuditSink: Send + Sync {
    fn audit(&self, action: &str, session: &Session, target_id: &str);
}

pub struct EventHub {
    sender: broadcast::Sender<AuditEvent>,
}

impl EventHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1000);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuditEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: AuditEvent) {
        tracing::info!(
            target: "audit",
            action = %event.action,
            actor = event.actor_id.as_deref().unwrap_or("-"),
            target_id = event.target_id.as_deref().unwrap_or("-"),
            "audit event"
        );
        let _ = self.sender.send(event); // игнорируем, если нет получателей
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[macro_export]
macro_rules! audit_log {
    ($hub:expr, $action:expr, $actor:expr, $target:expr $(, $key:expr => $value:expr)*) => {
        {
            #[allow(unused_mut)]
            let mut meta = std::collections::HashMap::new();
            $(
                meta.insert($key.to_string(), $value.to_string());
            )*
            let event = $crate::events::AuditEvent {
                id: uuid::Uuid::new_v4(),
                action: $action.to_string(),
                actor_id: $actor,
                target_id: $target,
                metadata: meta,
                timestamp: chrono::Utc::now(),
            };
            $hub.emit(event);
        }
    };
}

impl AuditSink for EventHub {
    fn audit(&self, action: &str, session: &Session, target_id: &str) {
        audit_log!(
            self,
            action,
            Some(session.user_id.clone()),
            Some(target_id.to_string()),
            "roles" => session.roles.join(",")
        );
    }
}
