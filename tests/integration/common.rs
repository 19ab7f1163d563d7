// tests/integration/common.rs

use axum::http::HeaderValue;
use axum_test::TestServer;
use nextgroups::{config::AppConfig, store::RadStore, web, App};
use serde_json::{json, Value};
use std::sync::Arc;

pub struct TestApp {
    pub server: TestServer,
    pub app: App,
    /// `Bearer ...` для пользователя с ролью `system_admin`
    pub admin: HeaderValue,
    /// `Bearer ...` для пользователя без ролей
    pub user: HeaderValue,
}

pub fn config(licensed: bool) -> AppConfig {
    let mut config = AppConfig::default();
    config.security.jwt.secret_key = Some("integration-secret".to_string());
    if licensed {
        config.license.features = vec!["LDAP".to_string()];
    }
    config
}

pub fn spawn_with(config: AppConfig) -> TestApp {
    let app = App::with_store(&config, Arc::new(RadStore::in_memory())).unwrap();
    let server = TestServer::new(web::create_router(app.clone())).unwrap();

    let admin = bearer(&app, "admin-user", &["system_admin"]);
    let user = bearer(&app, "plain-user", &[]);

    TestApp { server, app, admin, user }
}

pub fn spawn(licensed: bool) -> TestApp {
    spawn_with(config(licensed))
}

pub fn bearer(app: &App, user_id: &str, roles: &[&str]) -> HeaderValue {
    let token = app
        .keys
        .issue(user_id, roles.iter().map(|r| r.to_string()).collect())
        .unwrap();
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

pub fn group_body(name: &str) -> Value {
    json!({
        "name": name,
        "display_name": format!("{} display", name),
        "type": "ldap",
        "remote_id": format!("cn={},dc=x", name),
    })
}

/// Создать группу от имени администратора и вернуть её JSON
pub async fn create_group(t: &TestApp, name: &str) -> Value {
    let response = t
        .server
        .post("/api/v4/groups")
        .add_header(axum::http::header::AUTHORIZATION, t.admin.clone())
        .json(&group_body(name))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}
