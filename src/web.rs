// src/web.rs

use axum::{middleware, response::IntoResponse, Json, Router};
use serde_json::json;

use crate::app::App;
use crate::middleware::require_session;
use crate::syncable_service::{Channel, Team};

pub mod groups;
pub mod syncables;

/// Пустой ответ об успехе
pub fn status_ok() -> impl IntoResponse {
    Json(json!({ "status": "OK" }))
}

/// Собрать роутер API. Маршруты привязок регистрируются отдельно
/// для команд и для каналов.
pub fn create_router(app: App) -> Router {
    let api = Router::new()
        .merge(groups::routes(app.groups))
        .merge(syncables::routes::<Team>(app.teams))
        .merge(syncables::routes::<Channel>(app.channels))
        .layer(middleware::from_fn_with_state(app.keys, require_session));

    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .nest("/api/v4", api)
        .layer(
            tower::ServiceBuilder::new()
                .layer(tower_http::trace::TraceLayer::new_for_http())
                .layer(cors),
        )
}

pub async fn run_web_server(app: App, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(app);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🌐 Web API запущен на http://{}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}
