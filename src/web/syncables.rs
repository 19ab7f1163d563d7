// src/web/syncables.rs

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};

use crate::auth::Session;
use crate::error::AppError;
use crate::models::{GroupSyncable, GroupSyncablePatch};
use crate::syncable_service::{SyncableService, SyncableTarget};
use crate::web::status_ok;

/// Маршруты привязок для цели `T`.
///
/// Каждый вызов порождает отдельный набор обработчиков, тип цели зашит
/// в них при регистрации и из запроса не читается.
pub fn routes<T: SyncableTarget>(service: SyncableService<T>) -> Router {
    let collection = format!("/groups/:group_id/{}", T::ROUTE_SEGMENT);
    let item = format!("{}/:syncable_id", collection);

    Router::new()
        .route(&collection, get(list_syncables::<T>).post(create_syncable::<T>))
        .route(
            &item,
            get(get_syncable::<T>)
                .put(update_syncable::<T>)
                .delete(delete_syncable::<T>),
        )
        .with_state(service)
}

async fn create_syncable<T: SyncableTarget>(
    State(service): State<SyncableService<T>>,
    Extension(session): Extension<Session>,
    Path(group_id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let syncable = service
        .create_syncable(&session, &group_id, GroupSyncablePatch::from_json(&body))
        .await?;
    Ok((StatusCode::CREATED, Json(syncable)))
}

async fn list_syncables<T: SyncableTarget>(
    State(service): State<SyncableService<T>>,
    Extension(session): Extension<Session>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<GroupSyncable>>, AppError> {
    Ok(Json(service.list_syncables(&session, &group_id).await?))
}

async fn get_syncable<T: SyncableTarget>(
    State(service): State<SyncableService<T>>,
    Extension(session): Extension<Session>,
    Path((group_id, syncable_id)): Path<(String, String)>,
) -> Result<Json<GroupSyncable>, AppError> {
    Ok(Json(service.get_syncable(&session, &group_id, &syncable_id).await?))
}

async fn update_syncable<T: SyncableTarget>(
    State(service): State<SyncableService<T>>,
    Extension(session): Extension<Session>,
    Path((group_id, syncable_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<GroupSyncable>, AppError> {
    let syncable = service
        .update_syncable(&session, &group_id, &syncable_id, GroupSyncablePatch::from_json(&body))
        .await?;
    Ok(Json(syncable))
}

async fn delete_syncable<T: SyncableTarget>(
    State(service): State<SyncableService<T>>,
    Extension(session): Extension<Session>,
    Path((group_id, syncable_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    service.delete_syncable(&session, &group_id, &syncable_id).await?;
    Ok(status_ok())
}
