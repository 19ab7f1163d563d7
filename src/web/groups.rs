// src/web/groups.rs

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Deserialize;

use crate::auth::Session;
use crate::error::AppError;
use crate::group_service::GroupService;
use crate::models::Group;
use crate::web::status_ok;

#[derive(Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: usize,
    pub per_page: Option<usize>,
}

pub fn routes(service: GroupService) -> Router {
    Router::new()
        .route("/groups", get(get_groups).post(create_group))
        .route(
            "/groups/:group_id",
            get(get_group).put(update_group).delete(delete_group),
        )
        .route("/groups/:group_id/members", post(create_group_member))
        .route("/groups/:group_id/members/:user_id", delete(delete_group_member))
        .with_state(service)
}

async fn create_group(
    State(service): State<GroupService>,
    Extension(session): Extension<Session>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let group = service.create(&session, Group::from_json(&body)).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

async fn get_group(
    State(service): State<GroupService>,
    Extension(session): Extension<Session>,
    Path(group_id): Path<String>,
) -> Result<Json<Group>, AppError> {
    Ok(Json(service.get(&session, &group_id).await?))
}

async fn get_groups(
    State(service): State<GroupService>,
    Extension(session): Extension<Session>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Vec<Group>>, AppError> {
    let Query(params) = params.map_err(|_| AppError::invalid_param("page"))?;
    Ok(Json(service.list(&session, params.page, params.per_page).await?))
}

async fn update_group(
    State(service): State<GroupService>,
    Extension(session): Extension<Session>,
    Path(group_id): Path<String>,
    body: Bytes,
) -> Result<Json<Group>, AppError> {
    Ok(Json(service.update(&session, &group_id, Group::from_json(&body)).await?))
}

async fn delete_group(
    State(service): State<GroupService>,
    Extension(session): Extension<Session>,
    Path(group_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    service.delete(&session, &group_id).await?;
    Ok(status_ok())
}

// Членство в группе пока не материализуется
async fn create_group_member() -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}

async fn delete_group_member() -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}
