// tests/integration/groups.rs

use axum::http::{header::AUTHORIZATION, StatusCode};
use serde_json::{json, Value};

use crate::common::{self, create_group, group_body};

#[tokio::test]
async fn test_create_group() {
    let t = common::spawn(true);
    let mut audit = t.app.events.subscribe();

    let body = json!({
        "name": "eng",
        "display_name": "Engineering",
        "type": "ldap",
        "remote_id": "cn=eng,dc=x",
    });
    let response = t
        .server
        .post("/api/v4/groups")
        .add_header(AUTHORIZATION, t.admin.clone())
        .json(&body)
        .await;

    response.assert_status(StatusCode::CREATED);
    let group = response.json::<Value>();
    assert_eq!(group["id"].as_str().unwrap().len(), 26);
    assert!(group["create_at"].as_i64().unwrap() > 0);
    assert_eq!(group["delete_at"], 0);
    assert_eq!(group["name"], "eng");

    let event = audit.recv().await.unwrap();
    assert_eq!(event.action, "group.create");
    assert_eq!(event.actor_id.as_deref(), Some("admin-user"));
}

#[tokio::test]
async fn test_create_group_without_license() {
    let t = common::spawn(false);

    let response = t
        .server
        .post("/api/v4/groups")
        .add_header(AUTHORIZATION, t.admin.clone())
        .json(&group_body("eng"))
        .await;

    response.assert_status(StatusCode::NOT_IMPLEMENTED);
    let error = response.json::<Value>();
    assert_eq!(error["id"], "api.group.create_group.license.error");
    assert_eq!(error["status_code"], 501);

    // Чтение лицензии не требует, записи не появилось
    let list = t
        .server
        .get("/api/v4/groups")
        .add_header(AUTHORIZATION, t.admin.clone())
        .await;
    list.assert_status_ok();
    assert_eq!(list.json::<Vec<Value>>().len(), 0);
}

#[tokio::test]
async fn test_create_group_missing_remote_id() {
    let t = common::spawn(true);

    let mut body = group_body("eng");
    body["remote_id"] = json!("");
    let response = t
        .server
        .post("/api/v4/groups")
        .add_header(AUTHORIZATION, t.admin.clone())
        .json(&body)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["id"], "model.group.remote_id.app_error");

    let list = t
        .server
        .get("/api/v4/groups")
        .add_header(AUTHORIZATION, t.admin.clone())
        .await;
    assert_eq!(list.json::<Vec<Value>>().len(), 0);
}

#[tokio::test]
async fn test_create_group_bad_body() {
    let t = common::spawn(true);

    let response = t
        .server
        .post("/api/v4/groups")
        .add_header(AUTHORIZATION, t.admin.clone())
        .text("not json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["id"], "api.context.invalid_param.app_error");
}

#[tokio::test]
async fn test_create_group_requires_permission() {
    let t = common::spawn(true);

    let response = t
        .server
        .post("/api/v4/groups")
        .add_header(AUTHORIZATION, t.user.clone())
        .json(&group_body("eng"))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_duplicate_group_name() {
    let t = common::spawn(true);
    create_group(&t, "eng").await;

    let response = t
        .server
        .post("/api/v4/groups")
        .add_header(AUTHORIZATION, t.admin.clone())
        .json(&group_body("eng"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_missing_group() {
    let t = common::spawn(true);

    let response = t
        .server
        .get(&format!("/api/v4/groups/{}", nextgroups::models::new_id()))
        .add_header(AUTHORIZATION, t.admin.clone())
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_group_bad_id() {
    let t = common::spawn(true);

    let response = t
        .server
        .get("/api/v4/groups/short")
        .add_header(AUTHORIZATION, t.admin.clone())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_skips_deleted_groups() {
    let t = common::spawn(true);
    let a = create_group(&t, "a").await;
    let b = create_group(&t, "b").await;
    let c = create_group(&t, "c").await;

    t.server
        .delete(&format!("/api/v4/groups/{}", b["id"].as_str().unwrap()))
        .add_header(AUTHORIZATION, t.admin.clone())
        .await
        .assert_status_ok();

    let response = t
        .server
        .get("/api/v4/groups")
        .add_query_param("page", 0)
        .add_query_param("per_page", 10)
        .add_header(AUTHORIZATION, t.admin.clone())
        .await;

    response.assert_status_ok();
    let ids: Vec<Value> = response
        .json::<Vec<Value>>()
        .into_iter()
        .map(|g| g["id"].clone())
        .collect();
    assert_eq!(ids, vec![a["id"].clone(), c["id"].clone()]);
}

#[tokio::test]
async fn test_list_bad_paging() {
    let t = common::spawn(true);

    let response = t
        .server
        .get("/api/v4/groups")
        .add_query_param("page", "first")
        .add_header(AUTHORIZATION, t.admin.clone())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_group() {
    let t = common::spawn(true);
    let mut group = create_group(&t, "eng").await;
    let id = group["id"].as_str().unwrap().to_string();

    group["display_name"] = json!("Engineering");
    let response = t
        .server
        .put(&format!("/api/v4/groups/{}", id))
        .add_header(AUTHORIZATION, t.admin.clone())
        .json(&group)
        .await;

    response.assert_status_ok();
    let updated = response.json::<Value>();
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["display_name"], "Engineering");
    assert_eq!(updated["create_at"], group["create_at"]);
}

#[tokio::test]
async fn test_delete_group_twice() {
    let t = common::spawn(true);
    let group = create_group(&t, "eng").await;
    let path = format!("/api/v4/groups/{}", group["id"].as_str().unwrap());

    let response = t.server.delete(&path).add_header(AUTHORIZATION, t.admin.clone()).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "status": "OK" }));

    // Удалённая группа по-прежнему читается, с отметкой удаления
    let fetched = t.server.get(&path).add_header(AUTHORIZATION, t.admin.clone()).await;
    fetched.assert_status_ok();
    assert!(fetched.json::<Value>()["delete_at"].as_i64().unwrap() > 0);

    t.server
        .delete(&path)
        .add_header(AUTHORIZATION, t.admin.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_requires_token() {
    let t = common::spawn(true);

    t.server.get("/api/v4/groups").await.assert_status(StatusCode::UNAUTHORIZED);

    t.server
        .get("/api/v4/groups")
        .add_header(AUTHORIZATION, axum::http::HeaderValue::from_static("Bearer garbage"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_member_routes_not_implemented() {
    let t = common::spawn(true);
    let group = create_group(&t, "eng").await;
    let id = group["id"].as_str().unwrap();

    t.server
        .post(&format!("/api/v4/groups/{}/members", id))
        .add_header(AUTHORIZATION, t.admin.clone())
        .await
        .assert_status(StatusCode::NOT_IMPLEMENTED);

    t.server
        .delete(&format!("/api/v4/groups/{}/members/{}", id, nextgroups::models::new_id()))
        .add_header(AUTHORIZATION, t.admin.clone())
        .await
        .assert_status(StatusCode::NOT_IMPLEMENTED);
}
