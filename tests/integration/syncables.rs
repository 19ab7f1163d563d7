// tests/integration/syncables.rs

use axum::http::{header::AUTHORIZATION, StatusCode};
use nextgroups::models::new_id;
use serde_json::{json, Value};

use crate::common::{self, create_group};

#[tokio::test]
async fn test_link_team() {
    let t = common::spawn(true);
    let group = create_group(&t, "eng").await;
    let group_id = group["id"].as_str().unwrap();
    let team_id = new_id();

    let response = t
        .server
        .post(&format!("/api/v4/groups/{}/teams", group_id))
        .add_header(AUTHORIZATION, t.admin.clone())
        .json(&json!({ "syncable_id": team_id, "auto_add": true }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let syncable = response.json::<Value>();
    assert_eq!(syncable["group_id"], group_id);
    assert_eq!(syncable["syncable_id"], team_id.as_str());
    assert_eq!(syncable["type"], "Team");
    assert_eq!(syncable["auto_add"], true);
    assert!(syncable["create_at"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_duplicate_team_link() {
    let t = common::spawn(true);
    let group = create_group(&t, "eng").await;
    let path = format!("/api/v4/groups/{}/teams", group["id"].as_str().unwrap());
    let body = json!({ "syncable_id": new_id(), "auto_add": false });

    t.server
        .post(&path)
        .add_header(AUTHORIZATION, t.admin.clone())
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);

    t.server
        .post(&path)
        .add_header(AUTHORIZATION, t.admin.clone())
        .json(&body)
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_type_comes_from_route() {
    let t = common::spawn(true);
    let group = create_group(&t, "eng").await;
    let group_id = group["id"].as_str().unwrap();
    let id = new_id();

    // Поле type в теле не влияет на тип привязки
    let response = t
        .server
        .post(&format!("/api/v4/groups/{}/channels", group_id))
        .add_header(AUTHORIZATION, t.admin.clone())
        .json(&json!({ "syncable_id": id, "auto_add": true, "type": "Team" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["type"], "Channel");

    // Тот же id как команда: отдельная привязка, не конфликт
    t.server
        .post(&format!("/api/v4/groups/{}/teams", group_id))
        .add_header(AUTHORIZATION, t.admin.clone())
        .json(&json!({ "syncable_id": id, "auto_add": false }))
        .await
        .assert_status(StatusCode::CREATED);

    let teams = t
        .server
        .get(&format!("/api/v4/groups/{}/teams", group_id))
        .add_header(AUTHORIZATION, t.admin.clone())
        .await
        .json::<Vec<Value>>();
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0]["type"], "Team");

    t.server
        .get(&format!("/api/v4/groups/{}/teams/{}", group_id, new_id()))
        .add_header(AUTHORIZATION, t.admin.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_link_to_missing_group() {
    let t = common::spawn(true);

    t.server
        .post(&format!("/api/v4/groups/{}/teams", new_id()))
        .add_header(AUTHORIZATION, t.admin.clone())
        .json(&json!({ "syncable_id": new_id(), "auto_add": true }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_link_bad_syncable_id() {
    let t = common::spawn(true);
    let group = create_group(&t, "eng").await;

    let response = t
        .server
        .post(&format!("/api/v4/groups/{}/channels", group["id"].as_str().unwrap()))
        .add_header(AUTHORIZATION, t.admin.clone())
        .json(&json!({ "syncable_id": "nope", "auto_add": true }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_link_requires_permission() {
    let t = common::spawn(true);
    let group = create_group(&t, "eng").await;

    t.server
        .post(&format!("/api/v4/groups/{}/teams", group["id"].as_str().unwrap()))
        .add_header(AUTHORIZATION, t.user.clone())
        .json(&json!({ "syncable_id": new_id(), "auto_add": true }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_and_unlink_channel() {
    let t = common::spawn(true);
    let group = create_group(&t, "eng").await;
    let group_id = group["id"].as_str().unwrap();
    let channel_id = new_id();
    let collection = format!("/api/v4/groups/{}/channels", group_id);
    let item = format!("{}/{}", collection, channel_id);

    t.server
        .post(&collection)
        .add_header(AUTHORIZATION, t.admin.clone())
        .json(&json!({ "syncable_id": channel_id, "auto_add": false }))
        .await
        .assert_status(StatusCode::CREATED);

    let updated = t
        .server
        .put(&item)
        .add_header(AUTHORIZATION, t.admin.clone())
        .json(&json!({ "auto_add": true }))
        .await;
    updated.assert_status_ok();
    assert_eq!(updated.json::<Value>()["auto_add"], true);

    t.server
        .delete(&item)
        .add_header(AUTHORIZATION, t.admin.clone())
        .await
        .assert_status_ok();

    let list = t
        .server
        .get(&collection)
        .add_header(AUTHORIZATION, t.admin.clone())
        .await
        .json::<Vec<Value>>();
    assert!(list.is_empty());

    t.server
        .delete(&item)
        .add_header(AUTHORIZATION, t.admin.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_link_license_policy() {
    let mut config = common::config(false);
    config.syncables.require_license = true;
    let t = common::spawn_with(config);

    // Без лицензии группу не создать, поэтому гейт срабатывает раньше поиска группы
    t.server
        .post(&format!("/api/v4/groups/{}/teams", new_id()))
        .add_header(AUTHORIZATION, t.admin.clone())
        .json(&json!({ "syncable_id": new_id(), "auto_add": true }))
        .await
        .assert_status(StatusCode::NOT_IMPLEMENTED);
}
