//! End-to-end tests for the task, team, user, and admin endpoints.

use calira_server::config::AppConfig;
use serde_json::{json, Value};

mod common;

use common::{register_user, spawn_app, TestApp};

async fn create_team(app: &TestApp, token: &str, name: &str) -> i64 {
    let res = app
        .client
        .post(app.url("/api/teams"))
        .bearer_auth(token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let body: Value = res.json().await.unwrap();
    body["team"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_registration_provisions_default_teams() {
    let app = spawn_app(AppConfig::default()).await;
    let (token, _) = register_user(&app, "fresh@example.com").await;

    let res = app
        .client
        .get(app.url("/api/teams"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    let names: Vec<&str> = body["teams"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Home", "Today"]);
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let app = spawn_app(AppConfig::default()).await;
    register_user(&app, "dup@example.com").await;

    let res = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({ "email": "dup@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "User with this email already exists");
}

#[tokio::test]
async fn test_login_issues_fresh_token() {
    let app = spawn_app(AppConfig::default()).await;
    let (first_token, _) = register_user(&app, "login@example.com").await;

    let res = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": "login@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    let second_token = body["token"].as_str().unwrap();
    assert_ne!(first_token, second_token);

    // Unknown email cannot sign in.
    let res = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": "nobody@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
}

#[tokio::test]
async fn test_task_crud_round_trip() {
    let app = spawn_app(AppConfig::default()).await;
    let (token, _) = register_user(&app, "crud@example.com").await;
    let team_id = create_team(&app, &token, "Work").await;

    // Create
    let res = app
        .client
        .post(app.url("/api/tasks"))
        .bearer_auth(&token)
        .json(&json!({ "title": "write report", "team_id": team_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let body: Value = res.json().await.unwrap();
    let task_id = body["task"]["id"].as_i64().unwrap();
    assert_eq!(body["task"]["completed"], false);
    assert!(body["task"]["completed_at"].is_null());

    // Complete it: completed_at appears.
    let res = app
        .client
        .put(app.url("/api/tasks"))
        .bearer_auth(&token)
        .json(&json!({ "id": task_id, "completed": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["task"]["completed"], true);
    assert!(body["task"]["completed_at"].is_string());

    // Reopen it: completed_at is cleared with the flag.
    let res = app
        .client
        .put(app.url("/api/tasks"))
        .bearer_auth(&token)
        .json(&json!({ "id": task_id, "completed": false }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert!(body["task"]["completed_at"].is_null());

    // Delete
    let res = app
        .client
        .delete(app.url(&format!("/api/tasks?id={task_id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = app
        .client
        .get(app.url("/api/tasks"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["tasks"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_task_in_foreign_team_rejected() {
    let app = spawn_app(AppConfig::default()).await;
    let (token_a, _) = register_user(&app, "owner@example.com").await;
    let (token_b, _) = register_user(&app, "intruder@example.com").await;
    let team_a = create_team(&app, &token_a, "Private").await;

    let res = app
        .client
        .post(app.url("/api/tasks"))
        .bearer_auth(&token_b)
        .json(&json!({ "title": "sneak in", "team_id": team_a }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Team not found or access denied");
}

#[tokio::test]
async fn test_foreign_task_update_looks_like_missing() {
    let app = spawn_app(AppConfig::default()).await;
    let (token_a, _) = register_user(&app, "victim@example.com").await;
    let (token_b, _) = register_user(&app, "snoop@example.com").await;
    let team_a = create_team(&app, &token_a, "Mine").await;

    let res = app
        .client
        .post(app.url("/api/tasks"))
        .bearer_auth(&token_a)
        .json(&json!({ "title": "secret", "team_id": team_a }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    let task_id = body["task"]["id"].as_i64().unwrap();

    let res = app
        .client
        .put(app.url("/api/tasks"))
        .bearer_auth(&token_b)
        .json(&json!({ "id": task_id, "title": "defaced" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn test_custom_team_cap() {
    let app = spawn_app(AppConfig::default()).await;
    let (token, _) = register_user(&app, "hoarder@example.com").await;

    for i in 0..10 {
        create_team(&app, &token, &format!("Team {i}")).await;
    }

    let res = app
        .client
        .post(app.url("/api/teams"))
        .bearer_auth(&token)
        .json(&json!({ "name": "One too many" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Team limit reached");
}

#[tokio::test]
async fn test_team_delete_cascades_tasks() {
    let app = spawn_app(AppConfig::default()).await;
    let (token, _) = register_user(&app, "cascade@example.com").await;
    let team_id = create_team(&app, &token, "Doomed").await;

    for title in ["one", "two"] {
        let res = app
            .client
            .post(app.url("/api/tasks"))
            .bearer_auth(&token)
            .json(&json!({ "title": title, "team_id": team_id }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 201);
    }

    let res = app
        .client
        .delete(app.url(&format!("/api/teams?id={team_id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = app
        .client
        .get(app.url("/api/tasks"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["tasks"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_default_teams_not_deletable() {
    let app = spawn_app(AppConfig::default()).await;
    let (token, _) = register_user(&app, "keeper@example.com").await;

    let res = app
        .client
        .get(app.url("/api/teams"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    let home_id = body["teams"][0]["id"].as_i64().unwrap();

    let res = app
        .client
        .delete(app.url(&format!("/api/teams?id={home_id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);
}

#[tokio::test]
async fn test_me_reports_profile_and_task_count() {
    let app = spawn_app(AppConfig::default()).await;
    let (token, user_id) = register_user(&app, "profile@example.com").await;
    let team_id = create_team(&app, &token, "Work").await;

    app.client
        .post(app.url("/api/tasks"))
        .bearer_auth(&token)
        .json(&json!({ "title": "solo task", "team_id": team_id }))
        .send()
        .await
        .unwrap();

    let res = app
        .client
        .get(app.url("/api/user/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["id"], user_id.as_str());
    assert_eq!(body["email"], "profile@example.com");
    // Default name is the email prefix.
    assert_eq!(body["name"], "profile");
    assert_eq!(body["task_count"], 1);
}

#[tokio::test]
async fn test_admin_requires_api_key() {
    let mut config = AppConfig::default();
    config.admin.enabled = true;
    config.admin.api_key = "test-admin-key".to_string();
    let app = spawn_app(config).await;

    let res = app
        .client
        .get(app.url("/admin/status"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    let res = app
        .client
        .get(app.url("/admin/status"))
        .bearer_auth("test-admin-key")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "operational");

    let res = app
        .client
        .get(app.url("/admin/rate-limit"))
        .bearer_auth("test-admin-key")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["max_requests"], 50);
    assert_eq!(body["window_ms"], 60_000);
}
