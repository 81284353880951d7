//! HTTP-level tests for the `/tasks` resource and its ownership guard.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{create_task, delete, expect_json, get, post_json, put_json, register};
use serde_json::json;
use taskkeep_api::router::build_app_router;
use taskkeep_api::state::AppState;
use taskkeep_db::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use taskkeep_db::models::user::{CreateUser, UpdateUser, User};
use taskkeep_db::{MemoryStore, StoreError, TaskStore, UserStore};

// ---------------------------------------------------------------------------
// End-to-end flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_login_and_create_first_task() {
    let (app, _store) = common::build_test_app();

    let (first_token, alice_id) = register(&app, "Alice", "a@x.com", "secret1").await;
    assert!(!first_token.is_empty());

    let login = expect_json(
        post_json(
            &app,
            "/api/auth/login",
            None,
            json!({ "email": "a@x.com", "password": "secret1" }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let token = login["token"].as_str().unwrap().to_string();

    let json = expect_json(get(&app, "/api/tasks", Some(&token)).await, StatusCode::OK).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["tasks"], json!([]));

    let task = create_task(&app, &token, json!({ "title": "Buy milk" })).await;
    assert_eq!(task["title"], "Buy milk");
    assert_eq!(task["ownerId"], alice_id);
    assert_eq!(task["status"], "pending");
    assert!(task["createdAt"].is_string());
}

#[tokio::test]
async fn another_user_cannot_touch_the_task() {
    let (app, store) = common::build_test_app();
    let (alice, _) = register(&app, "Alice", "a@x.com", "secret1").await;
    let (bob, _) = register(&app, "Bob", "b@x.com", "secret2").await;

    let task = create_task(&app, &alice, json!({ "title": "Buy milk" })).await;
    let uri = format!("/api/tasks/{}", task["id"]);

    let responses = [
        get(&app, &uri, Some(&bob)).await,
        put_json(&app, &uri, Some(&bob), json!({ "title": "Hijacked" })).await,
        delete(&app, &uri, Some(&bob)).await,
    ];
    for response in responses {
        let json = expect_json(response, StatusCode::FORBIDDEN).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "User not authorized");
        assert!(json.get("task").is_none());
    }

    // Alice's task is untouched.
    let json = expect_json(get(&app, &uri, Some(&alice)).await, StatusCode::OK).await;
    assert_eq!(json["task"], task);
    assert_eq!(store.task_count().await, 1);

    // And Bob's list never shows it.
    let json = expect_json(get(&app, "/api/tasks", Some(&bob)).await, StatusCode::OK).await;
    assert_eq!(json["tasks"], json!([]));
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn owner_can_update_and_delete() {
    let (app, store) = common::build_test_app();
    let (token, _) = register(&app, "Alice", "a@x.com", "secret1").await;
    let task = create_task(
        &app,
        &token,
        json!({ "title": "Buy milk", "description": "2 litres" }),
    )
    .await;
    let uri = format!("/api/tasks/{}", task["id"]);

    let json = expect_json(
        put_json(&app, &uri, Some(&token), json!({ "status": "in-progress" })).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["task"]["status"], "in-progress");
    assert_eq!(json["task"]["title"], "Buy milk");
    assert_eq!(json["task"]["description"], "2 litres");

    let json = expect_json(delete(&app, &uri, Some(&token)).await, StatusCode::OK).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Task removed");
    assert_eq!(store.task_count().await, 0);

    let json = expect_json(get(&app, &uri, Some(&token)).await, StatusCode::NOT_FOUND).await;
    assert_eq!(json["message"], "Task not found");
}

#[tokio::test]
async fn create_requires_a_title() {
    let (app, store) = common::build_test_app();
    let (token, _) = register(&app, "Alice", "a@x.com", "secret1").await;

    let json = expect_json(
        post_json(&app, "/api/tasks", Some(&token), json!({ "title": "   " })).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["errors"][0]["field"], "title");
    assert_eq!(json["errors"][0]["message"], "Title is required");
    assert_eq!(store.task_count().await, 0);
}

#[tokio::test]
async fn invalid_status_is_rejected() {
    let (app, _store) = common::build_test_app();
    let (token, _) = register(&app, "Alice", "a@x.com", "secret1").await;

    let json = expect_json(
        post_json(
            &app,
            "/api/tasks",
            Some(&token),
            json!({ "title": "Buy milk", "status": "done" }),
        )
        .await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let task = create_task(&app, &token, json!({ "title": "Buy milk" })).await;
    let uri = format!("/api/tasks/{}", task["id"]);
    let response = put_json(&app, &uri, Some(&token), json!({ "title": "" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_404() {
    let (app, _store) = common::build_test_app();
    let (token, _) = register(&app, "Alice", "a@x.com", "secret1").await;

    for uri in ["/api/tasks/999", "/api/tasks/not-a-number", "/api/tasks/-4"] {
        let json = expect_json(get(&app, uri, Some(&token)).await, StatusCode::NOT_FOUND).await;
        assert_eq!(json["message"], "Task not found");
    }
}

#[tokio::test]
async fn list_filters_by_status_and_search() {
    let (app, _store) = common::build_test_app();
    let (token, _) = register(&app, "Alice", "a@x.com", "secret1").await;

    create_task(&app, &token, json!({ "title": "Buy milk" })).await;
    create_task(&app, &token, json!({ "title": "Walk dog", "status": "completed" })).await;
    create_task(&app, &token, json!({ "title": "Buy MILK again" })).await;

    let json = expect_json(get(&app, "/api/tasks", Some(&token)).await, StatusCode::OK).await;
    let titles: Vec<&str> = json["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Buy MILK again", "Walk dog", "Buy milk"]);

    let json = expect_json(
        get(&app, "/api/tasks?search=milk", Some(&token)).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["tasks"].as_array().unwrap().len(), 2);

    let json = expect_json(
        get(&app, "/api/tasks?status=completed&search=", Some(&token)).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(json["tasks"][0]["title"], "Walk dog");

    let response = get(&app, "/api/tasks?status=archived", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unparsable_query_uses_the_error_envelope() {
    let (app, _store) = common::build_test_app();
    let (token, _) = register(&app, "Alice", "a@x.com", "secret1").await;

    let json = expect_json(
        get(&app, "/api/tasks?status=pending&status=completed", Some(&token)).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["errors"].is_array());
}

// ---------------------------------------------------------------------------
// Identity before persistence
// ---------------------------------------------------------------------------

/// Counts every store call before delegating to an in-memory store.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for CountingStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        self.hit();
        self.inner.create_user(input).await
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.hit();
        self.inner.find_user_by_id(id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.hit();
        self.inner.find_user_by_email(email).await
    }

    async fn update_user(&self, id: i64, input: &UpdateUser) -> Result<Option<User>, StoreError> {
        self.hit();
        self.inner.update_user(id, input).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.hit();
        Ok(())
    }
}

#[async_trait]
impl TaskStore for CountingStore {
    async fn create_task(&self, owner_id: i64, input: &CreateTask) -> Result<Task, StoreError> {
        self.hit();
        self.inner.create_task(owner_id, input).await
    }

    async fn find_task_by_id(&self, id: i64) -> Result<Option<Task>, StoreError> {
        self.hit();
        self.inner.find_task_by_id(id).await
    }

    async fn list_tasks(&self, owner_id: i64, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        self.hit();
        self.inner.list_tasks(owner_id, filter).await
    }

    async fn update_task(
        &self,
        id: i64,
        owner_id: i64,
        input: &UpdateTask,
    ) -> Result<Option<Task>, StoreError> {
        self.hit();
        self.inner.update_task(id, owner_id, input).await
    }

    async fn delete_task(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        self.hit();
        self.inner.delete_task(id, owner_id).await
    }
}

#[tokio::test]
async fn bad_tokens_are_rejected_before_any_store_access() {
    let store = Arc::new(CountingStore::default());
    let app = build_app_router(AppState::with_store(common::test_config(), store.clone()));

    for token in [None, Some("garbage"), Some("a.b.c")] {
        let responses = [
            get(&app, "/api/tasks", token).await,
            get(&app, "/api/tasks/1", token).await,
            post_json(&app, "/api/tasks", token, json!({ "title": "x" })).await,
            put_json(&app, "/api/tasks/1", token, json!({ "title": "x" })).await,
            delete(&app, "/api/tasks/1", token).await,
            get(&app, "/api/profile", token).await,
        ];
        for response in responses {
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}
