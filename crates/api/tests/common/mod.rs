#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use taskkeep_api::auth::jwt::{JwtConfig, TokenIssuer};
use taskkeep_api::auth::password::PasswordHashing;
use taskkeep_api::config::{AppEnv, CorsOrigins, ServerConfig};
use taskkeep_api::middleware::auth::AUTH_TOKEN_HEADER;
use taskkeep_api::router::build_app_router;
use taskkeep_api::state::AppState;
use taskkeep_db::error::UQ_USERS_EMAIL;
use taskkeep_db::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use taskkeep_db::models::user::{CreateUser, UpdateUser, User};
use taskkeep_db::{MemoryStore, StoreError, TaskStore, UserStore};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a known signing secret, and the cheapest Argon2 parameters so hashing
/// does not dominate test time.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: CorsOrigins::List(vec!["http://localhost:5173".parse().unwrap()]),
        request_timeout_secs: 30,
        app_env: AppEnv::Development,
        database_url: None,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
        password_hashing: PasswordHashing {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        },
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// The store is returned too so tests can inspect what reached persistence.
pub fn build_test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::with_store(test_config(), store.clone());
    (build_app_router(state), store)
}

/// Sign a token for `user_id` with the test secret.
pub fn token_for(user_id: i64) -> String {
    TokenIssuer::new(&test_config().jwt)
        .issue(user_id)
        .unwrap()
        .token
}

// ---------------------------------------------------------------------------
// Race-losing store
// ---------------------------------------------------------------------------

/// Email lookups never find a holder, but every user write then collides
/// with `uq_users_email`, as when a concurrent request claims the email
/// between the lookup and the write.
#[derive(Default)]
pub struct RaceLosingStore {
    pub tasks: MemoryStore,
}

impl RaceLosingStore {
    pub fn new() -> Self {
        Self {
            tasks: MemoryStore::new(),
        }
    }
}

fn email_taken() -> StoreError {
    StoreError::UniqueViolation {
        constraint: UQ_USERS_EMAIL.to_string(),
    }
}

#[async_trait]
impl UserStore for RaceLosingStore {
    async fn create_user(&self, _input: &CreateUser) -> Result<User, StoreError> {
        Err(email_taken())
    }

    async fn find_user_by_id(&self, _id: i64) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn find_user_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn update_user(&self, _id: i64, _input: &UpdateUser) -> Result<Option<User>, StoreError> {
        Err(email_taken())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl TaskStore for RaceLosingStore {
    async fn create_task(&self, owner_id: i64, input: &CreateTask) -> Result<Task, StoreError> {
        self.tasks.create_task(owner_id, input).await
    }

    async fn find_task_by_id(&self, id: i64) -> Result<Option<Task>, StoreError> {
        self.tasks.find_task_by_id(id).await
    }

    async fn list_tasks(&self, owner_id: i64, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        self.tasks.list_tasks(owner_id, filter).await
    }

    async fn update_task(
        &self,
        id: i64,
        owner_id: i64,
        input: &UpdateTask,
    ) -> Result<Option<Task>, StoreError> {
        self.tasks.update_task(id, owner_id, input).await
    }

    async fn delete_task(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        self.tasks.delete_task(id, owner_id).await
    }
}

/// Full router over a [`RaceLosingStore`].
pub fn build_race_losing_app() -> Router {
    let state = AppState::with_store(test_config(), Arc::new(RaceLosingStore::new()));
    build_app_router(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

fn builder(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(AUTH_TOKEN_HEADER, token),
        None => builder,
    }
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let request = builder("GET", uri, token).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let request = builder("DELETE", uri, token).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let request = builder("POST", uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let request = builder("PUT", uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the parsed body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    let actual = response.status();
    let json = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {json}");
    json
}

/// Register a user through the API and return `(token, user_id)`.
pub async fn register(app: &Router, name: &str, email: &str, password: &str) -> (String, i64) {
    let body = serde_json::json!({ "name": name, "email": email, "password": password });
    let json = expect_json(
        post_json(app, "/api/auth/register", None, body).await,
        StatusCode::OK,
    )
    .await;
    let token = json["token"].as_str().unwrap().to_string();
    let id = json["user"]["id"].as_i64().unwrap();
    (token, id)
}

/// Create a task through the API and return its JSON.
pub async fn create_task(app: &Router, token: &str, body: serde_json::Value) -> serde_json::Value {
    let json = expect_json(
        post_json(app, "/api/tasks", Some(token), body).await,
        StatusCode::OK,
    )
    .await;
    json["task"].clone()
}
