//! Todo route handlers.
//!
//! Each handler performs exactly one storage operation and maps its outcome
//! to a status code; all failures go through [`ApiError`].

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::{NewTodo, Todo};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// POST /api/todo payload. Any other field is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub store: &'static str,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store: state.store.backend(),
    })
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.store.list().await?;
    Ok(Json(todos))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state.store.get(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(todo))
}

pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected todo payload");
        // Bodies without a content-length only hit the size limit while being read.
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BodyRequired
        }
    })?;

    let new = NewTodo::new(request.body)?;
    let todo = state.store.create(new).await?;

    tracing::info!(id = %todo.id, "Todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// PUT /api/todo/{id}: marks the todo completed. The request body is ignored.
pub async fn complete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state.store.complete(&id).await?.ok_or(ApiError::NotFound)?;
    tracing::info!(id = %todo.id, "Todo completed");
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state.store.delete(&id).await?.ok_or(ApiError::NotFound)?;
    tracing::info!(id = %todo.id, "Todo deleted");
    Ok(Json(todo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::http::server::build_router;
    use crate::store::{MemoryStore, StoreError, StoreResult, TodoStore};
    use async_trait::async_trait;
    use axum::{
        body::{self, Body},
        http::Request,
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    fn app_with_store(store: Arc<dyn TodoStore>) -> Router {
        build_router(&ServiceConfig::default(), AppState::new(store))
    }

    fn app() -> Router {
        app_with_store(Arc::new(MemoryStore::new()))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let (status, json) = send(&app(), "GET", "/api/todo", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_lifecycle_example() {
        let app = app();

        let (status, created) = send(&app, "POST", "/api/todo", Some(r#"{"body":"buy milk"}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created, serde_json::json!({"id": 1, "completed": false, "body": "buy milk"}));

        let (status, fetched) = send(&app, "GET", "/api/todo/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, completed) = send(&app, "PUT", "/api/todo/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(completed["completed"], true);

        let (status, deleted) = send(&app, "DELETE", "/api/todo/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["id"], 1);

        let (status, missing) = send(&app, "GET", "/api/todo/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing, serde_json::json!({"error": "Todo is not found"}));
    }

    #[tokio::test]
    async fn test_create_rejects_missing_or_empty_body() {
        let app = app();

        for payload in [r#"{"body":""}"#, r#"{}"#, "not json", r#"{"body":null}"#] {
            let (status, json) = send(&app, "POST", "/api/todo", Some(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {:?}", payload);
            assert_eq!(json, serde_json::json!({"error": "Todo body is required"}));
        }

        let (status, _) = send(&app, "POST", "/api/todo", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, list) = send(&app, "GET", "/api/todo", None).await;
        assert_eq!(list, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_create_ignores_client_completed_flag() {
        let app = app();
        let (status, json) = send(
            &app,
            "POST",
            "/api/todo",
            Some(r#"{"body":"sneaky","completed":true,"id":99}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["completed"], false);
        assert_eq!(json["id"], 1);
    }

    #[tokio::test]
    async fn test_complete_ignores_body_and_is_idempotent() {
        let app = app();
        send(&app, "POST", "/api/todo", Some(r#"{"body":"task"}"#)).await;

        for _ in 0..2 {
            let (status, json) = send(&app, "PUT", "/api/todo/1", Some(r#"{"completed":false}"#)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["completed"], true);
        }
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let app = app();

        for method in ["GET", "PUT", "DELETE"] {
            let (status, json) = send(&app, method, "/api/todo/42", None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", method);
            assert_eq!(json["error"], "Todo is not found");
        }
    }

    #[tokio::test]
    async fn test_malformed_ids_are_bad_requests() {
        let app = app();

        for method in ["GET", "PUT", "DELETE"] {
            let (status, json) = send(&app, method, "/api/todo/abc", None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", method);
            assert_eq!(json["error"], "Invalid todo id: abc");
        }
    }

    #[tokio::test]
    async fn test_list_counts_after_creates_and_deletes() {
        let app = app();
        for i in 0..5 {
            let body = format!(r#"{{"body":"item {}"}}"#, i);
            send(&app, "POST", "/api/todo", Some(&body)).await;
        }
        send(&app, "DELETE", "/api/todo/2", None).await;
        send(&app, "DELETE", "/api/todo/4", None).await;

        let (_, list) = send(&app, "GET", "/api/todo", None).await;
        let ids: Vec<u64> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[tokio::test]
    async fn test_health_reports_store() {
        let (status, json) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["store"], "memory");
    }

    struct UnreachableStore;

    #[async_trait]
    impl TodoStore for UnreachableStore {
        fn backend(&self) -> &'static str {
            "unreachable"
        }
        async fn list(&self) -> StoreResult<Vec<Todo>> {
            Err(StoreError::Backend("server selection timeout".into()))
        }
        async fn get(&self, _id: &str) -> StoreResult<Option<Todo>> {
            Err(StoreError::Backend("server selection timeout".into()))
        }
        async fn create(&self, _new: NewTodo) -> StoreResult<Todo> {
            Err(StoreError::Backend("server selection timeout".into()))
        }
        async fn complete(&self, _id: &str) -> StoreResult<Option<Todo>> {
            Err(StoreError::Backend("server selection timeout".into()))
        }
        async fn delete(&self, _id: &str) -> StoreResult<Option<Todo>> {
            Err(StoreError::Backend("server selection timeout".into()))
        }
    }

    #[tokio::test]
    async fn test_storage_failures_are_internal_errors() {
        let app = app_with_store(Arc::new(UnreachableStore));

        let (status, json) = send(&app, "GET", "/api/todo", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Internal server error");

        let (status, _) = send(&app, "POST", "/api/todo", Some(r#"{"body":"x"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
