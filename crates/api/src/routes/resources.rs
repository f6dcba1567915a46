//! Resource routes: metadata, download and folder listing.

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State, rejection::JsonRejection},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use futures::StreamExt;
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::{error, info, warn};

use bucketfront_core::resource::{ListResult, Resource};
use bucketfront_core::storage::ObjectStore;
use bucketfront_shared::AppError;

use crate::{AppState, error::ApiError};

/// Creates the resource routes.
pub fn routes<S: ObjectStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/file", post(download_file::<S>))
        .route("/resource", get(get_resource::<S>))
        .route("/listFolder", get(list_folder::<S>))
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for `GET /resource`.
#[derive(Debug, Deserialize)]
pub struct ResourceQuery {
    /// Object key.
    pub id: String,
}

/// Query parameters for `GET /listFolder`.
#[derive(Debug, Deserialize)]
pub struct ListFolderQuery {
    /// Cursor returned by the previous page.
    #[serde(default)]
    pub cursor: Option<String>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse the optional `Resource` body of a listing request.
///
/// A blank body means "no resource".
fn parse_optional_resource(body: &[u8]) -> Result<Option<Resource>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice(body).map(Some).map_err(|e| {
        warn!(error = %e, "Rejected listing body");
        ApiError::from(AppError::invalid_argument(
            "Request body is not a valid resource.",
        ))
    })
}

/// Unwrap a required `Resource` body, reporting any rejection as a bad request.
fn require_resource(body: Result<Json<Resource>, JsonRejection>) -> Result<Resource, ApiError> {
    body.map(|Json(resource)| resource).map_err(|rejection| {
        warn!(error = %rejection, "Rejected download body");
        ApiError::from(AppError::invalid_argument(
            "Request body is not a valid resource.",
        ))
    })
}

/// `attachment; filename="<name>"`, with quotes and backslashes escaped and
/// control characters dropped.
fn content_disposition(name: &str) -> Result<HeaderValue, ApiError> {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars().filter(|c| !c.is_control()) {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    HeaderValue::from_str(&format!("attachment; filename=\"{escaped}\"")).map_err(|e| {
        error!(error = %e, "Failed to build Content-Disposition header");
        ApiError::from(AppError::internal(
            "Something went wrong. Please check the logs.",
        ))
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/file` - Download an object as an attachment.
async fn download_file<S: ObjectStore + 'static>(
    State(state): State<AppState<S>>,
    body: Result<Json<Resource>, JsonRejection>,
) -> Result<Response, ApiError> {
    let resource = require_resource(body)?;
    let downloaded = state.resources.get_file(&resource).await?;
    let disposition = content_disposition(resource.name())?;

    let file = tokio::fs::File::open(downloaded.path()).await.map_err(|e| {
        error!(key = %resource.id(), error = %e, "Failed to open downloaded file");
        ApiError::from(AppError::io_failure(
            "Error reading file. Please check the logs.",
        ))
    })?;
    let size = downloaded.size();
    info!(key = %resource.id(), size, "Streaming file");

    // The stream owns the download; its scratch directory goes away once the
    // body is finished or dropped.
    let stream = ReaderStream::new(file).map(move |chunk| {
        let _held = &downloaded;
        chunk
    });

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, HeaderValue::from(size)),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

/// GET `/resource?id=<key>` - Fetch resource metadata.
async fn get_resource<S: ObjectStore + 'static>(
    State(state): State<AppState<S>>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<Resource>, ApiError> {
    let resource = state.resources.get_resource(&query.id).await?;
    Ok(Json(resource))
}

/// GET `/listFolder?cursor=<cursor>` - List one page of a folder.
///
/// The folder is given as an optional JSON `Resource` body.
async fn list_folder<S: ObjectStore + 'static>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListFolderQuery>,
    body: Bytes,
) -> Result<Json<ListResult<Resource>>, ApiError> {
    let resource = parse_optional_resource(&body)?;
    let result = state
        .resources
        .list_folder(resource.as_ref(), query.cursor.as_deref())
        .await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::http::{Request, StatusCode};
    use bucketfront_core::resource::ResourceService;
    use bucketfront_core::storage::{ListObjectsPage, StubFailure, StubStore};
    use bucketfront_shared::ListingSettings;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;

    struct TestApp {
        state: AppState<StubStore>,
        scratch_dir: PathBuf,
    }

    impl TestApp {
        fn new(store: StubStore) -> Self {
            let scratch_dir =
                std::env::temp_dir().join(format!("bucketfront-api-{}", Uuid::new_v4()));
            let service = ResourceService::new(
                Arc::new(store),
                ListingSettings {
                    page_size: 2,
                    scratch_dir: scratch_dir.clone(),
                },
            );
            Self {
                state: AppState::new(service),
                scratch_dir,
            }
        }

        async fn send(&self, request: Request<Body>) -> Response {
            let app: Router = routes().with_state(self.state.clone());
            app.oneshot(request).await.unwrap()
        }

        fn store(&self) -> &StubStore {
            self.state.resources.store()
        }
    }

    impl Drop for TestApp {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.scratch_dir);
        }
    }

    async fn body_bytes(response: Response) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn with_json(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_parse_optional_resource_blank_body() {
        assert!(parse_optional_resource(b"").unwrap().is_none());
        assert!(parse_optional_resource(b"  \n").unwrap().is_none());
    }

    #[test]
    fn test_parse_optional_resource_invalid_body() {
        let err = parse_optional_resource(b"{\"id\":").unwrap_err();
        assert!(matches!(err.0, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_content_disposition_escapes_quotes() {
        let value = content_disposition("say \"hi\".txt").unwrap();
        assert_eq!(value, "attachment; filename=\"say \\\"hi\\\".txt\"");
    }

    #[tokio::test]
    async fn test_get_resource() {
        let app = TestApp::new(StubStore::new().with_object("my-resource.txt", "hello"));

        let response = app.send(get("/resource?id=my-resource.txt")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "id": "my-resource.txt", "name": "my-resource.txt", "type": 0 })
        );
    }

    #[tokio::test]
    async fn test_get_resource_not_found_returns_404() {
        let app = TestApp::new(StubStore::new().failing_head(StubFailure::NotFound));

        let response = app.send(get("/resource?id=missing.txt")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            &body_bytes(response).await[..],
            b"Resource not found in bucket."
        );
    }

    #[tokio::test]
    async fn test_get_resource_rejected_returns_500() {
        let app = TestApp::new(StubStore::new().failing_head(StubFailure::Rejected));

        let response = app.send(get("/resource?id=my-resource.txt")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_resource_without_id_returns_400() {
        let app = TestApp::new(StubStore::new());

        let response = app.send(get("/resource")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_file() {
        let app = TestApp::new(StubStore::new().with_object("docs/report.txt", "quarterly numbers"));

        let response = app
            .send(with_json(
                "POST",
                "/file",
                r#"{"id":"docs/report.txt","name":"report.txt","type":0}"#,
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"report.txt\""
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/octet-stream"
        );
        assert_eq!(&body_bytes(response).await[..], b"quarterly numbers");

        // Body fully streamed and dropped: scratch directory is removed in
        // the background.
        let mut leftovers = usize::MAX;
        for _ in 0..200 {
            leftovers = std::fs::read_dir(&app.scratch_dir)
                .map(Iterator::count)
                .unwrap_or(0);
            if leftovers == 0 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_download_file_unknown_type_returns_400() {
        let app = TestApp::new(StubStore::new().with_object("a", "body"));

        let response = app
            .send(with_json("POST", "/file", r#"{"id":"a","name":"a","type":7}"#))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            &body_bytes(response).await[..],
            b"Request body is not a valid resource."
        );
    }

    #[tokio::test]
    async fn test_download_file_without_body_returns_400() {
        let app = TestApp::new(StubStore::new());

        let response = app.send(with_json("POST", "/file", "")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_file_not_found_returns_404() {
        let app = TestApp::new(StubStore::new().failing_get(StubFailure::NotFound));

        let response = app
            .send(with_json(
                "POST",
                "/file",
                r#"{"id":"my-resource","name":"my-resource.txt","type":0}"#,
            ))
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            &body_bytes(response).await[..],
            b"The specified key does not exist."
        );
    }

    #[tokio::test]
    async fn test_download_file_backend_failure_returns_500() {
        let app = TestApp::new(StubStore::new().failing_get(StubFailure::Unavailable));

        let response = app
            .send(with_json(
                "POST",
                "/file",
                r#"{"id":"my-resource","name":"my-resource.txt","type":0}"#,
            ))
            .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_list_folder_with_cursor_only() {
        let app = TestApp::new(StubStore::new().with_list_page(ListObjectsPage {
            keys: vec!["a/".to_string()],
            next_continuation_token: Some("2".to_string()),
        }));

        let response = app.send(get("/listFolder?cursor=1")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "resources": [{ "id": "a/", "name": "", "type": 1 }],
                "cursor": "2"
            })
        );

        let request = &app.store().list_requests()[0];
        assert_eq!(request.prefix, "");
        assert_eq!(request.max_keys, 2);
        assert_eq!(request.continuation_token.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_list_folder_with_resource_body() {
        let app = TestApp::new(
            StubStore::new()
                .with_object("docs/a.txt", "a")
                .with_object("docs/b.txt", "b")
                .with_object("docs/c.txt", "c"),
        );

        let response = app
            .send(with_json(
                "GET",
                "/listFolder",
                r#"{"id":"docs","name":"docs","type":1}"#,
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["resources"].as_array().unwrap().len(), 2);
        assert_eq!(body["resources"][0]["id"], "docs/a.txt");
        assert_eq!(body["cursor"], "docs/b.txt");
        assert_eq!(app.store().list_requests()[0].prefix, "docs/");
    }

    #[tokio::test]
    async fn test_list_folder_last_page_has_null_cursor() {
        let app = TestApp::new(StubStore::new().with_object("docs/a.txt", "a"));

        let response = app
            .send(with_json(
                "GET",
                "/listFolder?cursor=",
                r#"{"id":"docs","name":"docs","type":1}"#,
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["cursor"], Value::Null);
        assert!(app.store().list_requests()[0].continuation_token.is_none());
    }

    #[tokio::test]
    async fn test_list_folder_without_resource_or_cursor_returns_400() {
        let app = TestApp::new(StubStore::new());

        let response = app.send(get("/listFolder")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            &body_bytes(response).await[..],
            b"At least the cursor must be present when no resource is present."
        );
    }

    #[tokio::test]
    async fn test_list_folder_invalid_body_returns_400() {
        let app = TestApp::new(StubStore::new());

        let response = app
            .send(with_json("GET", "/listFolder?cursor=1", r#"{"id": 5}"#))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_folder_backend_failure_returns_500() {
        let app = TestApp::new(StubStore::new().failing_list(StubFailure::Unavailable));

        let response = app.send(get("/listFolder?cursor=1")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
