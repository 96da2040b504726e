//! HTTP transport implementation.
//!
//! Serves the folder operations as a small JSON API so browsers and standard
//! HTTP clients (curl, etc.) can browse the base directory.

use axum::{
    Json, Router,
    extract::{Query, Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use http::{HeaderName, HeaderValue, Method, StatusCode, header};
use serde::Deserialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument};

use super::{HttpConfig, TransportError, TransportResult};
use crate::domains::folders::{CreateFolderRequest, DirectoryListing, FolderError, FolderService};

const ALLOW_METHODS: &str = "GET, POST, OPTIONS, PUT, DELETE";
const ALLOW_HEADERS: &str =
    "Content-Type, Access-Control-Allow-Headers, Authorization, X-Requested-With";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    folders: Arc<FolderService>,
}

/// Query string of `GET /files`.
#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    path: Option<String>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Build the router serving `folders`.
    pub fn router(&self, folders: Arc<FolderService>) -> Router {
        build_router(folders, self.config.enable_cors)
    }

    /// Run the HTTP transport.
    ///
    /// This method blocks until the server shuts down.
    pub async fn run(self, folders: FolderService) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(Arc::new(folders));

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → Listing: GET /files?path=<path>");
        info!("  → Create:  POST /create-folder");
        info!("  → Health:  GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the application router.
pub fn build_router(folders: Arc<FolderService>, enable_cors: bool) -> Router {
    let state = AppState { folders };

    let mut app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/files", get(list_files))
        .route(
            "/create-folder",
            post(create_folder).fallback(method_not_allowed),
        )
        .with_state(state);

    if enable_cors {
        app = app.layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(permissive_cors))
                .layer(cors_layer()),
        );
    }

    app.layer(TraceLayer::new_for_http())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
}

/// Answer every `OPTIONS` with an empty 200, preflight or not, and stamp the
/// same CORS header values on every response.
async fn permissive_cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    response
}

impl IntoResponse for FolderError {
    fn into_response(self) -> Response {
        let status = match &self {
            FolderError::PathEscape(_) => StatusCode::FORBIDDEN,
            FolderError::NotFound { .. } => StatusCode::NOT_FOUND,
            FolderError::NotADirectory { .. } | FolderError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            FolderError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            FolderError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, self.to_string()).into_response()
    }
}

/// Root handler - plain-text greeting.
async fn root_handler() -> &'static str {
    "Hello from the folder browser server!"
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// List a directory below the base.
#[instrument(skip(state))]
async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<DirectoryListing>, FolderError> {
    state.folders.list(query.path.as_deref()).map(Json)
}

/// Create a folder below the base.
///
/// The body is decoded by hand so every malformed payload maps to 400,
/// whatever its content type.
#[instrument(skip_all)]
async fn create_folder(State(state): State<AppState>, body: Bytes) -> Result<String, FolderError> {
    let request = CreateFolderRequest::from_json(&body)?;
    let created = state.folders.create_folder(&request)?;

    Ok(format!(
        "Folder '{}' created at '{}'",
        request.folder_name, created.display_path
    ))
}

async fn method_not_allowed() -> FolderError {
    FolderError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::security::{BaseDirectory, PathGuard};
    use axum::body::Body;
    use http::{HeaderMap, Request};
    use http_body_util::BodyExt;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(root: &Path) -> Router {
        let service = FolderService::new(PathGuard::new(BaseDirectory::new(root).unwrap()));
        build_router(Arc::new(service), true)
    }

    fn files_uri(path: &str) -> String {
        format!(
            "/files?{}",
            serde_urlencoded::to_string([("path", path)]).unwrap()
        )
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, body)
    }

    async fn get_uri(app: Router, uri: &str) -> (StatusCode, HeaderMap, Bytes) {
        let request = Request::builder()
            .uri(uri)
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        send(app, request).await
    }

    async fn post_json(app: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, HeaderMap, Bytes) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();
        send(app, request).await
    }

    #[tokio::test]
    async fn test_root_greeting() {
        let temp_dir = TempDir::new().unwrap();
        let (status, _, body) = get_uri(app(temp_dir.path()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8_lossy(&body).starts_with("Hello"));
    }

    #[tokio::test]
    async fn test_health_check() {
        let temp_dir = TempDir::new().unwrap();
        let (status, _, body) = get_uri(app(temp_dir.path()), "/health").await;
        assert_eq!(status, StatusCode::OK);

        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], "healthy");
        assert!(value["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_list_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("reports")).unwrap();
        fs::write(temp_dir.path().join("readme.txt"), "hi").unwrap();

        let (status, headers, body) = get_uri(app(temp_dir.path()), "/files?path=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");

        let listing: DirectoryListing = serde_json::from_slice(&body).unwrap();
        let names: Vec<_> = listing.files.iter().map(|e| (e.name.as_str(), e.is_dir)).collect();
        assert_eq!(names, vec![("readme.txt", false), ("reports", true)]);
    }

    #[tokio::test]
    async fn test_list_without_query() {
        let temp_dir = TempDir::new().unwrap();
        let (status, _, body) = get_uri(app(temp_dir.path()), "/files").await;
        assert_eq!(status, StatusCode::OK);

        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["files"], serde_json::json!([]));
        assert!(value["current_path"].is_string());
    }

    #[tokio::test]
    async fn test_list_escape_forbidden() {
        let temp_dir = TempDir::new().unwrap();
        let (status, _, body) = get_uri(app(temp_dir.path()), &files_uri("../../etc")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(String::from_utf8_lossy(&body).contains("Access denied"));
    }

    #[tokio::test]
    async fn test_list_sibling_prefix_forbidden() {
        let root = TempDir::new().unwrap();
        let base = root.path().join("app");
        fs::create_dir(&base).unwrap();
        fs::create_dir(root.path().join("app-other")).unwrap();

        let sibling = root.path().join("app-other");
        let (status, _, _) = get_uri(app(&base), &files_uri(&sibling.to_string_lossy())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_list_missing_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let (status, _, _) = get_uri(app(temp_dir.path()), &files_uri("missing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_path_below_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "hello").unwrap();

        let (status, _, _) = get_uri(app(temp_dir.path()), &files_uri("notes.txt/sub")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_file_bad_request() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "hello").unwrap();

        let (status, _, _) = get_uri(app(temp_dir.path()), &files_uri("notes.txt")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_folder_scenario() {
        let root = TempDir::new().unwrap();
        let base = root.path().join("data");
        fs::create_dir(&base).unwrap();

        let body = serde_json::json!({
            "path": base.to_string_lossy(),
            "folder_name": "reports"
        })
        .to_string();

        let (status, _, message) = post_json(app(&base), "/create-folder", body).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8_lossy(&message).contains("reports"));
        assert!(base.join("reports").is_dir());

        let (status, _, body) = get_uri(app(&base), "/files?path=").await;
        assert_eq!(status, StatusCode::OK);
        let listing: DirectoryListing = serde_json::from_slice(&body).unwrap();
        assert!(listing.files.iter().any(|e| e.name == "reports" && e.is_dir));
    }

    #[tokio::test]
    async fn test_create_folder_twice_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let body = r#"{"path": "", "folder_name": "sub"}"#;

        let (first, _, _) = post_json(app(temp_dir.path()), "/create-folder", body).await;
        let (second, _, _) = post_json(app(temp_dir.path()), "/create-folder", body).await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::OK);
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_create_folder_escape_forbidden() {
        let temp_dir = TempDir::new().unwrap();
        let body = r#"{"path": "../..", "folder_name": "evil"}"#;

        let (status, _, _) = post_json(app(temp_dir.path()), "/create-folder", body).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_folder_malformed_body() {
        let temp_dir = TempDir::new().unwrap();

        let (status, _, _) = post_json(app(temp_dir.path()), "/create-folder", "{oops").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) =
            post_json(app(temp_dir.path()), "/create-folder", r#"{"path": ""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_folder_filesystem_failure() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("taken"), "file").unwrap();
        let body = r#"{"path": "", "folder_name": "taken"}"#;

        let (status, _, _) = post_json(app(temp_dir.path()), "/create-folder", body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_create_folder_wrong_method() {
        let temp_dir = TempDir::new().unwrap();
        let (status, _, body) = get_uri(app(temp_dir.path()), "/create-folder").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(&body[..], b"Method not allowed");
    }

    #[tokio::test]
    async fn test_options_short_circuits() {
        let temp_dir = TempDir::new().unwrap();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/create-folder")
            .body(Body::empty())
            .unwrap();

        let (status, headers, body) = send(app(temp_dir.path()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
        assert!(methods.contains("POST"));
        assert!(methods.contains("DELETE"));
        // Nothing was created by the pre-flight.
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_preflight_uses_same_header_values() {
        let temp_dir = TempDir::new().unwrap();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/create-folder")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();

        let (status, headers, body) = send(app(temp_dir.path()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOW_METHODS);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], ALLOW_HEADERS);
    }

    #[tokio::test]
    async fn test_cors_headers_on_every_response() {
        let temp_dir = TempDir::new().unwrap();

        for uri in ["/", "/files", "/files?path=..%2F..", "/create-folder"] {
            let (_, headers, _) = get_uri(app(temp_dir.path()), uri).await;
            assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*", "{uri}");
            assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOW_METHODS, "{uri}");
            assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], ALLOW_HEADERS, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_cors_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let service =
            FolderService::new(PathGuard::new(BaseDirectory::new(temp_dir.path()).unwrap()));
        let app = HttpTransport::new(HttpConfig {
            enable_cors: false,
            ..Default::default()
        })
        .router(Arc::new(service));

        let (status, headers, _) = get_uri(app, "/files").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
