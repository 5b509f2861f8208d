/*!
 * Sidecar HTTP Service
 * File browsing endpoints over the sandboxed roots
 */

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::task;
use tokio_util::io::ReaderStream;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::types::{FileQuery, ListResponse, ReadResponse, RootRef, RootsResponse};
use crate::core::errors::{GatewayError, GatewayResult};
use crate::files::read::PREVIEW_MAX_BYTES;
use crate::files::registry::RootRegistry;
use crate::files::resolve::ResolveOptions;
use crate::files::{list, read};

/// Chunk size for streamed downloads
const DOWNLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// Shared, immutable per-process state
struct SidecarState {
    registry: RootRegistry,
    resolve: ResolveOptions,
}

/// Build the sidecar router
pub fn sidecar_app(registry: RootRegistry, allow_hidden: bool) -> Router {
    info!(roots = registry.len(), allow_hidden, "sidecar file service ready");
    let state = Arc::new(SidecarState {
        registry,
        resolve: ResolveOptions { allow_hidden },
    });
    Router::new()
        .route("/health", get(health))
        .route("/files/roots", get(list_roots))
        .route("/files/list", get(list_files))
        .route("/files/read", get(read_file))
        .route("/files/download", get(download_file))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<Arc<SidecarState>>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "roots": state.registry.len() }))
}

async fn list_roots(State(state): State<Arc<SidecarState>>) -> Json<RootsResponse> {
    Json(RootsResponse {
        roots: state.registry.roots().to_vec(),
    })
}

async fn list_files(
    State(state): State<Arc<SidecarState>>,
    Query(query): Query<FileQuery>,
) -> GatewayResult<Json<ListResponse>> {
    let root = state.registry.get(query.root.as_deref())?.clone();
    let root_ref = RootRef::from(&root);
    let path = query.path.unwrap_or_default();
    let opts = state.resolve;

    let listing = run_blocking(move || list::list(&root, &path, &opts)).await?;
    Ok(Json(ListResponse {
        root: root_ref,
        listing,
    }))
}

async fn read_file(
    State(state): State<Arc<SidecarState>>,
    Query(query): Query<FileQuery>,
) -> GatewayResult<Json<ReadResponse>> {
    let root = state.registry.get(query.root.as_deref())?.clone();
    let root_ref = RootRef::from(&root);
    let path = query.path.unwrap_or_default();
    let max_bytes = query.max_bytes.unwrap_or(PREVIEW_MAX_BYTES);
    let opts = state.resolve;

    let preview = run_blocking(move || read::read_preview(&root, &path, max_bytes, &opts)).await?;
    Ok(Json(ReadResponse {
        root: root_ref,
        preview,
    }))
}

/// Streams the whole file regardless of the preview cap, in bounded chunks
async fn download_file(
    State(state): State<Arc<SidecarState>>,
    Query(query): Query<FileQuery>,
) -> GatewayResult<Response> {
    let root = state.registry.get(query.root.as_deref())?.clone();
    let path = query.path.unwrap_or_default();
    let opts = state.resolve;

    let target = run_blocking(move || read::open_download(&root, &path, &opts)).await?;
    let file = tokio::fs::File::open(&target.path)
        .await
        .map_err(|e| GatewayError::from_io(e, &target.relative_path))?;
    let stream = ReaderStream::with_capacity(file, DOWNLOAD_CHUNK_BYTES);

    let disposition = format!(
        "attachment; filename=\"{}\"",
        target.file_name.replace(['"', '\\'], "_")
    );
    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(target.size));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );
    Ok(response)
}

/// Run a blocking filesystem operation off the async worker threads
async fn run_blocking<T, F>(f: F) -> GatewayResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> GatewayResult<T> + Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| GatewayError::Io(format!("blocking task: {e}")))?
}
