/*!
 * Reverse Proxy Server
 * Streams requests and responses between clients and upstream services
 *
 * The response body is forwarded incrementally as bytes arrive so event
 * streams whose upstream never closes keep flowing. No idle timeout is
 * imposed on proxied connections; a dropped client aborts the upstream leg
 * when the handler future is dropped.
 */

use std::error::Error;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::Response;
use axum::Router;
use bytes::Bytes;
use futures::TryStreamExt;
use tracing::{debug, warn};

use crate::core::errors::GatewayError;
use crate::proxy::routes::RouteTable;

/// Shared proxy state: the static table and one connection-pooling client
struct ProxyState {
    table: RouteTable,
    client: reqwest::Client,
}

/// Build the proxy router; every request lands in the fallback handler
pub fn proxy_app(table: RouteTable) -> Router {
    let state = Arc::new(ProxyState {
        table,
        client: reqwest::Client::new(),
    });
    Router::new().fallback(forward).with_state(state)
}

async fn forward(State(state): State<Arc<ProxyState>>, req: Request) -> Response {
    // CORS preflight is answered here, never forwarded
    if req.method() == Method::OPTIONS {
        return preflight_response();
    }

    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);
    let Some(route) = state.table.matching(&path) else {
        return error_response(
            StatusCode::NOT_FOUND,
            &GatewayError::NotFound(path).to_string(),
        );
    };
    let target = route.upstream_url(&path, query.as_deref());
    debug!(%path, %target, "forwarding request");

    let method = req.method().clone();
    let mut headers = req.headers().clone();
    // Host is rewritten to the upstream by the client; framing headers are
    // recomputed for the streamed body
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);
    headers.remove(header::TRANSFER_ENCODING);
    headers.remove(header::CONNECTION);

    let body_stream = req.into_body().into_data_stream();
    let upstream_req = state
        .client
        .request(method, &target)
        .headers(headers)
        .body(reqwest::Body::wrap_stream(body_stream));

    // Single attempt, fail fast: a 502 here is deliberate, not a missing retry
    match upstream_req.send().await {
        Ok(upstream) => passthrough_response(upstream),
        Err(e) => {
            warn!(%target, error = %e, "upstream unavailable");
            error_response(
                StatusCode::BAD_GATEWAY,
                &GatewayError::UpstreamUnavailable(error_detail(&e)).to_string(),
            )
        }
    }
}

/// Forward status, headers, and an incrementally streamed body
///
/// If the upstream drops mid-stream the body simply ends; response headers
/// have already gone out, so no second response is attempted.
fn passthrough_response(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    headers.remove(header::TRANSFER_ENCODING);
    headers.remove(header::CONNECTION);
    apply_cors(&mut headers);

    let stream = upstream
        .bytes_stream()
        .inspect_err(|e| warn!(error = %e, "upstream stream ended with error"));

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

fn preflight_response() -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    apply_cors(response.headers_mut());
    response.headers_mut().insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("86400"),
    );
    response
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({ "error": message });
    let bytes = Bytes::from(serde_json::to_vec(&body).unwrap_or_default());
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    apply_cors(response.headers_mut());
    response
}

/// CORS headers added or overwritten on every proxied response
fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization, X-OpenClaw-Agent-Id"),
    );
}

/// Flatten a reqwest error and its source chain into one line
fn error_detail(e: &reqwest::Error) -> String {
    let mut detail = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        detail.push_str(": ");
        detail.push_str(&inner.to_string());
        source = inner.source();
    }
    detail
}
