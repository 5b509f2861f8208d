/*!
 * HTTP Error Mapping
 * Converts GatewayError into the `{error: string}` JSON shape at the boundary
 */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::core::errors::GatewayError;

impl GatewayError {
    /// HTTP status for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            GatewayError::PathEscape(_)
            | GatewayError::NotADirectory(_)
            | GatewayError::NotAFile(_)
            | GatewayError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            GatewayError::HiddenPathDenied(_) => StatusCode::FORBIDDEN,
            GatewayError::RootNotFound(_)
            | GatewayError::NoRootsConfigured
            | GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GatewayError::PathEscape("..".into()).http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::HiddenPathDenied(".env".into()).http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            GatewayError::NoRootsConfigured.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::NotFound("x".into()).http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::UpstreamUnavailable("down".into()).http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            GatewayError::Io("boom".into()).http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
