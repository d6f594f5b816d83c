/**
 * Error Conversion
 *
 * Conversions from engine errors into [`BackendError`] and from
 * [`BackendError`] into HTTP responses.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "ok": false,
 *   "error": "Could not detect Booqable API endpoint",
 *   "attempts": [ { "base": "...", "path": "/orders", "method": "GET", "auth": "Bearer", "status": 401 } ]
 * }
 * ```
 *
 * # Status Mapping
 *
 * - missing API key - 503 Service Unavailable
 * - discovery exhausted, step rejected, invalid input - 400 Bad Request
 * - a sync page failing after discovery - 502 Bad Gateway
 * - local store failures - 500 Internal Server Error
 * - malformed body or query string - the extractor's status (400, 415 or 422)
 */

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::backend::booqable::sync::SyncError;
use crate::backend::booqable::{BooqableError, Trace};
use crate::backend::error::types::BackendError;

impl From<BooqableError> for BackendError {
    fn from(err: BooqableError) -> Self {
        match err {
            BooqableError::MissingCredential => {
                BackendError::handler(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            BooqableError::Discovery { ref attempts } => BackendError::upstream(
                StatusCode::BAD_REQUEST,
                err.to_string(),
                "attempts",
                Trace::from_log(attempts),
            ),
            BooqableError::Rejected { message, trace } => {
                BackendError::upstream(StatusCode::BAD_REQUEST, message, "tried", trace)
            }
            BooqableError::Invalid(shared) => BackendError::SharedError(shared),
        }
    }
}

impl From<SyncError> for BackendError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Booqable(err) => err.into(),
            SyncError::Upstream { ref attempts, .. } => BackendError::upstream(
                StatusCode::BAD_GATEWAY,
                err.to_string(),
                "attempts",
                Trace::from_log(attempts),
            ),
            SyncError::Normalize(shared) => BackendError::SharedError(shared),
            SyncError::Storage(err) => BackendError::StorageError(err),
        }
    }
}

impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        BackendError::handler(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for BackendError {
    fn from(rejection: QueryRejection) -> Self {
        BackendError::handler(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for BackendError {
    /// Convert a backend error into a JSON response
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self);
        }

        let mut body = json!({
            "ok": false,
            "error": self.message(),
        });
        if let (Some((key, trace)), Value::Object(map)) = (self.trace(), &mut body) {
            map.insert(key.to_string(), serde_json::to_value(trace).unwrap_or(Value::Null));
        }

        (status, Json(body)).into_response()
    }
}
