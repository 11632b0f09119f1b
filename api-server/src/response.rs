use actix_web::{http::StatusCode, HttpResponse};

use crate::store::StoreError;

pub(crate) fn json_error_with_code(
    status: StatusCode,
    message: impl Into<String>,
    error_code: Option<&str>,
) -> HttpResponse {
    let mut body = serde_json::json!({
        "success": false,
        "error": message.into(),
    });
    if let Some(code) = error_code {
        body["error_code"] = serde_json::Value::String(code.to_string());
    }
    HttpResponse::build(status).json(body)
}

/// Maps a store failure onto the matching HTTP status. Database failures are
/// logged and reported without their details.
pub(crate) fn store_error_response(err: StoreError, context: &str) -> HttpResponse {
    let status = match &err {
        StoreError::Conflict(_) => StatusCode::CONFLICT,
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Invalid(_) => StatusCode::BAD_REQUEST,
        StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("{context} failed: {err}");
        return json_error_with_code(status, "store error", Some(err.error_code()));
    }
    json_error_with_code(status, err.to_string(), Some(err.error_code()))
}

pub(crate) fn unauthorized() -> HttpResponse {
    json_error_with_code(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        Some("unauthorized"),
    )
}
