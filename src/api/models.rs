use crate::storage::{Storage, StorageError};
use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request, rejection::BytesRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
}

/// Request body that must be a JSON object.
///
/// Anything that doesn't parse as an object (empty body, invalid JSON, arrays,
/// scalars) is rejected with `400 {"error": "Not a JSON"}`. The `Content-Type`
/// header is not consulted. Failures reading the body itself, such as
/// exceeding the body limit, keep their own status.
#[derive(Debug)]
pub struct JsonObject(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(AppError::Body)?;

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(JsonObject(map)),
            _ => Err(AppError::not_a_json()),
        }
    }
}

/// Identifier from a request body. Non-string ids keep their JSON text, so
/// `7` looks up `"7"` and anything else simply won't match.
fn id_field(body: &Map<String, Value>, key: &str) -> Option<String> {
    body.get(key).map(|value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

fn text_field(body: &Map<String, Value>, key: &str) -> Result<String, String> {
    match body.get(key) {
        None => Err(format!("Missing {}", key)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(format!("{} must be a string", key)),
    }
}

/// Request to add a review to a place
#[derive(Debug)]
pub struct CreateReviewRequest {
    pub user_id: String,
    pub text: String,
}

impl CreateReviewRequest {
    /// Extract the known fields, checking `user_id` before `text`.
    /// Any other keys in the body are ignored.
    pub fn parse(body: &Map<String, Value>) -> Result<Self, String> {
        let user_id = id_field(body, "user_id").ok_or("Missing user_id")?;
        let text = text_field(body, "text")?;
        Ok(Self { user_id, text })
    }
}

/// Request to change a review's text
#[derive(Debug)]
pub struct UpdateReviewRequest {
    pub text: String,
}

impl UpdateReviewRequest {
    pub fn parse(body: &Map<String, Value>) -> Result<Self, String> {
        let text = text_field(body, "text")?;
        Ok(Self { text })
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub total_reviews: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Body(BytesRejection),
    NotFound,
    Internal(String),
}

impl AppError {
    pub fn not_a_json() -> Self {
        AppError::BadRequest("Not a JSON".to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Body(rejection) => (rejection.status(), rejection.body_text()),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
