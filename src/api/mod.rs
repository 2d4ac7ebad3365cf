pub mod models;
pub mod review;

// Re-exports
pub use models::*;

use crate::models::EntityKind;
use axum::{Json, Router, extract::State, routing::get};
use tower::Layer;
use tower_http::{
    cors::CorsLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};

// Health handler (simple, keep here)
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let total_reviews = state.storage.count(Some(EntityKind::Review))?;
    Ok(Json(models::HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        total_reviews,
    }))
}

async fn not_found_handler() -> AppError {
    AppError::NotFound
}

/// Build the full service. Review routes are mounted under `api_prefix`;
/// trailing slashes are stripped before routing.
pub fn app(state: AppState, api_prefix: &str) -> NormalizePath<Router> {
    let prefix = api_prefix.trim_end_matches('/');
    let api = if prefix.is_empty() {
        review::routes()
    } else {
        Router::new().nest(prefix, review::routes())
    };

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(api)
        .fallback(not_found_handler)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Review;
    use crate::storage::{FileStorage, StorageExt};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state() -> AppState {
        let storage = Arc::new(FileStorage::in_memory());
        storage
            .put(Review::new("p".into(), "u".into(), "t".into()))
            .unwrap();
        AppState { storage }
    }

    async fn fetch(app: NormalizePath<Router>, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = fetch(app(state(), "/api/v1"), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["total_reviews"], 1);
    }

    #[tokio::test]
    async fn test_routes_mounted_under_prefix() {
        let (status, _) = fetch(app(state(), "/api/v1"), "/api/v1/reviews/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = fetch(app(state(), "/api/v1/"), "/api/v1/places/missing/reviews").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, body) = fetch(app(state(), "/api/v1"), "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"error": "Not found"}));
    }
}
