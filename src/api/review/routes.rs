use crate::api::models::AppState;
use crate::api::review::handlers::{
    create_review, delete_review, get_review, list_place_reviews, update_review,
};
use axum::{Router, routing::get};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/places/{place_id}/reviews",
            get(list_place_reviews).post(create_review),
        )
        .route(
            "/reviews/{review_id}",
            get(get_review).put(update_review).delete(delete_review),
        )
}
