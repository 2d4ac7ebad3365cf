use crate::api::models::*;
use crate::models::{Entity, EntityKind, Model, Place, Review, User};
use crate::storage::{Storage, StorageExt};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Map, Value};
use tracing::{info, warn};

/// Fetch an entity or fail with 404
fn require<T: Model>(storage: &dyn Storage, id: &str) -> Result<T, AppError> {
    storage.get_as::<T>(id)?.ok_or_else(|| {
        warn!(kind = %T::KIND, id, "Entity not found");
        AppError::NotFound
    })
}

pub async fn list_place_reviews(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<Vec<Entity>>, AppError> {
    require::<Place>(state.storage.as_ref(), &place_id)?;

    let reviews: Vec<Entity> = state
        .storage
        .all_of::<Review>()?
        .into_iter()
        .filter(|review| review.place_id == place_id)
        .map(Entity::from)
        .collect();

    info!(place_id = %place_id, found = reviews.len(), "Listed reviews");

    Ok(Json(reviews))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<Json<Entity>, AppError> {
    let review = require::<Review>(state.storage.as_ref(), &review_id)?;
    Ok(Json(review.into()))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<Json<Map<String, Value>>, AppError> {
    require::<Review>(state.storage.as_ref(), &review_id)?;

    state.storage.delete(EntityKind::Review, &review_id)?;
    state.storage.save()?;

    info!(review_id = %review_id, "Review deleted");

    Ok(Json(Map::new()))
}

pub async fn create_review(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
    JsonObject(body): JsonObject,
) -> Result<(StatusCode, Json<Entity>), AppError> {
    // Validate
    let request = CreateReviewRequest::parse(&body).map_err(AppError::BadRequest)?;

    require::<Place>(state.storage.as_ref(), &place_id)?;
    require::<User>(state.storage.as_ref(), &request.user_id)?;

    // place_id always comes from the path, never the body
    let review = Review::new(place_id, request.user_id, request.text);

    state.storage.put(review.clone())?;
    state.storage.save()?;

    info!(
        review_id = %review.base.id,
        place_id = %review.place_id,
        user_id = %review.user_id,
        "Review added"
    );

    Ok((StatusCode::CREATED, Json(review.into())))
}

pub async fn update_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    JsonObject(body): JsonObject,
) -> Result<Json<Entity>, AppError> {
    // Validate
    let request = UpdateReviewRequest::parse(&body).map_err(AppError::BadRequest)?;

    let mut review = require::<Review>(state.storage.as_ref(), &review_id)?;
    review.set_text(request.text);

    state.storage.put(review.clone())?;
    state.storage.save()?;

    info!(review_id = %review_id, "Review updated");

    Ok(Json(review.into()))
}
