use api::models::NewReviewRequest;
use axum::{
    extract::{Path, State},
    Json,
};
use store::{DocumentStore, Review};

use crate::error::AppError;
use crate::extract::{Body, Caller};
use crate::state::AppState;

pub async fn submit<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Caller(identity): Caller,
    Body(req): Body<NewReviewRequest>,
) -> Result<Json<Review>, AppError> {
    Ok(Json(state.reviews.submit_review(identity, req).await?))
}

pub async fn list<S: DocumentStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Review>>, AppError> {
    Ok(Json(state.reviews.list_all().await?))
}

pub async fn get<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Review>, AppError> {
    Ok(Json(state.reviews.get(&id).await?))
}

pub async fn for_food_truck<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, AppError> {
    Ok(Json(state.reviews.list_for_food_truck(&id).await?))
}
