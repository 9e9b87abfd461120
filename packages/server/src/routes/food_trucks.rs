use api::models::{NewFoodTruckRequest, UpdateFoodTruckRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use store::{DocumentStore, FoodTruck};

use crate::error::AppError;
use crate::extract::{Body, Caller};
use crate::state::AppState;

pub async fn create<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Caller(identity): Caller,
    Body(req): Body<NewFoodTruckRequest>,
) -> Result<StatusCode, AppError> {
    state.food_trucks.create(identity, req).await?;
    Ok(StatusCode::OK)
}

pub async fn list<S: DocumentStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<FoodTruck>>, AppError> {
    Ok(Json(state.food_trucks.list().await?))
}

pub async fn get<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<FoodTruck>, AppError> {
    Ok(Json(state.food_trucks.get(&id).await?))
}

pub async fn update<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
    Body(req): Body<UpdateFoodTruckRequest>,
) -> Result<StatusCode, AppError> {
    state.food_trucks.update(identity, &id, req).await?;
    Ok(StatusCode::OK)
}
