use api::models::{
    LoginRequest, LoginResponse, PublicUser, RegisterRequest, UpdateUserRequest, UserProfile,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use store::DocumentStore;

use crate::error::AppError;
use crate::extract::{Body, Caller};
use crate::state::AppState;

pub async fn register<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Body(req): Body<RegisterRequest>,
) -> Result<StatusCode, AppError> {
    state.identity.register(req).await?;
    Ok(StatusCode::OK)
}

pub async fn login<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Body(req): Body<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(state.identity.login(req).await?))
}

pub async fn profile<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Caller(identity): Caller,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.identity.profile(identity).await?))
}

pub async fn get_user<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<PublicUser>, AppError> {
    Ok(Json(state.identity.public_user(&id).await?))
}

pub async fn update_user<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Caller(identity): Caller,
    Path(id): Path<String>,
    Body(req): Body<UpdateUserRequest>,
) -> Result<StatusCode, AppError> {
    state.identity.update_user(identity, &id, req).await?;
    Ok(StatusCode::OK)
}
