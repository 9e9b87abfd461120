//! Route handlers, one module per component. Each handler decodes the
//! request, calls the component with the resolved [`crate::extract::Caller`],
//! and lets [`crate::error::AppError`] shape failures.

pub mod food_trucks;
pub mod reviews;
pub mod users;

use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
