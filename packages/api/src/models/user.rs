//! # User requests and projections
//!
//! Stored [`store::User`] records are never sent over the wire. Two projections
//! are derived from them instead:
//!
//! ## [`UserProfile`]
//!
//! The self-view returned by `GET /profile`: every field including the
//! relationship id lists, minus the password hash.
//!
//! ## [`PublicUser`]
//!
//! What anyone may see through `GET /users/{id}`: id, names, and the lists of
//! authored reviews and owned food trucks. Email, birth date, contact details and
//! favorites stay private.
//!
//! Request bodies use `Option` for every field so that "absent" is always
//! distinguishable from an empty or zero value, and reject unknown fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store::User;
use uuid::Uuid;

/// Body of `POST /register`. All fields are required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub date_of_birth: Option<DateTime<Utc>>,
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Body of `PUT /users/{id}`; only present fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub favorites: Option<Vec<Uuid>>,
}

/// Full self-view of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: DateTime<Utc>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub reviews: Vec<Uuid>,
    pub owned_food_trucks: Vec<Uuid>,
    pub favorites: Vec<Uuid>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            date_of_birth: user.date_of_birth,
            phone_number: user.phone_number.clone(),
            city: user.city.clone(),
            state: user.state.clone(),
            reviews: user.reviews.clone(),
            owned_food_trucks: user.owned_food_trucks.clone(),
            favorites: user.favorites.clone(),
        }
    }
}

/// Publicly visible part of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub reviews: Vec<Uuid>,
    pub owned_food_trucks: Vec<Uuid>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            reviews: user.reviews.clone(),
            owned_food_trucks: user.owned_food_trucks.clone(),
        }
    }
}
