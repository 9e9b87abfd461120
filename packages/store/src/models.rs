//! # Stored records — users, food trucks, reviews
//!
//! These are the documents held by a [`crate::DocumentStore`]. Cross references
//! between them are plain identifier lists; nothing in the store enforces
//! referential integrity, so the `api` crate keeps them in step.
//!
//! | Struct | Collection | Notes |
//! |--------|-----------|-------|
//! | [`User`] | users | Never serialised directly: it carries the password hash. The `api` crate projects it into self/public views. |
//! | [`FoodTruck`] | food trucks | `avg_rating` and `reviews` are derived and only change through [`crate::DocumentStore::attach_review`]. |
//! | [`Review`] | reviews | Immutable once inserted. `reviewer` is `None` for anonymous and scraped reviews. |
//!
//! [`UserUpdate`] and [`FoodTruckUpdate`] describe `$set`-style partial updates:
//! every field is an `Option`, and only `Some` fields are written. This keeps
//! "field absent" distinct from "field present with a zero value" (for example
//! `status: false`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Origin tag for reviews submitted through the app itself.
pub const APP_ORIGIN: &str = "munchapp";

/// A registered account.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Normalised (trimmed, lower-cased) and unique across users.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub date_of_birth: DateTime<Utc>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub reviews: Vec<Uuid>,
    pub owned_food_trucks: Vec<Uuid>,
    pub favorites: Vec<Uuid>,
}

impl User {
    /// Build a freshly registered user with a new id and empty relationship lists.
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        password_hash: String,
        date_of_birth: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email,
            password_hash,
            date_of_birth,
            phone_number: None,
            city: None,
            state: None,
            reviews: Vec::new(),
            owned_food_trucks: Vec::new(),
            favorites: Vec::new(),
        }
    }
}

/// Weekly opening hours: seven `[open, close]` pairs, Monday first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatingHours(pub [[String; 2]; 7]);

impl OperatingHours {
    /// Iterate over `(open, close)` for each day.
    pub fn days(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|[open, close]| (open.as_str(), close.as_str()))
    }
}

/// A food-truck listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodTruck {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    /// `[latitude, longitude]`
    pub location: [f64; 2],
    /// `None` for unclaimed trucks (e.g. created by the scraper).
    pub owner: Option<Uuid>,
    pub hours: OperatingHours,
    pub status: bool,
    pub avg_rating: f64,
    /// Review ids in submission order.
    pub reviews: Vec<Uuid>,
    pub photos: Vec<String>,
    pub website: String,
    pub phone_number: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// A single rating of a food truck.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub reviewer: Option<Uuid>,
    pub reviewer_name: String,
    pub food_truck: Uuid,
    pub comment: String,
    pub rating: f64,
    pub date: DateTime<Utc>,
    pub origin: String,
}

/// Partial update of a [`User`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub favorites: Option<Vec<Uuid>>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write every present field onto `user`.
    pub fn apply_to(self, user: &mut User) {
        if let Some(v) = self.first_name {
            user.first_name = v;
        }
        if let Some(v) = self.last_name {
            user.last_name = v;
        }
        if let Some(v) = self.email {
            user.email = v;
        }
        if let Some(v) = self.phone_number {
            user.phone_number = Some(v);
        }
        if let Some(v) = self.city {
            user.city = Some(v);
        }
        if let Some(v) = self.state {
            user.state = Some(v);
        }
        if let Some(v) = self.date_of_birth {
            user.date_of_birth = v;
        }
        if let Some(v) = self.favorites {
            user.favorites = v;
        }
    }
}

/// Partial update of a [`FoodTruck`]. Derived fields are deliberately absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FoodTruckUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub location: Option<[f64; 2]>,
    pub status: Option<bool>,
    pub hours: Option<OperatingHours>,
    pub photos: Option<Vec<String>>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl FoodTruckUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write every present field onto `truck`.
    pub fn apply_to(self, truck: &mut FoodTruck) {
        if let Some(v) = self.name {
            truck.name = v;
        }
        if let Some(v) = self.address {
            truck.address = v;
        }
        if let Some(v) = self.location {
            truck.location = v;
        }
        if let Some(v) = self.status {
            truck.status = v;
        }
        if let Some(v) = self.hours {
            truck.hours = v;
        }
        if let Some(v) = self.photos {
            truck.photos = v;
        }
        if let Some(v) = self.website {
            truck.website = v;
        }
        if let Some(v) = self.phone_number {
            truck.phone_number = v;
        }
        if let Some(v) = self.description {
            truck.description = v;
        }
        if let Some(v) = self.tags {
            truck.tags = v;
        }
    }
}
