//! # Food-truck registry
//!
//! Listings are created by signed-in users (who become the owner) or by the
//! trusted scraper agent (which leaves them unclaimed). Opening hours are
//! validated slot by slot before anything is written.
//!
//! ## Who may update a listing
//!
//! | Caller | Owned by caller | Owned by someone else | Unclaimed |
//! |--------|-----------------|-----------------------|-----------|
//! | user | yes | 403 | yes |
//! | trusted agent | n/a | 403 | yes |
//! | anonymous | 401 | 401 | 401 |

use once_cell::sync::Lazy;
use regex::Regex;
use store::{DocumentStore, FoodTruck, FoodTruckUpdate, OperatingHours};
use tracing::info;
use uuid::Uuid;

use crate::auth::Identity;
use crate::error::{parse_id, ApiError, ApiResult};
use crate::models::{NewFoodTruckRequest, UpdateFoodTruckRequest};
use crate::users::{ensure_account, required};

static HOUR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}$").expect("hours pattern compiles"));

/// Check every `[open, close]` slot against `HH:MM`.
pub fn validate_hours(hours: &OperatingHours) -> ApiResult<()> {
    for (day, (open, close)) in hours.days().enumerate() {
        if !HOUR_PATTERN.is_match(open) || !HOUR_PATTERN.is_match(close) {
            return Err(ApiError::validation(format!(
                "hours for day {day} must be HH:MM, got [{open:?}, {close:?}]"
            )));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct FoodTruckRegistry<S> {
    store: S,
}

impl<S: DocumentStore> FoodTruckRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a listing owned by the acting user, or unclaimed for the agent.
    pub async fn create(&self, identity: Identity, req: NewFoodTruckRequest) -> ApiResult<Uuid> {
        let owner = match identity {
            Identity::User(id) => Some(id),
            Identity::TrustedAgent => None,
            Identity::Anonymous => {
                return Err(ApiError::Auth("authentication required".to_string()))
            }
        };

        let name = required(req.name, "name")?;
        let address = required(req.address, "address")?;
        let hours = req
            .hours
            .ok_or_else(|| ApiError::validation("hours is required"))?;
        let photos = req
            .photos
            .ok_or_else(|| ApiError::validation("photos is required"))?;
        validate_hours(&hours)?;
        if let Some(owner) = owner {
            ensure_account(&self.store, owner).await?;
        }

        let truck = FoodTruck {
            id: Uuid::new_v4(),
            name,
            address,
            location: req.location,
            owner,
            hours,
            status: false,
            avg_rating: 0.0,
            reviews: Vec::new(),
            photos,
            website: req.website,
            phone_number: req.phone_number,
            description: req.description,
            tags: req.tags.unwrap_or_default(),
        };
        let id = truck.id;

        self.store.insert_food_truck(truck).await?;
        if let Some(owner) = owner {
            self.store
                .push_owned_food_truck(owner, id)
                .await
                .map_err(ApiError::from_store("owner"))?;
        }

        info!("created food truck {} (owner: {:?})", id, owner);
        Ok(id)
    }

    pub async fn list(&self) -> ApiResult<Vec<FoodTruck>> {
        Ok(self.store.list_food_trucks().await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<FoodTruck> {
        let id = parse_id(id, "food truck")?;
        self.store
            .find_food_truck(id)
            .await?
            .ok_or_else(|| ApiError::not_found("food truck"))
    }

    /// Apply the present fields of `req` after the ownership check.
    pub async fn update(
        &self,
        identity: Identity,
        id: &str,
        req: UpdateFoodTruckRequest,
    ) -> ApiResult<()> {
        if identity == Identity::Anonymous {
            return Err(ApiError::Auth("authentication required".to_string()));
        }
        if let Some(hours) = &req.hours {
            validate_hours(hours)?;
        }
        let update = FoodTruckUpdate::from(req);
        for (field, value) in [("name", &update.name), ("address", &update.address)] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ApiError::validation(format!("{field} must not be blank")));
            }
        }

        let truck = self.get(id).await?;
        let allowed = match (identity, truck.owner) {
            (_, None) => true,
            (Identity::User(caller), Some(owner)) => caller == owner,
            _ => false,
        };
        if !allowed {
            return Err(ApiError::Forbidden(
                "only the owner may update this food truck".to_string(),
            ));
        }

        if update.is_empty() {
            return Ok(());
        }
        self.store
            .update_food_truck(truck.id, update)
            .await
            .map_err(ApiError::from_store("food truck"))
    }
}
