//! # Review ledger — submission and the running average
//!
//! Submitting a review touches three collections. Each write is independent
//! (there is no cross-collection transaction), so the order and shape of the
//! writes is what keeps the data consistent:
//!
//! 1. validate the request and look up the target truck;
//! 2. insert the [`Review`] itself;
//! 3. append its id to the author's `reviews` (signed-in users only);
//! 4. [`attach_review`](store::DocumentStore::attach_review) on the truck, which
//!    appends the id and folds the rating into `avg_rating` atomically.
//!
//! Steps 3 and 4 are idempotent. If either fails after the review was stored,
//! [`ReviewLedger::relink_review`] replays them from the persisted review
//! without counting the rating twice.

use chrono::Utc;
use store::{DocumentStore, FoodTruck, Review, APP_ORIGIN};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::Identity;
use crate::error::{parse_id, ApiError, ApiResult};
use crate::models::NewReviewRequest;
use crate::users::ensure_account;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

#[derive(Clone)]
pub struct ReviewLedger<S> {
    store: S,
}

fn validate_rating(rating: Option<f64>) -> ApiResult<f64> {
    match rating {
        Some(r) if r.is_finite() && (MIN_RATING..=MAX_RATING).contains(&r) => Ok(r),
        Some(_) => Err(ApiError::validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        ))),
        None => Err(ApiError::validation("rating is required")),
    }
}

impl<S: DocumentStore> ReviewLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Store a review and link it to its author and food truck.
    pub async fn submit_review(
        &self,
        identity: Identity,
        req: NewReviewRequest,
    ) -> ApiResult<Review> {
        let reviewer = identity.user_id();
        let reviewer_name = req
            .reviewer_name
            .map(|n| n.trim().to_string())
            .unwrap_or_default();
        if reviewer.is_none() && reviewer_name.is_empty() {
            return Err(ApiError::validation(
                "reviewerName is required when not signed in",
            ));
        }
        let food_truck = req
            .food_truck
            .ok_or_else(|| ApiError::validation("foodTruck is required"))?;
        let rating = validate_rating(req.rating)?;

        let food_truck = parse_id(&food_truck, "food truck")?;
        if let Some(user) = reviewer {
            ensure_account(&self.store, user).await?;
        }
        if self.store.find_food_truck(food_truck).await?.is_none() {
            return Err(ApiError::not_found("food truck"));
        }

        let review = Review {
            id: Uuid::new_v4(),
            reviewer,
            reviewer_name,
            food_truck,
            comment: req.comment,
            rating,
            date: req.date.unwrap_or_else(Utc::now),
            origin: req
                .origin
                .filter(|o| !o.trim().is_empty())
                .unwrap_or_else(|| APP_ORIGIN.to_string()),
        };

        self.store.insert_review(review.clone()).await?;
        let truck = self.link(&review).await?;

        info!(
            "review {} on food truck {}: rating {}, average now {:.3} over {}",
            review.id,
            truck.id,
            review.rating,
            truck.avg_rating,
            truck.reviews.len()
        );
        Ok(review)
    }

    /// Replay the author and food-truck links of an already stored review.
    pub async fn relink_review(&self, id: &str) -> ApiResult<FoodTruck> {
        let review = self.get(id).await?;
        self.link(&review).await
    }

    async fn link(&self, review: &Review) -> ApiResult<FoodTruck> {
        if let Some(user) = review.reviewer {
            self.store
                .push_user_review(user, review.id)
                .await
                .map_err(|err| {
                    warn!("review {} stored but not linked to user {}", review.id, user);
                    ApiError::from_store("reviewer")(err)
                })?;
        }

        self.store
            .attach_review(review.food_truck, review.id, review.rating)
            .await
            .map_err(|err| {
                warn!(
                    "review {} stored but not attached to food truck {}",
                    review.id, review.food_truck
                );
                ApiError::from_store("food truck")(err)
            })
    }

    /// Reviews of one truck, in submission order.
    pub async fn list_for_food_truck(&self, food_truck: &str) -> ApiResult<Vec<Review>> {
        let id = parse_id(food_truck, "food truck")?;
        let truck = self
            .store
            .find_food_truck(id)
            .await?
            .ok_or_else(|| ApiError::not_found("food truck"))?;
        Ok(self.store.find_reviews(&truck.reviews).await?)
    }

    pub async fn list_all(&self) -> ApiResult<Vec<Review>> {
        Ok(self.store.list_reviews().await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Review> {
        let id = parse_id(id, "review")?;
        self.store
            .find_review(id)
            .await?
            .ok_or_else(|| ApiError::not_found("review"))
    }
}
