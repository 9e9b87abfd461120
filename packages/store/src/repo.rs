//! # DocumentStore — the persistence seam
//!
//! Every component in the `api` crate talks to storage through the
//! [`DocumentStore`] trait, so the same logic runs against PostgreSQL in
//! production (`api::db::PgStore`) and [`crate::MemoryStore`] in tests.
//!
//! The trait mirrors what a document database offers: unique-key lookup,
//! multi-field `$set` updates, collection scans and bulk id lookups. Two
//! operations go further and must be atomic in every implementation:
//!
//! | Method | Guarantee |
//! |--------|-----------|
//! | [`attach_review`](DocumentStore::attach_review) | Appends a review id to a food truck and folds its rating into `avg_rating` in one step. Re-applying the same review id is a no-op. |
//! | [`push_user_review`](DocumentStore::push_user_review) / [`push_owned_food_truck`](DocumentStore::push_owned_food_truck) | Append-if-absent, so retries never duplicate ids. |
//!
//! Together these make the review-submission fan-out safe to retry and free of
//! lost updates under concurrent submissions.

use std::future::Future;

use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::{FoodTruck, FoodTruckUpdate, Review, User, UserUpdate};

/// Fold one more rating into a running mean over `count` ratings.
///
/// `(avg * count + rating) / (count + 1)`; the mean never has to be
/// recomputed from the individual reviews.
pub fn rolling_average(avg: f64, count: usize, rating: f64) -> f64 {
    let count = count as f64;
    (avg * count + rating) / (count + 1.0)
}

/// Async access to the users, food trucks and reviews collections.
pub trait DocumentStore: Clone + Send + Sync + 'static {
    fn insert_user(&self, user: User) -> impl Future<Output = StoreResult<()>> + Send;

    fn find_user(&self, id: Uuid) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    fn update_user(
        &self,
        id: Uuid,
        update: UserUpdate,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    fn push_user_review(
        &self,
        user_id: Uuid,
        review_id: Uuid,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    fn push_owned_food_truck(
        &self,
        user_id: Uuid,
        food_truck_id: Uuid,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    fn insert_food_truck(&self, truck: FoodTruck) -> impl Future<Output = StoreResult<()>> + Send;

    fn find_food_truck(
        &self,
        id: Uuid,
    ) -> impl Future<Output = StoreResult<Option<FoodTruck>>> + Send;

    fn list_food_trucks(&self) -> impl Future<Output = StoreResult<Vec<FoodTruck>>> + Send;

    fn update_food_truck(
        &self,
        id: Uuid,
        update: FoodTruckUpdate,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Link `review_id` to the truck and fold `rating` into its average.
    fn attach_review(
        &self,
        food_truck_id: Uuid,
        review_id: Uuid,
        rating: f64,
    ) -> impl Future<Output = StoreResult<FoodTruck>> + Send;

    fn insert_review(&self, review: Review) -> impl Future<Output = StoreResult<()>> + Send;

    fn find_review(&self, id: Uuid) -> impl Future<Output = StoreResult<Option<Review>>> + Send;

    fn list_reviews(&self) -> impl Future<Output = StoreResult<Vec<Review>>> + Send;

    /// Bulk lookup; results follow the order of `ids`, unknown ids are skipped.
    fn find_reviews(&self, ids: &[Uuid]) -> impl Future<Output = StoreResult<Vec<Review>>> + Send;
}
