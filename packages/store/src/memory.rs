use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{FoodTruck, FoodTruckUpdate, Review, User, UserUpdate};
use crate::repo::{rolling_average, DocumentStore};

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    food_trucks: Vec<FoodTruck>,
    reviews: Vec<Review>,
}

/// In-memory DocumentStore for testing and local development.
///
/// Each operation holds the lock for its whole read-modify-write, which gives
/// the same atomicity the PostgreSQL store gets from single statements.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Collections>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }
}

fn push_unique(ids: &mut Vec<Uuid>, id: Uuid) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

impl DocumentStore for MemoryStore {
    async fn insert_user(&self, user: User) -> StoreResult<()> {
        let mut db = self.lock()?;
        if db.users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::Duplicate { field: "id" });
        }
        if db.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate { field: "email" });
        }
        db.users.push(user);
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.lock()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.lock()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> StoreResult<()> {
        let mut db = self.lock()?;
        if let Some(email) = &update.email {
            if db.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::Duplicate { field: "email" });
            }
        }
        let user = db
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;
        update.apply_to(user);
        Ok(())
    }

    async fn push_user_review(&self, user_id: Uuid, review_id: Uuid) -> StoreResult<()> {
        let mut db = self.lock()?;
        let user = db
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(StoreError::NotFound)?;
        push_unique(&mut user.reviews, review_id);
        Ok(())
    }

    async fn push_owned_food_truck(&self, user_id: Uuid, food_truck_id: Uuid) -> StoreResult<()> {
        let mut db = self.lock()?;
        let user = db
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(StoreError::NotFound)?;
        push_unique(&mut user.owned_food_trucks, food_truck_id);
        Ok(())
    }

    async fn insert_food_truck(&self, truck: FoodTruck) -> StoreResult<()> {
        let mut db = self.lock()?;
        if db.food_trucks.iter().any(|t| t.id == truck.id) {
            return Err(StoreError::Duplicate { field: "id" });
        }
        db.food_trucks.push(truck);
        Ok(())
    }

    async fn find_food_truck(&self, id: Uuid) -> StoreResult<Option<FoodTruck>> {
        Ok(self.lock()?.food_trucks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_food_trucks(&self) -> StoreResult<Vec<FoodTruck>> {
        Ok(self.lock()?.food_trucks.clone())
    }

    async fn update_food_truck(&self, id: Uuid, update: FoodTruckUpdate) -> StoreResult<()> {
        let mut db = self.lock()?;
        let truck = db
            .food_trucks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;
        update.apply_to(truck);
        Ok(())
    }

    async fn attach_review(
        &self,
        food_truck_id: Uuid,
        review_id: Uuid,
        rating: f64,
    ) -> StoreResult<FoodTruck> {
        let mut db = self.lock()?;
        let truck = db
            .food_trucks
            .iter_mut()
            .find(|t| t.id == food_truck_id)
            .ok_or(StoreError::NotFound)?;
        if !truck.reviews.contains(&review_id) {
            truck.avg_rating = rolling_average(truck.avg_rating, truck.reviews.len(), rating);
            truck.reviews.push(review_id);
        }
        Ok(truck.clone())
    }

    async fn insert_review(&self, review: Review) -> StoreResult<()> {
        let mut db = self.lock()?;
        if db.reviews.iter().any(|r| r.id == review.id) {
            return Err(StoreError::Duplicate { field: "id" });
        }
        db.reviews.push(review);
        Ok(())
    }

    async fn find_review(&self, id: Uuid) -> StoreResult<Option<Review>> {
        Ok(self.lock()?.reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        Ok(self.lock()?.reviews.clone())
    }

    async fn find_reviews(&self, ids: &[Uuid]) -> StoreResult<Vec<Review>> {
        let db = self.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| db.reviews.iter().find(|r| r.id == *id).cloned())
            .collect())
    }
}
