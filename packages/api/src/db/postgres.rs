use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use store::{
    DocumentStore, FoodTruck, FoodTruckUpdate, OperatingHours, Review, StoreError, StoreResult,
    User, UserUpdate,
};
use uuid::Uuid;

/// [`DocumentStore`] backed by PostgreSQL.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    async fn user_exists(&self, id: Uuid) -> StoreResult<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        Ok(row.is_some())
    }

    async fn food_truck_exists(&self, id: Uuid) -> StoreResult<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM food_trucks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        Ok(row.is_some())
    }

    /// Append `value` to the `column` id array of user `user_id` unless already present.
    async fn push_user_id(&self, column: &str, user_id: Uuid, value: Uuid) -> StoreResult<()> {
        let sql = format!(
            "UPDATE users SET {column} = CASE WHEN $2 = ANY({column}) THEN {column} \
             ELSE array_append({column}, $2) END WHERE id = $1"
        );
        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// Map a sqlx error, recognising unique-key violations.
fn backend(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let field = match db.constraint() {
                Some("users_email_key") => "email",
                _ => "id",
            };
            return StoreError::Duplicate { field };
        }
    }
    StoreError::Backend(err.to_string())
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    date_of_birth: chrono::DateTime<chrono::Utc>,
    phone_number: Option<String>,
    city: Option<String>,
    state: Option<String>,
    reviews: Vec<Uuid>,
    owned_food_trucks: Vec<Uuid>,
    favorites: Vec<Uuid>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password_hash: row.password_hash,
            date_of_birth: row.date_of_birth,
            phone_number: row.phone_number,
            city: row.city,
            state: row.state,
            reviews: row.reviews,
            owned_food_trucks: row.owned_food_trucks,
            favorites: row.favorites,
        }
    }
}

#[derive(FromRow)]
struct FoodTruckRow {
    id: Uuid,
    name: String,
    address: String,
    location: Vec<f64>,
    owner: Option<Uuid>,
    hours: Json<OperatingHours>,
    status: bool,
    avg_rating: f64,
    reviews: Vec<Uuid>,
    photos: Vec<String>,
    website: String,
    phone_number: String,
    description: String,
    tags: Vec<String>,
}

impl From<FoodTruckRow> for FoodTruck {
    fn from(row: FoodTruckRow) -> Self {
        let location = match row.location.as_slice() {
            [lat, lng, ..] => [*lat, *lng],
            _ => [0.0, 0.0],
        };
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            location,
            owner: row.owner,
            hours: row.hours.0,
            status: row.status,
            avg_rating: row.avg_rating,
            reviews: row.reviews,
            photos: row.photos,
            website: row.website,
            phone_number: row.phone_number,
            description: row.description,
            tags: row.tags,
        }
    }
}

#[derive(FromRow)]
struct ReviewRow {
    id: Uuid,
    reviewer: Option<Uuid>,
    reviewer_name: String,
    food_truck: Uuid,
    comment: String,
    rating: f64,
    date: chrono::DateTime<chrono::Utc>,
    origin: String,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            reviewer: row.reviewer,
            reviewer_name: row.reviewer_name,
            food_truck: row.food_truck,
            comment: row.comment,
            rating: row.rating,
            date: row.date,
            origin: row.origin,
        }
    }
}

impl DocumentStore for PgStore {
    async fn insert_user(&self, user: User) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, email, password_hash, date_of_birth,
                               phone_number, city, state, reviews, owned_food_trucks, favorites)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.date_of_birth)
        .bind(&user.phone_number)
        .bind(&user.city)
        .bind(&user.state)
        .bind(&user.reviews)
        .bind(&user.owned_food_trucks)
        .bind(&user.favorites)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        Ok(row.map(User::from))
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> StoreResult<()> {
        if update.is_empty() {
            return match self.user_exists(id).await? {
                true => Ok(()),
                false => Err(StoreError::NotFound),
            };
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(v) = update.first_name {
                set.push("first_name = ").push_bind_unseparated(v);
            }
            if let Some(v) = update.last_name {
                set.push("last_name = ").push_bind_unseparated(v);
            }
            if let Some(v) = update.email {
                set.push("email = ").push_bind_unseparated(v);
            }
            if let Some(v) = update.phone_number {
                set.push("phone_number = ").push_bind_unseparated(v);
            }
            if let Some(v) = update.city {
                set.push("city = ").push_bind_unseparated(v);
            }
            if let Some(v) = update.state {
                set.push("state = ").push_bind_unseparated(v);
            }
            if let Some(v) = update.date_of_birth {
                set.push("date_of_birth = ").push_bind_unseparated(v);
            }
            if let Some(v) = update.favorites {
                set.push("favorites = ").push_bind_unseparated(v);
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&self.pool).await.map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn push_user_review(&self, user_id: Uuid, review_id: Uuid) -> StoreResult<()> {
        self.push_user_id("reviews", user_id, review_id).await
    }

    async fn push_owned_food_truck(&self, user_id: Uuid, food_truck_id: Uuid) -> StoreResult<()> {
        self.push_user_id("owned_food_trucks", user_id, food_truck_id)
            .await
    }

    async fn insert_food_truck(&self, truck: FoodTruck) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO food_trucks (id, name, address, location, owner, hours, status,
                                     avg_rating, reviews, photos, website, phone_number,
                                     description, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(truck.id)
        .bind(&truck.name)
        .bind(&truck.address)
        .bind(truck.location.to_vec())
        .bind(truck.owner)
        .bind(Json(&truck.hours))
        .bind(truck.status)
        .bind(truck.avg_rating)
        .bind(&truck.reviews)
        .bind(&truck.photos)
        .bind(&truck.website)
        .bind(&truck.phone_number)
        .bind(&truck.description)
        .bind(&truck.tags)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn find_food_truck(&self, id: Uuid) -> StoreResult<Option<FoodTruck>> {
        let row: Option<FoodTruckRow> = sqlx::query_as("SELECT * FROM food_trucks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        Ok(row.map(FoodTruck::from))
    }

    async fn list_food_trucks(&self) -> StoreResult<Vec<FoodTruck>> {
        let rows: Vec<FoodTruckRow> = sqlx::query_as("SELECT * FROM food_trucks ORDER BY seq")
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(FoodTruck::from).collect())
    }

    async fn update_food_truck(&self, id: Uuid, update: FoodTruckUpdate) -> StoreResult<()> {
        if update.is_empty() {
            return match self.food_truck_exists(id).await? {
                true => Ok(()),
                false => Err(StoreError::NotFound),
            };
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE food_trucks SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(v) = update.name {
                set.push("name = ").push_bind_unseparated(v);
            }
            if let Some(v) = update.address {
                set.push("address = ").push_bind_unseparated(v);
            }
            if let Some(v) = update.location {
                set.push("location = ").push_bind_unseparated(v.to_vec());
            }
            if let Some(v) = update.status {
                set.push("status = ").push_bind_unseparated(v);
            }
            if let Some(v) = update.hours {
                set.push("hours = ").push_bind_unseparated(Json(v));
            }
            if let Some(v) = update.photos {
                set.push("photos = ").push_bind_unseparated(v);
            }
            if let Some(v) = update.website {
                set.push("website = ").push_bind_unseparated(v);
            }
            if let Some(v) = update.phone_number {
                set.push("phone_number = ").push_bind_unseparated(v);
            }
            if let Some(v) = update.description {
                set.push("description = ").push_bind_unseparated(v);
            }
            if let Some(v) = update.tags {
                set.push("tags = ").push_bind_unseparated(v);
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&self.pool).await.map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn attach_review(
        &self,
        food_truck_id: Uuid,
        review_id: Uuid,
        rating: f64,
    ) -> StoreResult<FoodTruck> {
        // Right-hand sides see the row as it was before the update.
        let updated: Option<FoodTruckRow> = sqlx::query_as(
            r#"
            UPDATE food_trucks
            SET avg_rating = (avg_rating * cardinality(reviews) + $3) / (cardinality(reviews) + 1),
                reviews = array_append(reviews, $2)
            WHERE id = $1 AND NOT ($2 = ANY(reviews))
            RETURNING *
            "#,
        )
        .bind(food_truck_id)
        .bind(review_id)
        .bind(rating)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        match updated {
            Some(row) => Ok(row.into()),
            // Either already attached or no such truck.
            None => self
                .find_food_truck(food_truck_id)
                .await?
                .ok_or(StoreError::NotFound),
        }
    }

    async fn insert_review(&self, review: Review) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, reviewer, reviewer_name, food_truck, comment, rating, date, origin)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(review.id)
        .bind(review.reviewer)
        .bind(&review.reviewer_name)
        .bind(review.food_truck)
        .bind(&review.comment)
        .bind(review.rating)
        .bind(review.date)
        .bind(&review.origin)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn find_review(&self, id: Uuid) -> StoreResult<Option<Review>> {
        let row: Option<ReviewRow> = sqlx::query_as("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        Ok(row.map(Review::from))
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        let rows: Vec<ReviewRow> = sqlx::query_as("SELECT * FROM reviews ORDER BY seq")
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn find_reviews(&self, ids: &[Uuid]) -> StoreResult<Vec<Review>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<ReviewRow> = sqlx::query_as("SELECT * FROM reviews WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        let mut found: std::collections::HashMap<Uuid, Review> = rows
            .into_iter()
            .map(|row| (row.id, Review::from(row)))
            .collect();
        Ok(ids.iter().filter_map(|id| found.remove(id)).collect())
    }
}

// Run with `DATABASE_URL=postgres://... cargo test -p api -- --ignored`.
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use store::APP_ORIGIN;

    fn user(email: &str) -> User {
        User::new(
            "some".to_string(),
            "tester".to_string(),
            email.to_string(),
            "hash".to_string(),
            Utc::now(),
        )
    }

    fn truck() -> FoodTruck {
        FoodTruck {
            id: Uuid::new_v4(),
            name: "Taco Town".to_string(),
            address: "1 Main St".to_string(),
            location: [29.65, -82.32],
            owner: None,
            hours: OperatingHours(std::array::from_fn(|_| {
                ["08:00".to_string(), "17:00".to_string()]
            })),
            status: false,
            avg_rating: 0.0,
            reviews: Vec::new(),
            photos: Vec::new(),
            website: String::new(),
            phone_number: String::new(),
            description: String::new(),
            tags: vec!["tacos".to_string()],
        }
    }

    fn review(food_truck: Uuid, rating: f64) -> Review {
        Review {
            id: Uuid::new_v4(),
            reviewer: None,
            reviewer_name: "bob".to_string(),
            food_truck,
            comment: String::new(),
            rating,
            date: Utc::now(),
            origin: APP_ORIGIN.to_string(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_duplicate_keys(pool: PgPool) {
        let store = PgStore::new(pool);
        let first = user("a@x.com");
        store.insert_user(first.clone()).await.unwrap();

        assert_eq!(
            store.insert_user(user("a@x.com")).await,
            Err(StoreError::Duplicate { field: "email" })
        );

        let mut same_id = user("b@x.com");
        same_id.id = first.id;
        assert_eq!(
            store.insert_user(same_id).await,
            Err(StoreError::Duplicate { field: "id" })
        );

        store.insert_user(user("b@x.com")).await.unwrap();
        let taken = UserUpdate {
            email: Some("a@x.com".to_string()),
            ..Default::default()
        };
        let b = store.find_user_by_email("b@x.com").await.unwrap().unwrap();
        assert_eq!(
            store.update_user(b.id, taken).await,
            Err(StoreError::Duplicate { field: "email" })
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_attach_review_is_atomic_and_idempotent(pool: PgPool) {
        let store = PgStore::new(pool);
        let truck = truck();
        store.insert_food_truck(truck.clone()).await.unwrap();

        let first = review(truck.id, 4.0);
        let second = review(truck.id, 2.0);
        store.attach_review(truck.id, first.id, first.rating).await.unwrap();
        let updated = store
            .attach_review(truck.id, second.id, second.rating)
            .await
            .unwrap();
        assert_eq!(updated.reviews, vec![first.id, second.id]);
        assert!((updated.avg_rating - 3.0).abs() < 1e-9);

        let again = store.attach_review(truck.id, first.id, first.rating).await.unwrap();
        assert_eq!(again, updated);

        assert_eq!(
            store.attach_review(Uuid::new_v4(), first.id, 1.0).await,
            Err(StoreError::NotFound)
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_round_trip_and_partial_update(pool: PgPool) {
        let store = PgStore::new(pool);
        let truck = truck();
        store.insert_food_truck(truck.clone()).await.unwrap();
        assert_eq!(store.find_food_truck(truck.id).await.unwrap(), Some(truck.clone()));

        let update = FoodTruckUpdate {
            status: Some(true),
            description: Some("open late".to_string()),
            ..Default::default()
        };
        store.update_food_truck(truck.id, update).await.unwrap();
        let stored = store.find_food_truck(truck.id).await.unwrap().unwrap();
        assert!(stored.status);
        assert_eq!(stored.description, "open late");
        assert_eq!(stored.hours, truck.hours);
        assert_eq!(
            store
                .update_food_truck(Uuid::new_v4(), FoodTruckUpdate::default())
                .await,
            Err(StoreError::NotFound)
        );

        let a = review(truck.id, 5.0);
        let b = review(truck.id, 1.0);
        store.insert_review(a.clone()).await.unwrap();
        store.insert_review(b.clone()).await.unwrap();
        let found = store
            .find_reviews(&[b.id, Uuid::new_v4(), a.id])
            .await
            .unwrap();
        assert_eq!(found.iter().map(|r| r.id).collect::<Vec<_>>(), vec![b.id, a.id]);
    }
}
