pub mod error;
pub mod models;
pub mod repo;

mod memory;
pub use memory::MemoryStore;

pub use error::{StoreError, StoreResult};
pub use models::{
    FoodTruck, FoodTruckUpdate, OperatingHours, Review, User, UserUpdate, APP_ORIGIN,
};
pub use repo::{rolling_average, DocumentStore};
