//! Request bodies and response projections.

mod food_truck;
mod review;
mod user;

pub use food_truck::{NewFoodTruckRequest, UpdateFoodTruckRequest};
pub use review::NewReviewRequest;
pub use user::{
    LoginRequest, LoginResponse, PublicUser, RegisterRequest, UpdateUserRequest, UserProfile,
};
