use serde::Deserialize;
use store::{FoodTruckUpdate, OperatingHours};

/// Body of `POST /foodtrucks`.
///
/// `name`, `address`, `hours` and `photos` are required; the rest default to
/// empty values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewFoodTruckRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub location: [f64; 2],
    pub hours: Option<OperatingHours>,
    pub photos: Option<Vec<String>>,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub description: String,
    pub tags: Option<Vec<String>>,
}

/// Body of `PUT /foodtrucks/{id}`; only present fields are written.
///
/// `avgRating`, `reviews` and `owner` are not accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateFoodTruckRequest {
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

impl From<UpdateFoodTruckRequest> for FoodTruckUpdate {
    fn from(req: UpdateFoodTruckRequest) -> Self {
        Self {
            name: req.name,
            address: req.address,
            location: req.location,
            status: req.status,
            hours: req.hours,
            photos: req.photos,
            website: req.website,
            phone_number: req.phone_number,
            description: req.description,
            tags: req.tags,
        }
    }
}
