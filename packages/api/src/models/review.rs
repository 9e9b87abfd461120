use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Body of `POST /reviews`.
///
/// `foodTruck` and `rating` are required; `reviewerName` is required only when
/// the caller is not signed in. `date` defaults to now and `origin` to
/// [`store::APP_ORIGIN`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewReviewRequest {
    pub reviewer_name: Option<String>,
    pub food_truck: Option<String>,
    #[serde(default)]
    pub comment: String,
    pub rating: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    pub origin: Option<String>,
}
