use api::{AuthConfig, Authenticator, FoodTruckRegistry, IdentityService, ReviewLedger};
use store::DocumentStore;

/// Shared handler state: one instance of each component over the same store.
#[derive(Clone)]
pub struct AppState<S> {
    pub authenticator: Authenticator,
    pub identity: IdentityService<S>,
    pub food_trucks: FoodTruckRegistry<S>,
    pub reviews: ReviewLedger<S>,
}

impl<S: DocumentStore> AppState<S> {
    pub fn new(store: S, auth: &AuthConfig) -> Self {
        let authenticator = Authenticator::new(auth);
        Self {
            identity: IdentityService::new(store.clone(), authenticator.tokens().clone()),
            food_trucks: FoodTruckRegistry::new(store.clone()),
            reviews: ReviewLedger::new(store),
            authenticator,
        }
    }
}
