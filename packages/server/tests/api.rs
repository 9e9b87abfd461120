use api::AuthConfig;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use munch_server::{router, AppState};
use serde_json::{json, Value};
use store::MemoryStore;
use tower::ServiceExt;

fn app() -> Router {
    router(AppState::new(
        MemoryStore::new(),
        &AuthConfig::new("integration-secret"),
    ))
}

struct Call<'a> {
    method: Method,
    uri: &'a str,
    token: Option<&'a str>,
    user_agent: Option<&'a str>,
    body: Option<Value>,
}

impl<'a> Call<'a> {
    fn new(method: Method, uri: &'a str) -> Self {
        Self {
            method,
            uri,
            token: None,
            user_agent: None,
            body: None,
        }
    }

    fn token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    fn agent(mut self, agent: &'a str) -> Self {
        self.user_agent = Some(agent);
        self
    }

    fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    async fn send(self, app: &Router) -> (StatusCode, Value) {
        let mut req = Request::builder().method(self.method).uri(self.uri);
        if let Some(token) = self.token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(agent) = self.user_agent {
            req = req.header(header::USER_AGENT, agent);
        }
        let req = match self.body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };

        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

fn week(open: &str, close: &str) -> Value {
    json!(vec![[open, close]; 7])
}

async fn register_and_login(app: &Router, email: &str) -> String {
    let (status, _) = Call::new(Method::POST, "/register")
        .json(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": email,
            "password": "password123",
            "dateOfBirth": "1969-04-20T05:00:00.000Z",
        }))
        .send(app)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = Call::new(Method::POST, "/login")
        .json(json!({ "email": email, "password": "password123" }))
        .send(app)
        .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn create_truck(app: &Router, token: &str) -> String {
    let (status, _) = Call::new(Method::POST, "/foodtrucks")
        .token(token)
        .json(json!({
            "name": "Taco Town",
            "address": "1 Main St",
            "hours": week("08:00", "17:00"),
            "photos": [],
        }))
        .send(app)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, profile) = Call::new(Method::GET, "/profile")
        .token(token)
        .send(app)
        .await;
    profile["ownedFoodTrucks"][0].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = Call::new(Method::GET, "/health").send(&app()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_review_scenario() {
    let app = app();
    let token = register_and_login(&app, "a@x.com").await;
    let truck = create_truck(&app, &token).await;

    let (status, first) = Call::new(Method::POST, "/reviews")
        .token(&token)
        .json(json!({ "foodTruck": truck, "rating": 4.0, "comment": "great" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["origin"], "munchapp");
    assert!(first["reviewer"].is_string());

    let (_, listed) = Call::new(Method::GET, &format!("/foodtrucks/{truck}"))
        .send(&app)
        .await;
    assert_eq!(listed["avgRating"], 4.0);
    assert_eq!(listed["reviews"], json!([first["id"]]));

    let (status, second) = Call::new(Method::POST, "/reviews")
        .json(json!({ "foodTruck": truck, "rating": 2.0, "reviewerName": "bob" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(second["reviewer"].is_null());
    assert_eq!(second["reviewerName"], "bob");

    let (_, listed) = Call::new(Method::GET, &format!("/foodtrucks/{truck}"))
        .send(&app)
        .await;
    assert_eq!(listed["avgRating"], 3.0);
    assert_eq!(listed["reviews"].as_array().unwrap().len(), 2);

    let (_, profile) = Call::new(Method::GET, "/profile")
        .token(&token)
        .send(&app)
        .await;
    assert_eq!(profile["reviews"], json!([first["id"]]));
    assert!(profile.get("passwordHash").is_none());

    let (status, reviews) = Call::new(Method::GET, &format!("/foodtrucks/{truck}/reviews"))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews[0]["id"], first["id"]);
    assert_eq!(reviews[1]["id"], second["id"]);

    let (status, review) = Call::new(Method::GET, &format!("/reviews/{}", first["id"].as_str().unwrap()))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(review["comment"], "great");

    let (_, all) = Call::new(Method::GET, "/reviews").send(&app).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_auth_failures() {
    let app = app();
    register_and_login(&app, "a@x.com").await;

    let (status, body) = Call::new(Method::POST, "/login")
        .json(json!({ "email": "a@x.com", "password": "notMyPassword" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = Call::new(Method::POST, "/login")
        .json(json!({ "email": "invalid@email.com", "password": "password123" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = Call::new(Method::GET, "/profile")
        .token("not-a-token")
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = Call::new(Method::GET, "/profile").send(&app).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A bad token is rejected even where anonymous callers are allowed.
    let (status, _) = Call::new(Method::POST, "/reviews")
        .token("not-a-token")
        .json(json!({ "foodTruck": uuid::Uuid::new_v4(), "rating": 3.0, "reviewerName": "bob" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejections() {
    let app = app();
    register_and_login(&app, "a@x.com").await;

    let (status, body) = Call::new(Method::POST, "/register")
        .json(json!({
            "firstName": "Other",
            "lastName": "Person",
            "email": "A@X.com",
            "password": "password123",
            "dateOfBirth": "1990-01-01T00:00:00Z",
        }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, _) = Call::new(Method::POST, "/register")
        .json(json!({ "email": "b@x.com", "password": "password123" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = Call::new(Method::POST, "/register")
        .json(json!({ "email": "b@x.com", "isAdmin": true }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_food_truck_rules() {
    let app = app();
    let owner = register_and_login(&app, "owner@x.com").await;
    let other = register_and_login(&app, "other@x.com").await;
    let truck = create_truck(&app, &owner).await;

    let (status, _) = Call::new(Method::POST, "/foodtrucks")
        .json(json!({
            "name": "Anon Eats",
            "address": "2 Main St",
            "hours": week("08:00", "17:00"),
            "photos": [],
        }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = Call::new(Method::POST, "/foodtrucks")
        .token(&owner)
        .json(json!({
            "name": "Bad Hours",
            "address": "3 Main St",
            "hours": week("8am", "17:00"),
            "photos": [],
        }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = Call::new(Method::POST, "/foodtrucks")
        .agent("MunchCritic/1.0")
        .json(json!({
            "name": "Scraped Tacos",
            "address": "4 Main St",
            "hours": week("10:00", "22:00"),
            "photos": ["a.jpg"],
            "tags": ["tacos"],
        }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, trucks) = Call::new(Method::GET, "/foodtrucks").send(&app).await;
    let trucks = trucks.as_array().unwrap();
    assert_eq!(trucks.len(), 2);
    assert!(trucks[1]["owner"].is_null());

    let path = format!("/foodtrucks/{truck}");
    let (status, _) = Call::new(Method::PUT, &path)
        .token(&other)
        .json(json!({ "status": true }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = Call::new(Method::PUT, &path)
        .token(&owner)
        .json(json!({ "avgRating": 5.0 }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = Call::new(Method::PUT, &path)
        .token(&owner)
        .json(json!({ "status": true, "hours": week("09:00", "5") }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = Call::new(Method::PUT, &path)
        .token(&owner)
        .json(json!({ "status": true, "description": "open late" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, updated) = Call::new(Method::GET, &path).send(&app).await;
    assert_eq!(updated["status"], true);
    assert_eq!(updated["description"], "open late");
    assert_eq!(updated["name"], "Taco Town");
    assert_eq!(updated["hours"], week("08:00", "17:00"));
}

#[tokio::test]
async fn test_users_and_missing_resources() {
    let app = app();
    let token = register_and_login(&app, "a@x.com").await;
    let (_, profile) = Call::new(Method::GET, "/profile")
        .token(&token)
        .send(&app)
        .await;
    let id = profile["id"].as_str().unwrap().to_string();

    let (status, public) = Call::new(Method::GET, &format!("/users/{id}"))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(public["firstName"], "Ada");
    assert!(public.get("email").is_none());
    assert!(public.get("favorites").is_none());

    let (status, _) = Call::new(Method::PUT, &format!("/users/{id}"))
        .token(&token)
        .json(json!({ "city": "Gainesville", "state": "FL" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, profile) = Call::new(Method::GET, "/profile")
        .token(&token)
        .send(&app)
        .await;
    assert_eq!(profile["city"], "Gainesville");

    let (status, _) = Call::new(Method::PUT, &format!("/users/{id}"))
        .json(json!({ "city": "Nowhere" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let missing = uuid::Uuid::new_v4();
    for uri in [
        format!("/users/{missing}"),
        format!("/foodtrucks/{missing}"),
        format!("/foodtrucks/{missing}/reviews"),
        format!("/reviews/{missing}"),
        "/reviews/not-an-id".to_string(),
    ] {
        let (status, body) = Call::new(Method::GET, &uri).send(&app).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body["error"].is_string());
    }

    let (status, _) = Call::new(Method::POST, "/reviews")
        .json(json!({ "foodTruck": missing, "rating": 3.0, "reviewerName": "bob" }))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, trucks) = Call::new(Method::GET, "/foodtrucks").send(&app).await;
    assert_eq!(trucks, json!([]));
}
