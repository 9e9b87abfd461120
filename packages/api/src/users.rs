//! # Identity component — registration, login, profiles
//!
//! | Operation | Caller | Result |
//! |-----------|--------|--------|
//! | [`register`](IdentityService::register) | anyone | stores a new user with an Argon2id hash and empty relationship lists |
//! | [`login`](IdentityService::login) | anyone | a signed token whose subject is the user id |
//! | [`profile`](IdentityService::profile) | signed-in user | [`UserProfile`] self-view |
//! | [`public_user`](IdentityService::public_user) | anyone | [`PublicUser`] projection |
//! | [`update_user`](IdentityService::update_user) | the user themself | partial update of profile fields |
//!
//! Emails are trimmed and lower-cased before they are stored or looked up, so
//! uniqueness is case-insensitive.

use store::{DocumentStore, User, UserUpdate};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, Identity, TokenIssuer};
use crate::error::{parse_id, ApiError, ApiResult};
use crate::models::{
    LoginRequest, LoginResponse, PublicUser, RegisterRequest, UpdateUserRequest, UserProfile,
};

/// Identity operations over a [`DocumentStore`].
#[derive(Clone)]
pub struct IdentityService<S> {
    store: S,
    tokens: TokenIssuer,
}

/// Require a non-blank string field.
pub(crate) fn required(value: Option<String>, field: &str) -> ApiResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ApiError::validation(format!("{field} is required"))),
    }
}

fn normalize_email(email: &str) -> ApiResult<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::validation("invalid email address"));
    }
    Ok(email)
}

/// Reject a signed token whose account no longer exists, before anything is written for it.
pub(crate) async fn ensure_account<S: DocumentStore>(store: &S, id: Uuid) -> ApiResult<()> {
    match store.find_user(id).await? {
        Some(_) => Ok(()),
        None => {
            warn!("token for missing user {}", id);
            Err(ApiError::Auth("account no longer exists".to_string()))
        }
    }
}

fn invalid_credentials() -> ApiError {
    ApiError::Auth("invalid email or password".to_string())
}

impl<S: DocumentStore> IdentityService<S> {
    pub fn new(store: S, tokens: TokenIssuer) -> Self {
        Self { store, tokens }
    }

    /// Register a new account.
    pub async fn register(&self, req: RegisterRequest) -> ApiResult<()> {
        let first_name = required(req.first_name, "firstName")?;
        let last_name = required(req.last_name, "lastName")?;
        let email = normalize_email(&required(req.email, "email")?)?;
        let password = match req.password {
            Some(p) if !p.is_empty() => p,
            _ => return Err(ApiError::validation("password is required")),
        };
        let date_of_birth = req
            .date_of_birth
            .ok_or_else(|| ApiError::validation("dateOfBirth is required"))?;

        let password_hash = hash_password(&password)?;
        let user = User::new(first_name, last_name, email, password_hash, date_of_birth);
        let id = user.id;

        self.store.insert_user(user).await?;
        info!("registered user {}", id);
        Ok(())
    }

    /// Check credentials and issue a token.
    pub async fn login(&self, req: LoginRequest) -> ApiResult<LoginResponse> {
        let (Some(email), Some(password)) = (req.email, req.password) else {
            return Err(ApiError::validation("email and password are required"));
        };
        let email = email.trim().to_lowercase();

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            warn!("login attempt for unknown email");
            return Err(invalid_credentials());
        };

        if !verify_password(&password, &user.password_hash)? {
            warn!("wrong password for user {}", user.id);
            return Err(invalid_credentials());
        }

        let token = self.tokens.issue(user.id)?;
        Ok(LoginResponse { token })
    }

    /// Self-view of the signed-in user.
    pub async fn profile(&self, identity: Identity) -> ApiResult<UserProfile> {
        let id = identity.require_user()?;
        let user = self
            .store
            .find_user(id)
            .await?
            .ok_or_else(|| ApiError::not_found("user"))?;
        Ok(UserProfile::from(&user))
    }

    /// Public projection of any user.
    pub async fn public_user(&self, id: &str) -> ApiResult<PublicUser> {
        let id = parse_id(id, "user")?;
        let user = self
            .store
            .find_user(id)
            .await?
            .ok_or_else(|| ApiError::not_found("user"))?;
        Ok(PublicUser::from(&user))
    }

    /// Apply the present fields of `req` to the caller's own account.
    pub async fn update_user(
        &self,
        identity: Identity,
        id: &str,
        req: UpdateUserRequest,
    ) -> ApiResult<()> {
        let caller = identity.require_user()?;
        let id = parse_id(id, "user")?;
        if caller != id {
            return Err(ApiError::Forbidden(
                "users may only update their own account".to_string(),
            ));
        }

        let update = UserUpdate {
            first_name: req
                .first_name
                .map(|v| required(Some(v), "firstName"))
                .transpose()?,
            last_name: req
                .last_name
                .map(|v| required(Some(v), "lastName"))
                .transpose()?,
            email: req.email.as_deref().map(normalize_email).transpose()?,
            phone_number: req.phone_number,
            city: req.city,
            state: req.state,
            date_of_birth: req.date_of_birth,
            favorites: req.favorites,
        };

        if update.is_empty() {
            return match self.store.find_user(id).await? {
                Some(_) => Ok(()),
                None => Err(ApiError::not_found("user")),
            };
        }

        self.store
            .update_user(id, update)
            .await
            .map_err(ApiError::from_store("user"))
    }
}
