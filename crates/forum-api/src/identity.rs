use std::ops::RangeInclusive;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{SaltString, rand_core::OsRng},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::error;
use uuid::Uuid;

use forum_db::Database;
use forum_types::api::{Claims, UpdateResult};
use forum_types::models::Profile;

use crate::error::ApiError;

const USERNAME_LEN: RangeInclusive<usize> = 3..=32;
const MIN_PASSWORD_LEN: usize = 8;

/// Credential hashing and bearer tokens.
///
/// Tokens are stateless HS256 JWTs; nothing is stored server-side and a token
/// stays valid until it expires.
#[derive(Clone)]
pub struct Identity {
    hasher: Argon2<'static>,
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: chrono::Duration,
}

impl Identity {
    pub fn new(secret: &str, token_ttl: chrono::Duration) -> Self {
        Self {
            hasher: Argon2::default(),
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
        }
    }

    /// Replace the Argon2id cost parameters. Existing hashes still verify,
    /// since each hash string carries its own parameters.
    pub fn with_hash_params(mut self, params: Params) -> Self {
        self.hasher = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        self
    }

    pub fn register(
        &self,
        db: &Database,
        username: &str,
        password: &str,
        description: Option<&str>,
    ) -> Result<Uuid, ApiError> {
        if !USERNAME_LEN.contains(&username.chars().count()) {
            return Err(ApiError::Validation(format!(
                "username must be {} to {} characters",
                USERNAME_LEN.start(),
                USERNAME_LEN.end()
            )));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        // Cheap early answer; the unique index still decides races.
        if db.user_exists(username)? {
            return Err(ApiError::Conflict("username"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .hasher
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                error!("Password hashing failed: {}", e);
                ApiError::Internal
            })?
            .to_string();

        Ok(db.create_user(username, &password_hash, description)?)
    }

    /// Check a username/password pair and issue a bearer token.
    pub fn authenticate(
        &self,
        db: &Database,
        username: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let user = db
            .get_user_by_username(username)?
            .ok_or(ApiError::InvalidCredentials)?;

        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
            error!("Stored hash for '{}' is unreadable: {}", user.username, e);
            ApiError::Internal
        })?;

        self.hasher
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| ApiError::InvalidCredentials)?;

        self.issue_token(user.id, &user.username)
    }

    pub fn issue_token(&self, user_id: Uuid, username: &str) -> Result<String, ApiError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + self.token_ttl).timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|e| {
            error!("Token signing failed: {}", e);
            ApiError::Internal
        })
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn resolve_token(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ApiError::InvalidToken)
    }

    pub fn profile(&self, db: &Database, username: &str) -> Result<Profile, ApiError> {
        db.get_profile(username)?.ok_or(ApiError::NotFound("user"))
    }

    pub fn update_description(
        &self,
        db: &Database,
        username: &str,
        description: &str,
    ) -> Result<UpdateResult, ApiError> {
        Ok(db.update_description(username, description)?)
    }
}
