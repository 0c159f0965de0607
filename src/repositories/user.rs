//! User repository for registration and credential lookup

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use serde_json::{Map, Value};
use sqlx::PgPool;
use tracing::{error, info};

use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::validation::{USER_FIELDS, string_field, unknown_fields};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new user. Accumulates every validation reason
    /// (missing/taken username, missing/taken phone number, missing
    /// password); unrecognized payload fields are rejected immediately.
    /// The password is stored only as a salted Argon2 hash.
    pub async fn register(&self, payload: &Map<String, Value>) -> ApiResult<User> {
        if let Some(reason) = unknown_fields(payload, USER_FIELDS) {
            return Err(ApiError::Validation(vec![reason]));
        }

        let mut reasons = Vec::new();

        let username = string_field(payload, "username");
        match &username {
            None => reasons.push("username is required".to_string()),
            Some(username) => {
                if self.username_exists(username).await? {
                    reasons.push("username already exists".to_string());
                }
            }
        }

        let phone_number = string_field(payload, "phone_number");
        match &phone_number {
            None => reasons.push("phone_number is required".to_string()),
            Some(phone_number) => {
                if self.phone_number_exists(phone_number).await? {
                    reasons.push("phone_number already exists".to_string());
                }
            }
        }

        let password = string_field(payload, "password");
        if password.is_none() {
            reasons.push("password is required".to_string());
        }

        if !reasons.is_empty() {
            return Err(ApiError::Validation(reasons));
        }

        let username = username.unwrap_or_default();
        let password_hash = hash_password(&password.unwrap_or_default())?;

        info!("Creating new user: {}", username);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, phone_number, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, phone_number, password_hash, created_at
            "#,
        )
        .bind(&username)
        .bind(&phone_number)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, phone_number, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn username_exists(&self, username: &str) -> ApiResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn phone_number_exists(&self, phone_number: &str) -> ApiResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE phone_number = $1)")
                .bind(phone_number)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

/// Hash a password with a freshly generated salt
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::InternalServerError
        })?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored hash. An unparseable hash counts as
/// a mismatch.
pub fn verify_password(user: &User, password: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(&user.password_hash) else {
        error!("Stored password hash for user {} is unparseable", user.id);
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Two registrations can pass the exists-checks concurrently; the unique
/// constraints are the backstop, mapped back to the same validation reasons.
fn map_unique_violation(e: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let reason = if db.constraint() == Some("users_phone_number_key") {
                "phone_number already exists"
            } else {
                "username already exists"
            };
            return ApiError::Validation(vec![reason.to_string()]);
        }
    }
    ApiError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user_with_hash(password_hash: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: "guest".to_string(),
            phone_number: Some("555-0100".to_string()),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        let user = user_with_hash(&hash);

        assert!(verify_password(&user, "correct horse"));
        assert!(!verify_password(&user, "wrong horse"));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("same password").unwrap();
        let second = hash_password("same password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn unparseable_hash_is_a_mismatch() {
        let user = user_with_hash("not-a-phc-string");
        assert!(!verify_password(&user, "anything"));
    }

    #[test]
    fn serialized_user_never_contains_password_hash() {
        let user = user_with_hash(&hash_password("secret").unwrap());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "guest");
    }
}
