//! JWT service for token issuance and validation
//!
//! Issues an access/refresh token pair signed with HS256. The two lifetimes
//! are configured independently through environment variables, in minutes.

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Access token lifetime in minutes (default: 5)
    pub access_token_lifetime: u64,
    /// Refresh token lifetime in minutes (default: 1440)
    pub refresh_token_lifetime: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Secret used to sign and verify tokens
    /// - `ACCESS_TOKEN_LIFETIME`: Access token lifetime in minutes (default: 5)
    /// - `REFRESH_TOKEN_LIFETIME`: Refresh token lifetime in minutes (default: 1440)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        let access_token_lifetime = std::env::var("ACCESS_TOKEN_LIFETIME")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);

        let refresh_token_lifetime = std::env::var("REFRESH_TOKEN_LIFETIME")
            .unwrap_or_else(|_| "1440".to_string())
            .parse()
            .unwrap_or(1440);

        Ok(JwtConfig {
            secret,
            access_token_lifetime,
            refresh_token_lifetime,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

/// Token type enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Access token
    Access,
    /// Refresh token
    Refresh,
}

/// An access/refresh token pair issued at login. Derived per login,
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Issue an access/refresh token pair for a user. A pure function of
    /// the current time, the identity, and the two configured lifetimes;
    /// whether the access token expires before the refresh token is a
    /// configuration responsibility, not enforced here.
    pub fn issue(&self, user_id: Uuid) -> Result<TokenPair> {
        let now = unix_now()?;
        Ok(TokenPair {
            access: self.sign(user_id, TokenType::Access, now)?,
            refresh: self.sign(user_id, TokenType::Refresh, now)?,
        })
    }

    /// Generate a standalone access token, used when exchanging a refresh
    /// token for a new access token.
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String> {
        self.sign(user_id, TokenType::Access, unix_now()?)
    }

    fn sign(&self, user_id: Uuid, token_type: TokenType, now: u64) -> Result<String> {
        let lifetime_minutes = match token_type {
            TokenType::Access => self.config.access_token_lifetime,
            TokenType::Refresh => self.config.refresh_token_lifetime,
        };

        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + lifetime_minutes * 60,
            token_type,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token's signature and expiry and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

fn unix_now() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
        .as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            access_token_lifetime: 5,
            refresh_token_lifetime: 1440,
        })
    }

    #[test]
    fn issued_pair_round_trips() {
        let service = test_service();
        let user_id = Uuid::new_v4();

        let pair = service.issue(user_id).unwrap();

        let access = service.validate_token(&pair.access).unwrap();
        assert_eq!(access.sub, user_id);
        assert_eq!(access.token_type, TokenType::Access);
        assert_eq!(access.exp - access.iat, 5 * 60);

        let refresh = service.validate_token(&pair.refresh).unwrap();
        assert_eq!(refresh.sub, user_id);
        assert_eq!(refresh.token_type, TokenType::Refresh);
        assert_eq!(refresh.exp - refresh.iat, 1440 * 60);

        // Under default lifetimes the access token expires first.
        assert!(access.exp < refresh.exp);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = test_service();
        let pair = service.issue(Uuid::new_v4()).unwrap();

        let mut tampered = pair.access.clone();
        tampered.pop();
        tampered.push('x');
        assert!(service.validate_token(&tampered).is_err());
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let service = test_service();
        let other = JwtService::new(JwtConfig {
            secret: "other-secret".to_string(),
            access_token_lifetime: 5,
            refresh_token_lifetime: 1440,
        });

        let pair = other.issue(Uuid::new_v4()).unwrap();
        assert!(service.validate_token(&pair.access).is_err());
    }

    #[test]
    #[serial]
    fn config_from_env_uses_documented_defaults() {
        unsafe {
            std::env::set_var("JWT_SECRET", "env-secret");
            std::env::remove_var("ACCESS_TOKEN_LIFETIME");
            std::env::remove_var("REFRESH_TOKEN_LIFETIME");
        }

        let config = JwtConfig::from_env().unwrap();
        assert_eq!(config.secret, "env-secret");
        assert_eq!(config.access_token_lifetime, 5);
        assert_eq!(config.refresh_token_lifetime, 1440);

        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
    }

    #[test]
    #[serial]
    fn config_from_env_reads_custom_lifetimes() {
        unsafe {
            std::env::set_var("JWT_SECRET", "env-secret");
            std::env::set_var("ACCESS_TOKEN_LIFETIME", "15");
            std::env::set_var("REFRESH_TOKEN_LIFETIME", "2880");
        }

        let config = JwtConfig::from_env().unwrap();
        assert_eq!(config.access_token_lifetime, 15);
        assert_eq!(config.refresh_token_lifetime, 2880);

        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("ACCESS_TOKEN_LIFETIME");
            std::env::remove_var("REFRESH_TOKEN_LIFETIME");
        }
    }

    #[test]
    #[serial]
    fn config_from_env_requires_secret() {
        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
        assert!(JwtConfig::from_env().is_err());
    }
}
