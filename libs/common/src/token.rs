//! Session tokens
//!
//! Tokens are HS256-signed JWTs carrying the user id as a `userId` claim.
//! Expiry is checked when the token has an `exp` claim and is not required
//! otherwise.

use anyhow::Result;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    time::{SystemTime, UNIX_EPOCH},
};
use thiserror::Error;
use uuid::Uuid;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "token";

/// Token configuration
#[derive(Clone)]
pub struct TokenConfig {
    /// Shared HMAC secret
    pub secret: String,
    /// Token lifetime in seconds (default: 1 hour)
    pub expiry: u64,
}

impl TokenConfig {
    /// Create a new TokenConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Shared signing secret (required)
    /// - `JWT_EXPIRY`: Token lifetime in seconds (default: 3600)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        if secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let expiry = match std::env::var("JWT_EXPIRY") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("Invalid JWT_EXPIRY {:?}: {}", raw, e))?,
            Err(_) => 3600,
        };

        Ok(TokenConfig { secret, expiry })
    }
}

/// Session token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    /// Issued at time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    /// Expiration time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

/// Reasons a token is refused
#[derive(Error, Debug)]
pub enum TokenError {
    /// The token's `exp` is in the past
    #[error("token expired")]
    Expired,

    /// Bad signature, malformed token or unexpected claims
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// Signing failed
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry: u64,
}

impl TokenService {
    /// Initialize a new token service
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::new();

        TokenService {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            expiry: config.expiry,
        }
    }

    /// Issue a token for `user_id` valid for the configured lifetime
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = now();
        self.sign(&Claims {
            user_id,
            iat: Some(now),
            exp: Some(now + self.expiry),
        })
    }

    /// Sign arbitrary claims
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verify a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            })
    }

    /// Token lifetime in seconds
    pub fn expiry(&self) -> u64 {
        self.expiry
    }
}

/// Current unix time in seconds
pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&TokenConfig {
            secret: secret.to_string(),
            expiry: 3600,
        })
    }

    #[test]
    fn test_issued_token_verifies() {
        let tokens = service("manarat");
        let user_id = Uuid::new_v4();

        let claims = tokens.verify(&tokens.issue(user_id).unwrap()).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.exp, claims.iat.map(|iat| iat + 3600));
    }

    #[test]
    fn test_token_from_other_secret_is_invalid() {
        let token = service("someone-else").issue(Uuid::new_v4()).unwrap();
        assert!(matches!(
            service("manarat").verify(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = service("manarat");
        let token = tokens
            .sign(&Claims {
                user_id: Uuid::new_v4(),
                iat: Some(now() - 7200),
                exp: Some(now() - 3600),
            })
            .unwrap();

        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_just_expired_token_is_rejected() {
        let tokens = service("manarat");
        let token = tokens
            .sign(&Claims {
                user_id: Uuid::new_v4(),
                iat: Some(now() - 60),
                exp: Some(now() - 2),
            })
            .unwrap();

        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_token_without_expiry_is_accepted() {
        let tokens = service("manarat");
        let user_id = Uuid::new_v4();
        let token = tokens
            .sign(&Claims {
                user_id,
                iat: None,
                exp: None,
            })
            .unwrap();

        assert_eq!(tokens.verify(&token).unwrap().user_id, user_id);
    }

    #[test]
    fn test_malformed_tokens_are_invalid() {
        let tokens = service("manarat");
        for token in ["", "not-a-jwt", "a.b.c"] {
            assert!(matches!(tokens.verify(token), Err(TokenError::Invalid(_))));
        }
    }

    #[test]
    fn test_token_without_user_id_is_invalid() {
        let tokens = service("manarat");
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({"sub": "someone", "exp": now() + 60}),
            &EncodingKey::from_secret(b"manarat"),
        )
        .unwrap();

        assert!(matches!(tokens.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    #[serial]
    fn test_token_config_requires_secret() {
        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("JWT_EXPIRY");
        }
        assert!(TokenConfig::from_env().is_err());

        unsafe {
            std::env::set_var("JWT_SECRET", "from-env");
            std::env::set_var("JWT_EXPIRY", "120");
        }
        let config = TokenConfig::from_env().unwrap();
        assert_eq!(config.secret, "from-env");
        assert_eq!(config.expiry, 120);

        unsafe {
            std::env::set_var("JWT_EXPIRY", "1h");
        }
        assert!(TokenConfig::from_env().is_err());

        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("JWT_EXPIRY");
        }
    }
}
