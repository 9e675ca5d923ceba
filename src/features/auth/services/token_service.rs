use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use std::time::Duration;
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AccessClaims, Role};

/// Issues HS256 access tokens for local accounts
pub struct TokenService {
    encoding_key: EncodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: config.token_ttl,
        }
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX)
    }

    /// Sign a token for `user_id`, optionally pinning the active role
    pub fn issue(&self, user_id: Uuid, role: Option<Role>) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: user_id,
            role,
            iat: now,
            exp: now.saturating_add(self.expires_in()),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign access token: {:?}", e);
            AppError::Internal(format!("Failed to sign access token: {}", e))
        })?;

        tracing::debug!(
            "Access token issued: user_id={}, role={:?}, expires_in={}",
            user_id,
            role,
            self.expires_in()
        );

        Ok(token)
    }
}
