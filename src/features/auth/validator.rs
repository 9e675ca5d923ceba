use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;

use super::model::{AccessClaims, AuthenticatedUser};
use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::users::services::UserService;

/// Verifies bearer tokens and resolves the caller against the store
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    user_service: Arc<UserService>,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig, user_service: Arc<UserService>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.jwt_leeway.as_secs();
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            user_service,
        }
    }

    /// Check signature and expiry, returning the raw claims
    pub fn decode_claims(&self, token: &str) -> Result<AccessClaims> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))
    }

    /// Validate the token and load the user with their active role grants.
    ///
    /// Fails with 401 when the user no longer exists.
    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        let claims = self.decode_claims(token)?;

        let user = self
            .user_service
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        let roles = self.user_service.active_roles(user.id).await?;
        let active_role = AuthenticatedUser::resolve_active_role(&roles, claims.role);

        Ok(AuthenticatedUser {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            roles,
            active_role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;
    use crate::features::auth::services::TokenService;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;
    use uuid::Uuid;

    fn auth_config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            token_ttl: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(0),
        }
    }

    fn validator(config: &AuthConfig) -> JwtValidator {
        // Never connects: only claim decoding is exercised here.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/investigation_hub_test")
            .unwrap();
        JwtValidator::new(config, Arc::new(UserService::new(pool)))
    }

    #[tokio::test]
    async fn test_issued_token_decodes_with_role() {
        let config = auth_config("0123456789abcdef0123456789abcdef");
        let tokens = TokenService::new(&config);
        let user_id = Uuid::new_v4();

        let token = tokens.issue(user_id, Some(Role::Investigator)).unwrap();
        let claims = validator(&config).decode_claims(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Some(Role::Investigator));
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_rejected() {
        let issuer = TokenService::new(&auth_config("another-secret-another-secret-xx"));
        let token = issuer.issue(Uuid::new_v4(), None).unwrap();

        let config = auth_config("0123456789abcdef0123456789abcdef");
        let err = validator(&config).decode_claims(&token).unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let config = auth_config("0123456789abcdef0123456789abcdef");
        let now = chrono::Utc::now().timestamp();
        let claims = AccessClaims {
            sub: Uuid::new_v4(),
            role: None,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(validator(&config).decode_claims(&token).is_err());
    }
}
