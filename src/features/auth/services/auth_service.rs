use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    normalize_email, AuthResponseDto, LoginRequestDto, RegisterRequestDto, ToggleRoleResponseDto,
};
use crate::features::auth::model::{AuthenticatedUser, Role};
use crate::features::auth::services::password;
use crate::features::auth::services::token_service::TokenService;
use crate::features::users::services::{NewUser, UserService};
use std::sync::Arc;

const TOKEN_TYPE: &str = "Bearer";

/// Pick the role a toggle switches to.
///
/// A single active grant flips to the other role. With both grants the
/// switch is relative to the current role, treating "none" as client.
pub fn toggle_target(active_roles: &[Role], current: Option<Role>) -> Result<Role> {
    let has_client = active_roles.contains(&Role::Client);
    let has_investigator = active_roles.contains(&Role::Investigator);

    match (has_client, has_investigator) {
        (true, false) => Ok(Role::Investigator),
        (false, true) => Ok(Role::Client),
        (true, true) => Ok(current.unwrap_or(Role::Client).other()),
        (false, false) => Err(AppError::Validation(
            "User must have at least one role (client or investigator)".to_string(),
        )),
    }
}

/// Service for authentication operations (register, login, role toggle)
pub struct AuthService {
    user_service: Arc<UserService>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(user_service: Arc<UserService>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_service,
            token_service,
        }
    }

    /// Register a new user with the requested roles
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let email = normalize_email(&dto.email);

        if self.user_service.find_by_email(&email).await?.is_some() {
            return Err(AppError::Validation("Email already registered".to_string()));
        }

        let password_hash = password::hash_password(dto.password).await?;

        let mut roles = dto.roles;
        roles.sort_by_key(|r| *r as u8);
        roles.dedup();

        let (user, roles) = self
            .user_service
            .create_with_roles(NewUser {
                email,
                password_hash,
                first_name: dto.first_name,
                last_name: dto.last_name,
                roles,
            })
            .await?;

        let token = self.token_service.issue(user.id, None)?;

        Ok(AuthResponseDto {
            user: user.into_dto(roles),
            token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.token_service.expires_in(),
        })
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let invalid = || AppError::Validation("Invalid email or password".to_string());

        let user = self
            .user_service
            .find_by_email(&normalize_email(&dto.email))
            .await?
            .ok_or_else(invalid)?;

        let valid = password::verify_password(dto.password, user.password_hash.clone()).await?;
        if !valid {
            tracing::info!("Rejected login for user {}", user.id);
            return Err(invalid());
        }

        let roles = self.user_service.active_roles(user.id).await?;
        let token = self.token_service.issue(user.id, None)?;

        Ok(AuthResponseDto {
            user: user.into_dto(roles),
            token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.token_service.expires_in(),
        })
    }

    /// Switch the caller's active role and issue a token pinned to it
    pub async fn toggle_role(&self, user: &AuthenticatedUser) -> Result<ToggleRoleResponseDto> {
        let target = toggle_target(&user.roles, user.active_role)?;
        let roles = self.user_service.activate_role(user.id, target).await?;
        let token = self.token_service.issue(user.id, Some(target))?;

        tracing::info!(
            "Role toggled: user_id={}, from={:?}, to={}",
            user.id,
            user.active_role,
            target
        );

        Ok(ToggleRoleResponseDto {
            roles,
            active_role: target,
            token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.token_service.expires_in(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_grant_switches_to_other_role() {
        assert_eq!(toggle_target(&[Role::Client], None).unwrap(), Role::Investigator);
        assert_eq!(
            toggle_target(&[Role::Investigator], Some(Role::Investigator)).unwrap(),
            Role::Client
        );
    }

    #[test]
    fn test_dual_grant_flips_relative_to_current() {
        let both = [Role::Client, Role::Investigator];
        assert_eq!(
            toggle_target(&both, Some(Role::Client)).unwrap(),
            Role::Investigator
        );
        assert_eq!(
            toggle_target(&both, Some(Role::Investigator)).unwrap(),
            Role::Client
        );
        assert_eq!(toggle_target(&both, None).unwrap(), Role::Investigator);
    }

    #[test]
    fn test_no_grant_is_rejected() {
        let err = toggle_target(&[], Some(Role::Client)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
