use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::features::auth::model::Role;
use crate::features::users::dtos::UserDto;

fn validate_roles(roles: &[Role]) -> Result<(), ValidationError> {
    if roles.is_empty() {
        return Err(ValidationError::new("roles_required")
            .with_message("At least one role is required".into()));
    }
    Ok(())
}

/// Request DTO for user registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 2, max = 100, message = "Name must be at least 2 characters"))]
    pub first_name: String,

    #[validate(length(min = 2, max = 100, message = "Name must be at least 2 characters"))]
    pub last_name: String,

    /// Roles to grant; each must be `client` or `investigator`
    #[validate(custom(function = "validate_roles"))]
    pub roles: Vec<Role>,
}

/// Request DTO for user login
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response DTO for authentication (register/login)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    pub user: UserDto,
    /// Bearer access token
    pub token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
}

/// Response DTO for role toggling
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToggleRoleResponseDto {
    /// Active role grants after the toggle
    pub roles: Vec<Role>,
    /// Role encoded in the new token
    pub active_role: Role,
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Normalise an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{faker::internet::en::SafeEmail, Fake};

    fn register_dto() -> RegisterRequestDto {
        RegisterRequestDto {
            email: SafeEmail().fake(),
            password: "long-enough".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            roles: vec![Role::Client],
        }
    }

    #[test]
    fn test_register_requires_a_role() {
        assert!(register_dto().validate().is_ok());

        let mut dto = register_dto();
        dto.roles.clear();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("roles"));
    }

    #[test]
    fn test_register_rejects_short_password_and_bad_email() {
        let mut dto = register_dto();
        dto.password = "short".to_string();
        dto.email = "not-an-email".to_string();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_unknown_role_fails_to_deserialize() {
        let body = serde_json::json!({
            "email": "a@example.com",
            "password": "long-enough",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "roles": ["admin"]
        });
        assert!(serde_json::from_value::<RegisterRequestDto>(body).is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
