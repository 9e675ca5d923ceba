use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::auth::model::Role;

/// User summary returned by register and login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<Role>,
}

/// Full profile of the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponseDto {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub roles: Vec<Role>,
    pub active_role: Option<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Empty names mean "leave unchanged"; anything else needs 2 to 100 characters
fn validate_optional_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() || (2..=100).contains(&name.chars().count()) {
        return Ok(());
    }
    Err(ValidationError::new("name").with_message("Name must be at least 2 characters".into()))
}

/// Request DTO for updating the caller's profile.
///
/// Absent fields and empty names are left untouched. An empty `bio` or `phone` clears it.
/// The password changes only when both password fields are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(custom(function = "validate_optional_name"))]
    pub first_name: Option<String>,

    #[validate(custom(function = "validate_optional_name"))]
    pub last_name: Option<String>,

    #[validate(length(max = 2000, message = "Bio must not exceed 2000 characters"))]
    pub bio: Option<String>,

    #[validate(length(max = 32, message = "Phone must not exceed 32 characters"))]
    pub phone: Option<String>,

    pub current_password: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: Option<String>,
}

impl UpdateProfileDto {
    /// Names to write; `None` keeps the stored value
    pub fn name_updates(&self) -> (Option<&str>, Option<&str>) {
        let non_empty: fn(&Option<String>) -> Option<&str> = |v| v.as_deref().filter(|s| !s.is_empty());
        (non_empty(&self.first_name), non_empty(&self.last_name))
    }

    /// Password pair when a change was requested
    pub fn password_change(&self) -> Option<(&str, &str)> {
        match (&self.current_password, &self.new_password) {
            (Some(current), Some(new)) if !current.is_empty() => {
                Some((current.as_str(), new.as_str()))
            }
            _ => None,
        }
    }
}

/// Aggregate rating for an investigator's reports
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RatingSummaryDto {
    #[schema(value_type = Option<String>)]
    pub average_rating: Option<Decimal>,
    pub total_ratings: i64,
}

/// Public investigator profile with ratings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvestigatorProfileDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub ratings: RatingSummaryDto,
}
