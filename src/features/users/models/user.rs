use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::auth::model::Role;
use crate::features::users::dtos::{ProfileResponseDto, UserDto};

/// Database model for user
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn into_dto(self, roles: Vec<Role>) -> UserDto {
        UserDto {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            roles,
        }
    }

    pub fn into_profile(self, roles: Vec<Role>, active_role: Option<Role>) -> ProfileResponseDto {
        ProfileResponseDto {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            bio: self.bio,
            phone: self.phone,
            roles,
            active_role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
