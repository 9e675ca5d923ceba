use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::core::database::is_unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, Role};
use crate::features::auth::services::password;
use crate::features::users::dtos::{
    InvestigatorProfileDto, ProfileResponseDto, RatingSummaryDto, UpdateProfileDto,
};
use crate::features::users::models::User;

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, bio, phone, created_at, updated_at";

/// Data for creating a new account
#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<Role>,
}

/// Load the active role grants of a user, ordered by role id.
///
/// Unknown role names are skipped with a warning.
pub async fn fetch_active_roles<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<Role>>
where
    E: PgExecutor<'e>,
{
    let names: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT r.name
        FROM user_roles ur
        JOIN roles r ON r.id = ur.role_id
        WHERE ur.user_id = $1 AND ur.is_active
        ORDER BY r.id
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to load roles for user {}: {:?}", user_id, e);
        AppError::Database(e)
    })?;

    Ok(names
        .into_iter()
        .filter_map(|name| match name.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::warn!("Ignoring role grant for user {}: {}", user_id, e);
                None
            }
        })
        .collect())
}

/// Service for user accounts, role grants and profiles
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn active_roles(&self, user_id: Uuid) -> Result<Vec<Role>> {
        fetch_active_roles(&self.pool, user_id).await
    }

    /// Create the user and grant the requested roles in one transaction.
    ///
    /// Returns the user with the grants as stored.
    pub async fn create_with_roles(&self, new_user: NewUser) -> Result<(User, Vec<Role>)> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, "users_email_unique") {
                    AppError::Validation("Email already registered".to_string())
                } else {
                    tracing::error!("Failed to create user: {:?}", e);
                    AppError::Database(e)
                }
            })?;

        let role_names: Vec<&str> = new_user.roles.iter().map(Role::as_str).collect();
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            SELECT $1, r.id FROM roles r WHERE r.name = ANY($2)
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(user.id)
        .bind(&role_names)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to grant roles to user {}: {:?}", user.id, e);
            AppError::Database(e)
        })?;

        let roles = fetch_active_roles(&mut *tx, user.id).await?;
        tx.commit().await?;

        tracing::info!("User registered: id={}, roles={:?}", user.id, roles);

        Ok((user, roles))
    }

    /// Ensure `role` is granted and active for the user.
    ///
    /// Returns the active grants after the change.
    pub async fn activate_role(&self, user_id: Uuid, role: Role) -> Result<Vec<Role>> {
        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id, is_active)
            SELECT $1, r.id, TRUE FROM roles r WHERE r.name = $2
            ON CONFLICT (user_id, role_id)
            DO UPDATE SET is_active = TRUE, updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to activate role {} for {}: {:?}", role, user_id, e);
            AppError::Database(e)
        })?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::Validation(
                "Required roles not found in the system".to_string(),
            ));
        }

        let roles = fetch_active_roles(&mut *tx, user_id).await?;
        tx.commit().await?;

        Ok(roles)
    }

    pub async fn get_profile(&self, user: &AuthenticatedUser) -> Result<ProfileResponseDto> {
        let record = self
            .find_by_id(user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(record.into_profile(user.roles.clone(), user.active_role))
    }

    pub async fn update_profile(
        &self,
        user: &AuthenticatedUser,
        dto: UpdateProfileDto,
    ) -> Result<ProfileResponseDto> {
        let record = self
            .find_by_id(user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if dto.new_password.is_some() && dto.password_change().is_none() {
            return Err(AppError::Validation(
                "Current password is required to set a new password".to_string(),
            ));
        }

        let new_password_hash = match dto.password_change() {
            Some((current, new)) => {
                let valid =
                    password::verify_password(current.to_string(), record.password_hash.clone())
                        .await?;
                if !valid {
                    return Err(AppError::Validation(
                        "Current password is incorrect".to_string(),
                    ));
                }
                Some(password::hash_password(new.to_string()).await?)
            }
            None => None,
        };

        // Empty strings clear the optional fields; absent fields keep their value
        let clear_bio = dto.bio.as_deref() == Some("");
        let clear_phone = dto.phone.as_deref() == Some("");

        let query = format!(
            r#"
            UPDATE users
            SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                bio = CASE WHEN $4 THEN NULL ELSE COALESCE($5, bio) END,
                phone = CASE WHEN $6 THEN NULL ELSE COALESCE($7, phone) END,
                password_hash = COALESCE($8, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let (first_name, last_name) = dto.name_updates();

        let updated = sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(first_name)
            .bind(last_name)
            .bind(clear_bio)
            .bind(dto.bio.as_deref().filter(|s| !s.is_empty()))
            .bind(clear_phone)
            .bind(dto.phone.as_deref().filter(|s| !s.is_empty()))
            .bind(new_password_hash.as_deref())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update profile {}: {:?}", user.id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!(
            "Profile updated: id={}, password_changed={}",
            user.id,
            new_password_hash.is_some()
        );

        Ok(updated.into_profile(user.roles.clone(), user.active_role))
    }

    /// Public profile of a user holding an active investigator grant
    pub async fn get_investigator_profile(&self, id: Uuid) -> Result<InvestigatorProfileDto> {
        let not_found = || AppError::NotFound("Investigator not found".to_string());

        let record = self.find_by_id(id).await?.ok_or_else(not_found)?;
        if !self.active_roles(id).await?.contains(&Role::Investigator) {
            return Err(not_found());
        }

        let (average_rating, total_ratings) = sqlx::query_as::<_, (Option<rust_decimal::Decimal>, i64)>(
            r#"
            SELECT AVG(rep.rating)::NUMERIC(4, 2), COUNT(*)
            FROM investigation_reports rep
            JOIN investigation_requests req ON req.id = rep.investigation_request_id
            WHERE req.investigator_id = $1 AND rep.rating IS NOT NULL
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to aggregate ratings for {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(InvestigatorProfileDto {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            bio: record.bio,
            phone: record.phone,
            ratings: RatingSummaryDto {
                average_rating,
                total_ratings,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::seed_user;

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_empty_name_keeps_stored_value(pool: PgPool) {
        let service = UserService::new(pool.clone());
        let user = seed_user(&pool, vec![Role::Client]).await;

        let profile = service
            .update_profile(
                &user,
                UpdateProfileDto {
                    first_name: Some(String::new()),
                    last_name: Some("Lovelace".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(profile.first_name, user.first_name);
        assert_eq!(profile.last_name, "Lovelace");
    }
}
