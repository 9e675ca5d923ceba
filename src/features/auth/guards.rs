//! Role-based authorization guards.
//!
//! Guards extract the authenticated user and check that they hold an
//! *active* grant for the required role. The active role chosen in the
//! token does not matter here, only the grant itself.

use crate::core::error::AppError;
use crate::features::auth::model::{AuthenticatedUser, Role};
use axum::{extract::FromRequestParts, http::request::Parts};

fn require_role(parts: &Parts, role: Role) -> Result<AuthenticatedUser, AppError> {
    let user = parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

    if !user.has_role(role) {
        return Err(AppError::Forbidden("Insufficient permissions".to_string()));
    }

    Ok(user.clone())
}

/// Guard for endpoints only clients may call.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireClient(user): RequireClient) { ... }
/// ```
pub struct RequireClient(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireClient
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_role(parts, Role::Client).map(RequireClient)
    }
}

/// Guard for endpoints only investigators may call.
pub struct RequireInvestigator(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireInvestigator
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_role(parts, Role::Investigator).map(RequireInvestigator)
    }
}
