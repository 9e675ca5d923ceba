use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;

/// Investigation status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "investigation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvestigationStatus {
    Submitted,
    Pending,
    Completed,
}

impl std::fmt::Display for InvestigationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvestigationStatus::Submitted => write!(f, "submitted"),
            InvestigationStatus::Pending => write!(f, "pending"),
            InvestigationStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "investigation_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvestigationPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Database model for investigation request
#[derive(Debug, Clone, FromRow)]
pub struct InvestigationRequest {
    pub id: Uuid,
    pub client_id: Uuid,
    pub investigator_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub priority: InvestigationPriority,
    pub status: InvestigationStatus,
    pub budget: Option<Decimal>,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Investigation request joined with the participants' names
#[derive(Debug, Clone, FromRow)]
pub struct InvestigationListRow {
    #[sqlx(flatten)]
    pub request: InvestigationRequest,
    pub client_first_name: Option<String>,
    pub client_last_name: Option<String>,
    pub investigator_first_name: Option<String>,
    pub investigator_last_name: Option<String>,
}

pub fn request_not_found() -> AppError {
    AppError::NotFound("Investigation request not found.".to_string())
}

fn not_available() -> AppError {
    AppError::BadRequest(
        "Investigation request has already been accepted or is not available.".to_string(),
    )
}

impl InvestigationRequest {
    /// Still open for any investigator to pick up
    pub fn is_open(&self) -> bool {
        self.status == InvestigationStatus::Submitted && self.investigator_id.is_none()
    }

    pub fn is_assigned_to(&self, investigator_id: Uuid) -> bool {
        self.investigator_id == Some(investigator_id)
    }

    /// Whether `user` may see this request. `declined` tells whether the
    /// caller has opted out of it.
    pub fn is_visible_to(&self, user: &AuthenticatedUser, declined: bool) -> bool {
        self.client_id == user.id
            || self.is_assigned_to(user.id)
            || (user.is_investigator() && self.is_open() && !declined)
    }
}

/// Classify an accept whose guarded update matched no row
pub fn accept_failure(current: Option<&InvestigationRequest>) -> AppError {
    match current {
        None => request_not_found(),
        Some(_) => not_available(),
    }
}

/// Classify a complete whose guarded update matched no row
pub fn complete_failure(current: Option<&InvestigationRequest>, investigator_id: Uuid) -> AppError {
    match current {
        None => request_not_found(),
        Some(request) if !request.is_assigned_to(investigator_id) => AppError::BadRequest(
            "Investigation not assigned to this investigator.".to_string(),
        ),
        Some(request) => AppError::BadRequest(format!(
            "Investigation status is '{}', not 'pending'. Cannot complete.",
            request.status
        )),
    }
}

/// Check that `current` can still be declined
pub fn check_declinable(current: Option<&InvestigationRequest>) -> Result<(), AppError> {
    match current {
        None => Err(request_not_found()),
        Some(request) if !request.is_open() => Err(not_available()),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
pub(crate) fn sample_request(status: InvestigationStatus, investigator_id: Option<Uuid>) -> InvestigationRequest {
    let now = Utc::now();
    InvestigationRequest {
        id: Uuid::new_v4(),
        client_id: Uuid::new_v4(),
        investigator_id,
        title: "Missing shipment".to_string(),
        description: "Trace a container lost between two ports".to_string(),
        priority: InvestigationPriority::High,
        status,
        budget: Some(Decimal::new(150000, 2)),
        deadline: NaiveDate::from_ymd_opt(2030, 1, 31),
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: AppError) -> String {
        match err {
            AppError::NotFound(msg) | AppError::BadRequest(msg) => msg,
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_accept_failure_classification() {
        assert!(matches!(accept_failure(None), AppError::NotFound(_)));

        let taken = sample_request(InvestigationStatus::Pending, Some(Uuid::new_v4()));
        let err = accept_failure(Some(&taken));
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(
            message(err),
            "Investigation request has already been accepted or is not available."
        );
    }

    #[test]
    fn test_complete_failure_checks_assignment_before_status() {
        let me = Uuid::new_v4();

        assert!(matches!(complete_failure(None, me), AppError::NotFound(_)));

        let unassigned = sample_request(InvestigationStatus::Submitted, None);
        assert_eq!(
            message(complete_failure(Some(&unassigned), me)),
            "Investigation not assigned to this investigator."
        );

        let someone_else = sample_request(InvestigationStatus::Pending, Some(Uuid::new_v4()));
        assert_eq!(
            message(complete_failure(Some(&someone_else), me)),
            "Investigation not assigned to this investigator."
        );

        let done = sample_request(InvestigationStatus::Completed, Some(me));
        assert_eq!(
            message(complete_failure(Some(&done), me)),
            "Investigation status is 'completed', not 'pending'. Cannot complete."
        );
    }

    #[test]
    fn test_only_open_requests_are_declinable() {
        assert!(matches!(check_declinable(None), Err(AppError::NotFound(_))));

        let open = sample_request(InvestigationStatus::Submitted, None);
        assert!(check_declinable(Some(&open)).is_ok());

        let pending = sample_request(InvestigationStatus::Pending, Some(Uuid::new_v4()));
        assert!(matches!(
            check_declinable(Some(&pending)),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_visibility_rules() {
        use crate::shared::test_helpers::{client_user, investigator_user};

        let owner = client_user();
        let stranger = client_user();
        let investigator = investigator_user();

        let mut open = sample_request(InvestigationStatus::Submitted, None);
        open.client_id = owner.id;

        assert!(open.is_visible_to(&owner, false));
        assert!(!open.is_visible_to(&stranger, false));
        assert!(open.is_visible_to(&investigator, false));
        assert!(!open.is_visible_to(&investigator, true));

        let mut taken = sample_request(InvestigationStatus::Pending, Some(Uuid::new_v4()));
        taken.client_id = owner.id;
        assert!(!taken.is_visible_to(&investigator, false));

        taken.investigator_id = Some(investigator.id);
        assert!(taken.is_visible_to(&investigator, false));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(InvestigationStatus::Pending).unwrap(),
            "pending"
        );
        assert_eq!(InvestigationStatus::Submitted.to_string(), "submitted");
    }
}
