use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::investigations::models::{InvestigationRequest, InvestigationStatus};

/// Database model for investigation report
#[derive(Debug, Clone, FromRow)]
pub struct InvestigationReport {
    pub id: Uuid,
    pub investigation_request_id: Uuid,
    pub report_content: String,
    pub rating: Option<i32>,
    pub client_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn investigation_not_found() -> AppError {
    AppError::NotFound("Investigation not found.".to_string())
}

pub fn report_not_found() -> AppError {
    AppError::NotFound("Report not found for this investigation.".to_string())
}

pub fn report_already_submitted() -> AppError {
    AppError::BadRequest("A report has already been submitted for this investigation.".to_string())
}

/// Check that `investigator_id` may file a report on `current`
pub fn check_reportable(
    current: Option<&InvestigationRequest>,
    investigator_id: Uuid,
) -> Result<(), AppError> {
    let request = current.ok_or_else(investigation_not_found)?;

    if !request.is_assigned_to(investigator_id) {
        return Err(AppError::BadRequest(
            "Investigation not assigned to this investigator.".to_string(),
        ));
    }
    if request.status != InvestigationStatus::Completed {
        return Err(AppError::BadRequest(format!(
            "Investigation status is '{}', not 'completed'. Cannot submit report yet.",
            request.status
        )));
    }
    Ok(())
}

/// Check that `client_id` may rate the report on `current`
pub fn check_rateable(current: Option<&InvestigationRequest>, client_id: Uuid) -> Result<(), AppError> {
    let request = current.ok_or_else(investigation_not_found)?;

    if request.client_id != client_id {
        return Err(AppError::BadRequest(
            "This investigation does not belong to you.".to_string(),
        ));
    }
    if request.status != InvestigationStatus::Completed {
        return Err(AppError::BadRequest(format!(
            "Investigation status is '{}', not 'completed'. Cannot rate report yet.",
            request.status
        )));
    }
    Ok(())
}

/// Classify a rating update that matched no unrated report
pub fn rating_failure(existing: Option<&InvestigationReport>) -> AppError {
    match existing {
        None => report_not_found(),
        Some(_) => AppError::BadRequest("This report has already been rated.".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::investigations::models::sample_request;

    fn sample_report(rating: Option<i32>) -> InvestigationReport {
        let now = Utc::now();
        InvestigationReport {
            id: Uuid::new_v4(),
            investigation_request_id: Uuid::new_v4(),
            report_content: "Subject was located at the listed address".to_string(),
            rating,
            client_feedback: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_report_requires_assignment_then_completion() {
        let me = Uuid::new_v4();

        assert!(matches!(
            check_reportable(None, me),
            Err(AppError::NotFound(_))
        ));

        let other = sample_request(InvestigationStatus::Completed, Some(Uuid::new_v4()));
        match check_reportable(Some(&other), me) {
            Err(AppError::BadRequest(msg)) => {
                assert_eq!(msg, "Investigation not assigned to this investigator.")
            }
            other => panic!("unexpected: {:?}", other),
        }

        let pending = sample_request(InvestigationStatus::Pending, Some(me));
        match check_reportable(Some(&pending), me) {
            Err(AppError::BadRequest(msg)) => assert_eq!(
                msg,
                "Investigation status is 'pending', not 'completed'. Cannot submit report yet."
            ),
            other => panic!("unexpected: {:?}", other),
        }

        let done = sample_request(InvestigationStatus::Completed, Some(me));
        assert!(check_reportable(Some(&done), me).is_ok());
    }

    #[test]
    fn test_rating_requires_ownership_then_completion() {
        let mut request = sample_request(InvestigationStatus::Completed, Some(Uuid::new_v4()));
        let owner = request.client_id;

        assert!(check_rateable(Some(&request), owner).is_ok());
        match check_rateable(Some(&request), Uuid::new_v4()) {
            Err(AppError::BadRequest(msg)) => {
                assert_eq!(msg, "This investigation does not belong to you.")
            }
            other => panic!("unexpected: {:?}", other),
        }

        request.status = InvestigationStatus::Pending;
        assert!(matches!(
            check_rateable(Some(&request), owner),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_rating_failure_classification() {
        assert!(matches!(rating_failure(None), AppError::NotFound(_)));
        match rating_failure(Some(&sample_report(Some(4)))) {
            AppError::BadRequest(msg) => assert_eq!(msg, "This report has already been rated."),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
