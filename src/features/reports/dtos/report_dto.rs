use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::reports::models::InvestigationReport;
use crate::shared::constants::{MAX_RATING, MIN_RATING};

fn validate_report_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::new("required")
            .with_message("Report content is required".into()));
    }
    Ok(())
}

/// Request DTO for filing a report on a completed investigation
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitReportDto {
    #[validate(custom(function = "validate_report_content"))]
    pub report_content: String,
}

/// Request DTO for rating a report
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RateReportDto {
    #[validate(range(min = MIN_RATING, max = MAX_RATING, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(max = 2000, message = "Feedback must not exceed 2000 characters"))]
    pub client_feedback: Option<String>,
}

/// Response DTO for investigation report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub investigation_request_id: Uuid,
    pub report_content: String,
    pub rating: Option<i32>,
    pub client_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InvestigationReport> for ReportResponseDto {
    fn from(r: InvestigationReport) -> Self {
        Self {
            id: r.id,
            investigation_request_id: r.investigation_request_id,
            report_content: r.report_content,
            rating: r.rating,
            client_feedback: r.client_feedback,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_range() {
        for rating in [0, 6, -1] {
            let dto = RateReportDto {
                rating,
                client_feedback: None,
            };
            assert!(dto.validate().is_err(), "rating {} should be rejected", rating);
        }
        for rating in MIN_RATING..=MAX_RATING {
            let dto = RateReportDto {
                rating,
                client_feedback: Some("Thorough work".to_string()),
            };
            assert!(dto.validate().is_ok());
        }
    }

    #[test]
    fn test_empty_report_rejected() {
        for content in ["", "   ", "\n\t "] {
            let dto = SubmitReportDto {
                report_content: content.to_string(),
            };
            let errors = dto.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("report_content"));
        }

        let dto = SubmitReportDto {
            report_content: " Subject was verified. ".to_string(),
        };
        assert!(dto.validate().is_ok());
    }
}
