use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::investigations::models::{
    InvestigationListRow, InvestigationPriority, InvestigationRequest, InvestigationStatus,
};
use crate::shared::constants::MAX_BUDGET;
use crate::shared::validation::validate_date;

/// Budget as sent by the form: a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum BudgetInput {
    Number(i64),
    Text(String),
}

impl BudgetInput {
    /// Whole amount within `0..=MAX_BUDGET`, if the input is one
    pub fn amount(&self) -> Option<i64> {
        let value = match self {
            BudgetInput::Number(n) => *n,
            BudgetInput::Text(s) => s.trim().parse::<i64>().ok()?,
        };
        (0..=MAX_BUDGET).contains(&value).then_some(value)
    }
}

fn validate_budget(budget: &BudgetInput) -> Result<(), ValidationError> {
    match budget.amount() {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("budget")
            .with_message("Budget must be a positive number up to 99999999".into())),
    }
}

/// Request DTO for submitting a new investigation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateInvestigationDto {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,

    pub priority: InvestigationPriority,

    /// Due date (yyyy-mm-dd)
    #[validate(custom(function = "validate_date"))]
    pub deadline: String,

    #[validate(custom(function = "validate_budget"))]
    pub budget: BudgetInput,
}

/// Query params for listing investigation requests
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListInvestigationsQuery {
    /// Filter by status
    pub status: Option<InvestigationStatus>,
}

/// Response DTO for investigation request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvestigationResponseDto {
    pub id: Uuid,
    pub client_id: Uuid,
    pub investigator_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub priority: InvestigationPriority,
    pub status: InvestigationStatus,
    #[schema(value_type = Option<String>)]
    pub budget: Option<Decimal>,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InvestigationRequest> for InvestigationResponseDto {
    fn from(r: InvestigationRequest) -> Self {
        Self {
            id: r.id,
            client_id: r.client_id,
            investigator_id: r.investigator_id,
            title: r.title,
            description: r.description,
            priority: r.priority,
            status: r.status,
            budget: r.budget,
            deadline: r.deadline,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Listing entry with the client's and investigator's names
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvestigationListItemDto {
    #[serde(flatten)]
    pub request: InvestigationResponseDto,
    pub client_first_name: Option<String>,
    pub client_last_name: Option<String>,
    pub investigator_first_name: Option<String>,
    pub investigator_last_name: Option<String>,
}

impl From<InvestigationListRow> for InvestigationListItemDto {
    fn from(row: InvestigationListRow) -> Self {
        Self {
            request: row.request.into(),
            client_first_name: row.client_first_name,
            client_last_name: row.client_last_name,
            investigator_first_name: row.investigator_first_name,
            investigator_last_name: row.investigator_last_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> serde_json::Value {
        json!({
            "title": "Background check",
            "description": "Verify employment history of a candidate",
            "priority": "medium",
            "deadline": "2030-06-15",
            "budget": "2500"
        })
    }

    #[test]
    fn test_budget_accepts_string_or_number() {
        let dto: CreateInvestigationDto = serde_json::from_value(valid_body()).unwrap();
        assert_eq!(dto.budget.amount(), Some(2500));
        assert!(dto.validate().is_ok());

        let mut body = valid_body();
        body["budget"] = json!(700);
        let dto: CreateInvestigationDto = serde_json::from_value(body).unwrap();
        assert_eq!(dto.budget, BudgetInput::Number(700));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_negative_or_non_numeric_budget_rejected() {
        assert_eq!(BudgetInput::Number(-1).amount(), None);
        assert_eq!(BudgetInput::Text("abc".to_string()).amount(), None);
        assert_eq!(BudgetInput::Text(" 0 ".to_string()).amount(), Some(0));

        let mut body = valid_body();
        body["budget"] = json!("-50");
        let dto: CreateInvestigationDto = serde_json::from_value(body).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_budget_capped_at_column_precision() {
        assert_eq!(BudgetInput::Number(MAX_BUDGET).amount(), Some(MAX_BUDGET));
        assert_eq!(BudgetInput::Number(MAX_BUDGET + 1).amount(), None);
        assert_eq!(BudgetInput::Text("100000000000".to_string()).amount(), None);

        let mut body = valid_body();
        body["budget"] = json!(100_000_000_000_i64);
        let dto: CreateInvestigationDto = serde_json::from_value(body).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("budget"));
    }

    #[test]
    fn test_impossible_deadline_rejected() {
        let mut body = valid_body();
        body["deadline"] = json!("2030-02-30");
        let dto: CreateInvestigationDto = serde_json::from_value(body).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("deadline"));
    }

    #[test]
    fn test_short_title_and_description_rejected() {
        let mut body = valid_body();
        body["title"] = json!("ab");
        body["description"] = json!("too short");
        let dto: CreateInvestigationDto = serde_json::from_value(body).unwrap();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("description"));
    }

    #[test]
    fn test_unknown_priority_fails_to_parse() {
        let mut body = valid_body();
        body["priority"] = json!("urgent");
        assert!(serde_json::from_value::<CreateInvestigationDto>(body).is_err());
    }
}
