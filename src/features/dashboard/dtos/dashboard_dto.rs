use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::features::auth::model::Role;
use crate::features::investigations::dtos::InvestigationResponseDto;
use crate::features::reports::dtos::ReportResponseDto;
use crate::features::reports::models::InvestigationReport;

// ============================================================================
// Statistics
// ============================================================================

/// Counts over the requests a client has submitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClientStatsDto {
    pub total_requests: i64,
    pub submitted_requests: i64,
    pub pending_requests: i64,
    pub completed_requests: i64,
}

/// Counts over the requests assigned to an investigator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InvestigatorStatsDto {
    pub total_assignments: i64,
    pub active_assignments: i64,
    pub completed_assignments: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DashboardStatisticsDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientStatsDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investigator: Option<InvestigatorStatsDto>,
}

// ============================================================================
// Lists
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RecentInvestigationsDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<Vec<InvestigationResponseDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investigator: Option<Vec<InvestigationResponseDto>>,
}

/// Report waiting for the client's rating
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PendingRatingDto {
    #[serde(flatten)]
    pub report: ReportResponseDto,
    /// Title of the investigation the report belongs to
    pub title: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct PendingRatingRow {
    #[sqlx(flatten)]
    pub report: InvestigationReport,
    pub title: String,
}

impl From<PendingRatingRow> for PendingRatingDto {
    fn from(row: PendingRatingRow) -> Self {
        Self {
            report: row.report.into(),
            title: row.title,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PendingActionsDto {
    /// Unrated reports on the client's requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<Vec<PendingRatingDto>>,
    /// Assignments still in progress
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investigator: Option<Vec<InvestigationResponseDto>>,
}

/// Per-role overview for the signed-in user.
///
/// Each section is present only for the roles the user currently holds.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardDto {
    pub roles: Vec<Role>,
    pub statistics: DashboardStatisticsDto,
    pub recent_investigations: RecentInvestigationsDto,
    pub pending_actions: PendingActionsDto,
}

impl DashboardDto {
    pub fn empty(roles: Vec<Role>) -> Self {
        Self {
            roles,
            statistics: DashboardStatisticsDto::default(),
            recent_investigations: RecentInvestigationsDto::default(),
            pending_actions: PendingActionsDto::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_for_missing_roles_are_omitted() {
        let mut dashboard = DashboardDto::empty(vec![Role::Client]);
        dashboard.statistics.client = Some(ClientStatsDto {
            total_requests: 3,
            submitted_requests: 1,
            pending_requests: 1,
            completed_requests: 1,
        });
        dashboard.recent_investigations.client = Some(Vec::new());
        dashboard.pending_actions.client = Some(Vec::new());

        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["roles"], serde_json::json!(["client"]));
        assert_eq!(json["statistics"]["client"]["total_requests"], 3);
        assert!(json["statistics"].get("investigator").is_none());
        assert!(json["recent_investigations"].get("investigator").is_none());
        assert!(json["pending_actions"].get("investigator").is_none());
    }
}
