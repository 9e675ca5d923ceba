use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::dashboard::dtos::*;
use crate::features::investigations::dtos::InvestigationResponseDto;
use crate::features::investigations::models::InvestigationRequest;
use crate::shared::constants::DASHBOARD_LIST_LIMIT;

const REQUEST_COLUMNS: &str = "id, client_id, investigator_id, title, description, priority, \
     status, budget, deadline, created_at, updated_at";

/// Service for the per-role dashboard
pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build the dashboard for every role the user currently holds
    pub async fn get_dashboard(&self, user: &AuthenticatedUser) -> Result<DashboardDto> {
        let mut dashboard = DashboardDto::empty(user.roles.clone());

        if user.is_client() {
            dashboard.statistics.client = Some(self.client_stats(user.id).await?);
            dashboard.recent_investigations.client =
                Some(self.recent_requests("client_id", user.id).await?);
            dashboard.pending_actions.client = Some(self.unrated_reports(user.id).await?);
        }

        if user.is_investigator() {
            dashboard.statistics.investigator = Some(self.investigator_stats(user.id).await?);
            dashboard.recent_investigations.investigator =
                Some(self.recent_requests("investigator_id", user.id).await?);
            dashboard.pending_actions.investigator =
                Some(self.active_assignments(user.id).await?);
        }

        Ok(dashboard)
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    async fn client_stats(&self, client_id: Uuid) -> Result<ClientStatsDto> {
        sqlx::query_as::<_, ClientStatsDto>(
            r#"
            SELECT
                COUNT(*) AS total_requests,
                COUNT(*) FILTER (WHERE status = 'submitted') AS submitted_requests,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_requests,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_requests
            FROM investigation_requests
            WHERE client_id = $1
            "#,
        )
        .bind(client_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get client stats: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn investigator_stats(&self, investigator_id: Uuid) -> Result<InvestigatorStatsDto> {
        sqlx::query_as::<_, InvestigatorStatsDto>(
            r#"
            SELECT
                COUNT(*) AS total_assignments,
                COUNT(*) FILTER (WHERE status = 'pending') AS active_assignments,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_assignments
            FROM investigation_requests
            WHERE investigator_id = $1
            "#,
        )
        .bind(investigator_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get investigator stats: {:?}", e);
            AppError::Database(e)
        })
    }

    // ========================================================================
    // Lists
    // ========================================================================

    /// Newest requests where `owner_column` is the user
    async fn recent_requests(
        &self,
        owner_column: &'static str,
        user_id: Uuid,
    ) -> Result<Vec<InvestigationResponseDto>> {
        let query = format!(
            r#"
            SELECT {}
            FROM investigation_requests
            WHERE {} = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
            REQUEST_COLUMNS, owner_column
        );

        let rows = sqlx::query_as::<_, InvestigationRequest>(&query)
            .bind(user_id)
            .bind(DASHBOARD_LIST_LIMIT)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get recent investigations: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn unrated_reports(&self, client_id: Uuid) -> Result<Vec<PendingRatingDto>> {
        let rows = sqlx::query_as::<_, PendingRatingRow>(
            r#"
            SELECT
                rep.id, rep.investigation_request_id, rep.report_content, rep.rating,
                rep.client_feedback, rep.created_at, rep.updated_at,
                req.title
            FROM investigation_reports rep
            JOIN investigation_requests req ON req.id = rep.investigation_request_id
            WHERE req.client_id = $1 AND rep.rating IS NULL
            ORDER BY rep.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(client_id)
        .bind(DASHBOARD_LIST_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get unrated reports: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn active_assignments(&self, investigator_id: Uuid) -> Result<Vec<InvestigationResponseDto>> {
        let query = format!(
            r#"
            SELECT {}
            FROM investigation_requests
            WHERE investigator_id = $1 AND status = 'pending'
            ORDER BY created_at DESC
            LIMIT $2
            "#,
            REQUEST_COLUMNS
        );

        let rows = sqlx::query_as::<_, InvestigationRequest>(&query)
            .bind(investigator_id)
            .bind(DASHBOARD_LIST_LIMIT)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get active assignments: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
