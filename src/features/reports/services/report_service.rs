use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::core::database::is_unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::investigations::models::InvestigationStatus;
use crate::features::investigations::services::fetch_request;
use crate::features::reports::dtos::{RateReportDto, ReportResponseDto, SubmitReportDto};
use crate::features::reports::models::{
    check_rateable, check_reportable, rating_failure, report_already_submitted, report_not_found,
    InvestigationReport,
};

const REPORT_COLUMNS: &str = "id, investigation_request_id, report_content, rating, \
     client_feedback, created_at, updated_at";

async fn fetch_report<'e, E>(executor: E, investigation_id: Uuid) -> Result<Option<InvestigationReport>>
where
    E: PgExecutor<'e>,
{
    let query = format!(
        "SELECT {} FROM investigation_reports WHERE investigation_request_id = $1",
        REPORT_COLUMNS
    );
    sqlx::query_as::<_, InvestigationReport>(&query)
        .bind(investigation_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load report for {}: {:?}", investigation_id, e);
            AppError::Database(e)
        })
}

/// Service for investigation reports and their ratings
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// File the single report for a completed investigation
    pub async fn submit(
        &self,
        investigation_id: Uuid,
        investigator_id: Uuid,
        dto: SubmitReportDto,
    ) -> Result<ReportResponseDto> {
        let mut tx = self.pool.begin().await?;

        let request = fetch_request(&mut *tx, investigation_id, true).await?;
        check_reportable(request.as_ref(), investigator_id)?;

        if fetch_report(&mut *tx, investigation_id).await?.is_some() {
            return Err(report_already_submitted());
        }

        let query = format!(
            r#"
            INSERT INTO investigation_reports (investigation_request_id, report_content)
            VALUES ($1, $2)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );

        let report = sqlx::query_as::<_, InvestigationReport>(&query)
            .bind(investigation_id)
            .bind(&dto.report_content)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, "investigation_reports_request_unique") {
                    report_already_submitted()
                } else {
                    tracing::error!("Failed to create report for {}: {:?}", investigation_id, e);
                    AppError::Database(e)
                }
            })?;

        tx.commit().await?;

        tracing::info!(
            "Report submitted: investigation={}, investigator={}",
            investigation_id,
            investigator_id
        );

        Ok(report.into())
    }

    /// Rate the report once, on behalf of the owning client
    pub async fn rate(
        &self,
        investigation_id: Uuid,
        client_id: Uuid,
        dto: RateReportDto,
    ) -> Result<ReportResponseDto> {
        let mut tx = self.pool.begin().await?;

        let request = fetch_request(&mut *tx, investigation_id, false).await?;
        check_rateable(request.as_ref(), client_id)?;

        let query = format!(
            r#"
            UPDATE investigation_reports
            SET rating = $2, client_feedback = $3, updated_at = NOW()
            WHERE investigation_request_id = $1 AND rating IS NULL
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );

        let updated = sqlx::query_as::<_, InvestigationReport>(&query)
            .bind(investigation_id)
            .bind(dto.rating)
            .bind(dto.client_feedback.filter(|s| !s.trim().is_empty()))
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to rate report for {}: {:?}", investigation_id, e);
                AppError::Database(e)
            })?;

        let report = match updated {
            Some(report) => report,
            None => {
                let existing = fetch_report(&mut *tx, investigation_id).await?;
                return Err(rating_failure(existing.as_ref()));
            }
        };

        tx.commit().await?;

        tracing::info!(
            "Report rated: investigation={}, rating={}",
            investigation_id,
            dto.rating
        );

        Ok(report.into())
    }

    /// Report of a completed investigation the caller takes part in
    pub async fn get(
        &self,
        user: &AuthenticatedUser,
        investigation_id: Uuid,
    ) -> Result<ReportResponseDto> {
        let request = fetch_request(&self.pool, investigation_id, false).await?;

        let accessible = request.is_some_and(|r| {
            r.status == InvestigationStatus::Completed
                && (r.client_id == user.id || r.is_assigned_to(user.id))
        });
        if !accessible {
            return Err(AppError::NotFound(
                "Investigation not found or access denied".to_string(),
            ));
        }

        fetch_report(&self.pool, investigation_id)
            .await?
            .map(Into::into)
            .ok_or_else(report_not_found)
    }
}
