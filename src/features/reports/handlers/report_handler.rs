use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath};
use crate::features::auth::guards::{RequireClient, RequireInvestigator};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{RateReportDto, ReportResponseDto, SubmitReportDto};
use crate::features::reports::services::ReportService;
use crate::shared::types::ApiResponse;

/// Submit the report for a completed investigation
#[utoipa::path(
    post,
    path = "/api/reports/{investigation_id}",
    params(
        ("investigation_id" = Uuid, Path, description = "Investigation request ID")
    ),
    request_body = SubmitReportDto,
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Not assigned, not completed, or already reported"),
        (status = 403, description = "Caller is not an investigator"),
        (status = 404, description = "Investigation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn submit_report(
    RequireInvestigator(user): RequireInvestigator,
    State(service): State<Arc<ReportService>>,
    AppPath(investigation_id): AppPath<Uuid>,
    AppJson(dto): AppJson<SubmitReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.submit(investigation_id, user.id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(report), None, None)),
    ))
}

/// Rate the report of an owned investigation
#[utoipa::path(
    post,
    path = "/api/reports/{investigation_id}/rate",
    params(
        ("investigation_id" = Uuid, Path, description = "Investigation request ID")
    ),
    request_body = RateReportDto,
    responses(
        (status = 200, description = "Report rated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid rating, not owner, or already rated"),
        (status = 403, description = "Caller is not a client"),
        (status = 404, description = "Investigation or report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn rate_report(
    RequireClient(user): RequireClient,
    State(service): State<Arc<ReportService>>,
    AppPath(investigation_id): AppPath<Uuid>,
    AppJson(dto): AppJson<RateReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.rate(investigation_id, user.id, dto).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Get the report of a completed investigation
#[utoipa::path(
    get,
    path = "/api/reports/{investigation_id}",
    params(
        ("investigation_id" = Uuid, Path, description = "Investigation request ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Investigation not accessible or no report yet")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    AppPath(investigation_id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.get(&user, investigation_id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}
