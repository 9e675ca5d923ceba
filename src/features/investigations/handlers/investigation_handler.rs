use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath, AppQuery};
use crate::features::auth::guards::{RequireClient, RequireInvestigator};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::investigations::dtos::{
    CreateInvestigationDto, InvestigationListItemDto, InvestigationResponseDto,
    ListInvestigationsQuery,
};
use crate::features::investigations::services::InvestigationService;
use crate::shared::types::{ApiResponse, Meta};

/// List investigation requests for the caller's active role
#[utoipa::path(
    get,
    path = "/api/investigations",
    params(ListInvestigationsQuery),
    responses(
        (status = 200, description = "List of investigation requests", body = ApiResponse<Vec<InvestigationListItemDto>>),
        (status = 400, description = "Unknown status filter"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "investigations"
)]
pub async fn list_investigations(
    user: AuthenticatedUser,
    State(service): State<Arc<InvestigationService>>,
    AppQuery(query): AppQuery<ListInvestigationsQuery>,
) -> Result<Json<ApiResponse<Vec<InvestigationListItemDto>>>> {
    let items = service.list(&user, query).await?;
    let total = items.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Submit a new investigation request
#[utoipa::path(
    post,
    path = "/api/investigations",
    request_body = CreateInvestigationDto,
    responses(
        (status = 201, description = "Investigation request submitted", body = ApiResponse<InvestigationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a client")
    ),
    security(("bearer_auth" = [])),
    tag = "investigations"
)]
pub async fn create_investigation(
    RequireClient(user): RequireClient,
    State(service): State<Arc<InvestigationService>>,
    AppJson(dto): AppJson<CreateInvestigationDto>,
) -> Result<(StatusCode, Json<ApiResponse<InvestigationResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let request = service.create(user.id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(request), None, None)),
    ))
}

/// Get an investigation request by ID
#[utoipa::path(
    get,
    path = "/api/investigations/{id}",
    params(
        ("id" = Uuid, Path, description = "Investigation request ID")
    ),
    responses(
        (status = 200, description = "Investigation request found", body = ApiResponse<InvestigationListItemDto>),
        (status = 404, description = "Investigation request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "investigations"
)]
pub async fn get_investigation(
    user: AuthenticatedUser,
    State(service): State<Arc<InvestigationService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<InvestigationListItemDto>>> {
    let request = service.get_by_id(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(request), None, None)))
}

/// Accept an open investigation request
#[utoipa::path(
    patch,
    path = "/api/investigations/{id}/accept",
    params(
        ("id" = Uuid, Path, description = "Investigation request ID")
    ),
    responses(
        (status = 200, description = "Investigation request accepted", body = ApiResponse<InvestigationResponseDto>),
        (status = 400, description = "Already accepted or not available"),
        (status = 403, description = "Caller is not an investigator"),
        (status = 404, description = "Investigation request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "investigations"
)]
pub async fn accept_investigation(
    RequireInvestigator(user): RequireInvestigator,
    State(service): State<Arc<InvestigationService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<InvestigationResponseDto>>> {
    let request = service.accept(id, user.id).await?;
    Ok(Json(ApiResponse::success(Some(request), None, None)))
}

/// Complete an assigned investigation request
#[utoipa::path(
    patch,
    path = "/api/investigations/{id}/complete",
    params(
        ("id" = Uuid, Path, description = "Investigation request ID")
    ),
    responses(
        (status = 200, description = "Investigation request completed", body = ApiResponse<InvestigationResponseDto>),
        (status = 400, description = "Not assigned to caller or not pending"),
        (status = 403, description = "Caller is not an investigator"),
        (status = 404, description = "Investigation request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "investigations"
)]
pub async fn complete_investigation(
    RequireInvestigator(user): RequireInvestigator,
    State(service): State<Arc<InvestigationService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<InvestigationResponseDto>>> {
    let request = service.complete(id, user.id).await?;
    Ok(Json(ApiResponse::success(Some(request), None, None)))
}

/// Decline an open investigation request
#[utoipa::path(
    post,
    path = "/api/investigations/{id}/decline",
    params(
        ("id" = Uuid, Path, description = "Investigation request ID")
    ),
    responses(
        (status = 200, description = "Investigation request declined"),
        (status = 400, description = "Not available or already declined"),
        (status = 403, description = "Caller is not an investigator"),
        (status = 404, description = "Investigation request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "investigations"
)]
pub async fn decline_investigation(
    RequireInvestigator(user): RequireInvestigator,
    State(service): State<Arc<InvestigationService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.decline(id, user.id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Investigation request declined".to_string()),
        None,
    )))
}
