use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::investigations::{
    dtos as investigations_dtos, handlers as investigations_handlers,
    models as investigations_models,
};
use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::toggle_role,
        auth::handlers::get_me,
        // Users
        users_handlers::get_profile,
        users_handlers::update_profile,
        users_handlers::get_investigator_profile,
        // Investigations
        investigations_handlers::list_investigations,
        investigations_handlers::create_investigation,
        investigations_handlers::get_investigation,
        investigations_handlers::accept_investigation,
        investigations_handlers::complete_investigation,
        investigations_handlers::decline_investigation,
        // Reports
        reports_handlers::submit_report,
        reports_handlers::rate_report,
        reports_handlers::get_report,
        // Dashboard
        dashboard_handlers::get_dashboard,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::Role,
            auth::model::AuthenticatedUser,
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::ToggleRoleResponseDto,
            ApiResponse<auth::model::AuthenticatedUser>,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::ToggleRoleResponseDto>,
            // Users
            users_dtos::UserDto,
            users_dtos::ProfileResponseDto,
            users_dtos::UpdateProfileDto,
            users_dtos::RatingSummaryDto,
            users_dtos::InvestigatorProfileDto,
            ApiResponse<users_dtos::ProfileResponseDto>,
            ApiResponse<users_dtos::InvestigatorProfileDto>,
            // Investigations
            investigations_models::InvestigationStatus,
            investigations_models::InvestigationPriority,
            investigations_dtos::BudgetInput,
            investigations_dtos::CreateInvestigationDto,
            investigations_dtos::InvestigationResponseDto,
            investigations_dtos::InvestigationListItemDto,
            ApiResponse<investigations_dtos::InvestigationResponseDto>,
            ApiResponse<investigations_dtos::InvestigationListItemDto>,
            ApiResponse<Vec<investigations_dtos::InvestigationListItemDto>>,
            // Reports
            reports_dtos::SubmitReportDto,
            reports_dtos::RateReportDto,
            reports_dtos::ReportResponseDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            // Dashboard
            dashboard_dtos::ClientStatsDto,
            dashboard_dtos::InvestigatorStatsDto,
            dashboard_dtos::DashboardStatisticsDto,
            dashboard_dtos::RecentInvestigationsDto,
            dashboard_dtos::PendingRatingDto,
            dashboard_dtos::PendingActionsDto,
            dashboard_dtos::DashboardDto,
            ApiResponse<dashboard_dtos::DashboardDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and role toggling"),
        (name = "users", description = "User profiles and investigator ratings"),
        (name = "investigations", description = "Investigation requests and their lifecycle"),
        (name = "reports", description = "Investigation reports and ratings"),
        (name = "dashboard", description = "Per-role overview for the signed-in user"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Investigation Hub API",
        version = "0.1.0",
        description = "API documentation for Investigation Hub",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
