use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Create routes for the reports feature
///
/// Note: This feature requires authentication
pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports/{investigation_id}",
            get(handlers::get_report).post(handlers::submit_report),
        )
        .route(
            "/api/reports/{investigation_id}/rate",
            post(handlers::rate_report),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{client_user, investigator_user, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use sqlx::postgres::PgPoolOptions;

    fn server_for(user: crate::features::auth::model::AuthenticatedUser) -> TestServer {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let app = with_user(routes(Arc::new(ReportService::new(pool))), user);
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_out_of_range_rating_is_rejected_before_lookup() {
        let server = server_for(client_user());

        let response = server
            .post(&format!("/api/reports/{}/rate", uuid::Uuid::new_v4()))
            .json(&json!({ "rating": 7 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert!(body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("Rating must be between 1 and 5"));
    }

    #[tokio::test]
    async fn test_only_investigators_submit_reports() {
        let server = server_for(client_user());

        server
            .post(&format!("/api/reports/{}", uuid::Uuid::new_v4()))
            .json(&json!({ "report_content": "Findings" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_only_clients_rate_reports() {
        let server = server_for(investigator_user());

        server
            .post(&format!("/api/reports/{}/rate", uuid::Uuid::new_v4()))
            .json(&json!({ "rating": 5 }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}
