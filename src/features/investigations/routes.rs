use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::investigations::handlers;
use crate::features::investigations::services::InvestigationService;

/// Create routes for the investigations feature
///
/// Note: This feature requires authentication
pub fn routes(service: Arc<InvestigationService>) -> Router {
    Router::new()
        .route(
            "/api/investigations",
            get(handlers::list_investigations).post(handlers::create_investigation),
        )
        .route("/api/investigations/{id}", get(handlers::get_investigation))
        .route(
            "/api/investigations/{id}/accept",
            patch(handlers::accept_investigation),
        )
        .route(
            "/api/investigations/{id}/complete",
            patch(handlers::complete_investigation),
        )
        .route(
            "/api/investigations/{id}/decline",
            post(handlers::decline_investigation),
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

    // Guards and extractors reject before any query runs, so a lazy pool
    // that never connects is enough.
    fn service() -> Arc<InvestigationService> {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        Arc::new(InvestigationService::new(pool))
    }

    #[tokio::test]
    async fn test_investigator_cannot_create_request() {
        let app = with_user(routes(service()), investigator_user());
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/investigations")
            .json(&json!({
                "title": "Background check",
                "description": "Verify employment history",
                "priority": "low",
                "deadline": "2030-01-01",
                "budget": 100
            }))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Insufficient permissions");
    }

    #[tokio::test]
    async fn test_client_cannot_accept_request() {
        let app = with_user(routes(service()), client_user());
        let server = TestServer::new(app).unwrap();

        server
            .patch(&format!("/api/investigations/{}/accept", uuid::Uuid::new_v4()))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invalid_create_body_is_rejected() {
        let app = with_user(routes(service()), client_user());
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/investigations")
            .json(&json!({
                "title": "ab",
                "description": "Verify employment history",
                "priority": "low",
                "deadline": "2030-13-01",
                "budget": "-5"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let app = with_user(routes(service()), investigator_user());
        let server = TestServer::new(app).unwrap();

        server
            .patch("/api/investigations/not-a-uuid/complete")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_status_filter_uses_error_envelope() {
        let app = with_user(routes(service()), client_user());
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/investigations?status=archived").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid query parameter"));
    }
}
