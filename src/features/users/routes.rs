use crate::features::users::handlers;
use crate::features::users::services::UserService;
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route(
            "/api/users/profile",
            get(handlers::get_profile).patch(handlers::update_profile),
        )
        .route(
            "/api/users/investigators/{id}",
            get(handlers::get_investigator_profile),
        )
        .with_state(service)
}
