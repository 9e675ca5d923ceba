pub mod auth;
pub mod dashboard;
pub mod investigations;
pub mod reports;
pub mod users;
