pub mod investigation_service;

pub use investigation_service::{fetch_request, InvestigationService};
