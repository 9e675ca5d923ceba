//! Reports filed on completed investigations, and their one-time rating.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Guard | Description |
//! |--------|----------|-------|-------------|
//! | POST | `/api/reports/{investigation_id}` | investigator | File the report |
//! | POST | `/api/reports/{investigation_id}/rate` | client | Rate the report |
//! | GET | `/api/reports/{investigation_id}` | any | Read the report |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ReportService;
