//! Investigation requests and their lifecycle.
//!
//! Status moves `submitted -> pending -> completed`. Each transition is a
//! conditional UPDATE inside a transaction. When it matches no row the
//! current row is re-read to explain why.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Guard | Description |
//! |--------|----------|-------|-------------|
//! | GET | `/api/investigations` | any | List by active role |
//! | POST | `/api/investigations` | client | Submit a request |
//! | GET | `/api/investigations/{id}` | any | Single request |
//! | PATCH | `/api/investigations/{id}/accept` | investigator | Take an open request |
//! | PATCH | `/api/investigations/{id}/complete` | investigator | Finish an assigned request |
//! | POST | `/api/investigations/{id}/decline` | investigator | Hide an open request |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::InvestigationService;
