//! Local accounts, bearer tokens and role toggling.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/auth/register` | No | Create an account with client and/or investigator roles |
//! | POST | `/api/auth/login` | No | Exchange credentials for a token |
//! | POST | `/api/auth/toggle-role` | Yes | Switch active role and get a new token |
//! | GET | `/api/auth/me` | Yes | Resolved caller identity |

mod validator;

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use validator::JwtValidator;
