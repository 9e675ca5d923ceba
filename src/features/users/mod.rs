//! User accounts, role grants and profiles.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/users/profile` | Profile of the caller |
//! | PATCH | `/api/users/profile` | Update names, bio, phone or password |
//! | GET | `/api/users/investigators/{id}` | Investigator profile with ratings |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
