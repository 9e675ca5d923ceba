pub mod investigation_dto;

pub use investigation_dto::*;
