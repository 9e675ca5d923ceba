pub mod investigation_handler;

pub use investigation_handler::*;
