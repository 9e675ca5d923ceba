pub mod investigation;

pub use investigation::*;
