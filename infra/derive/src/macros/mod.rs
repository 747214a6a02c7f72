pub mod configurable;
pub mod error;
