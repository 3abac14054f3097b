pub mod error;
pub mod types;

pub mod assessment;
pub mod debt;
pub mod engine;
pub mod gating;
pub mod ranking;
pub mod roadmap;
pub mod scoring;
pub mod strategies;
pub mod tax_tables;

pub use error::PlannerError;
pub use types::*;

/// Standard result type for operations that cross the validation boundary
pub type PlannerResult<T> = Result<T, PlannerError>;
