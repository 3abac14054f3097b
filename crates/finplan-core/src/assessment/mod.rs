pub mod intake;
pub mod model;

pub use intake::{assessment_from_json, validate_intake, AssessmentIntake};
pub use model::*;
