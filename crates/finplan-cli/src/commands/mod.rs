pub mod assessment;
pub mod debt;
pub mod pipeline;
pub mod strategies;

use chrono::NaiveDate;
use clap::Args;
use std::error::Error;

use finplan_core::assessment::{validate_intake, Assessment, AssessmentIntake};

use crate::config::PlannerConfig;
use crate::input;

/// Shared state handed to every command.
pub struct Context {
    pub config: PlannerConfig,
    pub as_of: NaiveDate,
}

/// Arguments shared by every command that reads an assessment.
#[derive(Args)]
pub struct IntakeArgs {
    /// Path to the assessment JSON (reads piped stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

impl IntakeArgs {
    /// Read, decode and validate the assessment intake.
    pub fn load(&self) -> Result<Assessment, Box<dyn Error>> {
        let intake = self.load_intake()?;
        Ok(validate_intake(&intake)?)
    }

    pub fn load_intake(&self) -> Result<AssessmentIntake, Box<dyn Error>> {
        let document = input::read_document(self.input.as_deref(), "the assessment")?;
        let intake: AssessmentIntake = serde_json::from_value(document)
            .map_err(|e| format!("Malformed assessment: {e}"))?;
        Ok(intake)
    }
}

/// Split `a,b , c` into trimmed, non-empty codes.
pub fn parse_codes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
