use chrono::{Datelike, NaiveDate};

use super::state_params::{StateParamTable, StateParams};
use crate::assessment::Assessment;
use crate::gating::Gates;
use crate::tax_tables;
use crate::types::Rate;

/// Read-only view handed to every calculator.
#[derive(Debug, Clone, Copy)]
pub struct AssessmentContext<'a> {
    pub assessment: &'a Assessment,
    pub gates: &'a Gates,
    pub state_params: &'a StateParamTable,
    pub as_of: NaiveDate,
}

impl<'a> AssessmentContext<'a> {
    pub fn new(
        assessment: &'a Assessment,
        gates: &'a Gates,
        state_params: &'a StateParamTable,
        as_of: NaiveDate,
    ) -> Self {
        Self {
            assessment,
            gates,
            state_params,
            as_of,
        }
    }

    pub fn marginal_rate(&self) -> Rate {
        tax_tables::marginal_rate_proxy(self.assessment)
    }

    pub fn state(&self) -> Option<&'a StateParams> {
        self.state_params.get(&self.assessment.profile.state)
    }

    /// The next `month`/`day` on or after the as-of date.
    pub fn next_deadline(&self, month: u32, day: u32) -> Option<NaiveDate> {
        next_on_or_after(self.as_of, month, day)
    }
}

pub(crate) fn next_on_or_after(as_of: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(as_of.year(), month, day)?;
    if this_year >= as_of {
        Some(this_year)
    } else {
        NaiveDate::from_ymd_opt(as_of.year() + 1, month, day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_deadline_rolls_into_next_year() {
        let as_of = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(
            next_on_or_after(as_of, 3, 15),
            NaiveDate::from_ymd_opt(2027, 3, 15)
        );
        assert_eq!(
            next_on_or_after(as_of, 12, 31),
            NaiveDate::from_ymd_opt(2026, 12, 31)
        );
        assert_eq!(next_on_or_after(as_of, 10, 17), Some(as_of));
    }
}
