use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Rate;

/// Jurisdiction facts for one state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateParams {
    /// Whether the state offers an elective pass-through entity tax.
    pub ptet_available: bool,
    /// Entity-level rate applied to pass-through income when elected.
    pub ptet_rate: Rate,
    pub top_income_tax_rate: Rate,
}

/// Static per-state parameter table supplied by the host application.
///
/// The engine only reads it. Keys are two-letter upper-case codes; lookups
/// are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateParamTable {
    states: BTreeMap<String, StateParams>,
}

impl StateParamTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, code: &str, params: StateParams) -> Self {
        self.insert(code, params);
        self
    }

    pub fn insert(&mut self, code: &str, params: StateParams) {
        self.states.insert(code.trim().to_ascii_uppercase(), params);
    }

    pub fn get(&self, code: &str) -> Option<&StateParams> {
        self.states.get(&code.trim().to_ascii_uppercase())
    }

    /// PTET rate when the state offers the election, otherwise `None`.
    pub fn ptet_rate(&self, code: &str) -> Option<Rate> {
        self.get(code)
            .filter(|p| p.ptet_available && p.ptet_rate > Decimal::ZERO)
            .map(|p| p.ptet_rate)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
