use serde::{Deserialize, Serialize};

/// Summary of one settlement run. Built fresh per call and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub processed_matches: u32,
    pub updated_scores: u32,
    pub errors: Vec<String>,
}

impl SettlementResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
