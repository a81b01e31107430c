//! Claims and structured sub-extractions pulled from submitted text

use serde::{Deserialize, Serialize};

/// Structured data extracted from the whole text, independently of claims.
///
/// Each family is deduplicated on its own and keeps first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedData {
    pub dates: Vec<String>,
    pub locations: Vec<String>,
    pub numbers: Vec<String>,
    pub entities: Vec<String>,
}

impl ExtractedData {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
            && self.locations.is_empty()
            && self.numbers.is_empty()
            && self.entities.is_empty()
    }
}

/// Output of the claim extractor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Sentence-level spans carrying a checkable assertion, unique by exact text
    pub claims: Vec<String>,
    pub extracted_data: ExtractedData,
}
