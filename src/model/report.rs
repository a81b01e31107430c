//! Everything a verification request produced, as handed to persistence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::{
    ConfidenceLevel, ExtractedData, FactCheckResult, FinalVerdict, GenerationLikelihoodResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Image,
    Video,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub id: Uuid,
    pub content_kind: ContentKind,
    /// SHA-256 of the text that was checked
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    pub claims: Vec<String>,
    pub extracted_data: ExtractedData,
    pub likelihood: GenerationLikelihoodResult,
    pub likelihood_level: ConfidenceLevel,
    pub likelihood_message: String,
    pub fact_check: FactCheckResult,
    /// Nothing corroborated the content
    pub likely_false: bool,
    pub fact_check_message: String,
    pub final_verdict: FinalVerdict,
    /// The request was abandoned before every stage finished
    pub cancelled: bool,
}

/// Hex SHA-256 of the checked text
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_is_stable_hex() {
        let a = content_hash("hello");
        assert_eq!(a, content_hash("hello"));
        assert_ne!(a, content_hash("hello!"));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
