//! Generation-likelihood oracle: a remote classifier that scores how likely
//! content is machine-generated

mod huggingface;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use huggingface::HuggingFaceOracle;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OracleError {
    #[error("Oracle not configured (missing API key)")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {0}")]
    Status(u16),

    #[error("Oracle call timed out")]
    Timeout,

    #[error("Oracle call cancelled")]
    Cancelled,

    #[error("Malformed oracle response: {0}")]
    Malformed(String),
}

/// One label/score pair as returned by a classification model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleLabel {
    pub label: String,
    /// 0.0-1.0
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSide {
    Generated,
    Human,
}

/// Map a model label onto the generated/human axis.
///
/// Text detectors use `LABEL_1`/`Fake` for generated and `LABEL_0`/`Real` for
/// human text; image detectors use `artificial`/`human`.
pub fn classify_label(label: &str) -> Option<LabelSide> {
    let label = label.trim().to_lowercase();
    match label.as_str() {
        "label_1" | "fake" | "ai" => Some(LabelSide::Generated),
        "label_0" | "real" => Some(LabelSide::Human),
        l if l.contains("artificial") || l.starts_with("ai-") || l.starts_with("ai ") => {
            Some(LabelSide::Generated)
        }
        l if l.contains("human") || l.contains("real") => Some(LabelSide::Human),
        _ => None,
    }
}

/// Raw classification returned by the oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleOutput {
    pub model: String,
    pub labels: Vec<OracleLabel>,
}

impl OracleOutput {
    /// Probability (0.0-1.0) that the content is generated.
    ///
    /// Uses the generated-side score when present, otherwise the complement of
    /// the human-side score.
    pub fn generated_probability(&self) -> Result<f64, OracleError> {
        let score_for = |side: LabelSide| {
            self.labels
                .iter()
                .find(|l| classify_label(&l.label) == Some(side))
                .map(|l| l.score)
        };

        let probability = match (score_for(LabelSide::Generated), score_for(LabelSide::Human)) {
            (Some(generated), _) => generated,
            (None, Some(human)) => 1.0 - human,
            (None, None) => {
                return Err(OracleError::Malformed(format!(
                    "no recognizable label in {:?}",
                    self.labels.iter().map(|l| &l.label).collect::<Vec<_>>()
                )));
            }
        };

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(OracleError::Malformed(format!(
                "score out of range: {}",
                probability
            )));
        }

        Ok(probability)
    }
}

#[async_trait]
pub trait GenerationOracle: Send + Sync {
    async fn text_probability(&self, text: &str) -> Result<OracleOutput, OracleError>;

    async fn image_probability(&self, image: &[u8]) -> Result<OracleOutput, OracleError>;
}
