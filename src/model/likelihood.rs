//! Generation-likelihood results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Model tag for the local text heuristic and for single-image fallbacks
pub const MODEL_FALLBACK_HEURISTIC: &str = "fallback-heuristic";
/// Model tag for a frame batch that could not be analyzed at all
pub const MODEL_FALLBACK: &str = "fallback";
/// Model tag for an aggregated frame-by-frame analysis
pub const MODEL_FRAME_ANALYSIS: &str = "frame-analysis-ai-detector";

/// Normalized output of the generation-likelihood estimator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationLikelihoodResult {
    pub is_generated: bool,
    /// 0-100
    pub confidence: f64,
    pub human_probability: f64,
    pub ai_probability: f64,
    pub model_used: String,
    pub raw_analysis: serde_json::Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suspicious_patterns: Vec<String>,
}

impl GenerationLikelihoodResult {
    /// Build a result from an AI-side probability in percent.
    ///
    /// Both probabilities are rounded to 2 decimals and always sum to 100.
    pub fn from_ai_probability(
        ai_probability: f64,
        confidence: f64,
        is_generated: bool,
        model_used: impl Into<String>,
        raw_analysis: serde_json::Value,
    ) -> Self {
        let ai_probability = round2(ai_probability.clamp(0.0, 100.0));

        Self {
            is_generated,
            confidence: round2(confidence.clamp(0.0, 100.0)),
            human_probability: round2(100.0 - ai_probability),
            ai_probability,
            model_used: model_used.into(),
            raw_analysis,
            suspicious_patterns: vec![],
        }
    }

    /// Neutral 50/50 result used when nothing could be analyzed
    pub fn neutral(model_used: impl Into<String>, reason: &str) -> Self {
        Self::from_ai_probability(
            50.0,
            50.0,
            false,
            model_used,
            serde_json::json!({ "error": reason }),
        )
    }

    /// True when the result came from a degraded path rather than the oracle
    pub fn is_fallback(&self) -> bool {
        self.model_used == MODEL_FALLBACK_HEURISTIC || self.model_used == MODEL_FALLBACK
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_confidence(self.confidence)
    }

    /// Short label for the generation decision, hedged when confidence is low
    pub fn verdict_label(&self) -> &'static str {
        if self.confidence >= 75.0 {
            if self.is_generated {
                "AI Generated"
            } else {
                "Human Created"
            }
        } else if self.confidence >= 60.0 {
            if self.is_generated {
                "Likely AI Generated"
            } else {
                "Likely Human Created"
            }
        } else {
            "Uncertain - Needs Manual Review"
        }
    }

    pub fn summary_message(&self) -> String {
        format!("{} ({}% confidence)", self.verdict_label(), self.confidence)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 90.0 {
            Self::VeryHigh
        } else if confidence >= 75.0 {
            Self::High
        } else if confidence >= 60.0 {
            Self::Medium
        } else if confidence >= 45.0 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::VeryHigh => "Very High",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::VeryLow => "Very Low",
        };
        f.write_str(label)
    }
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probabilities_are_complementary() {
        for ai in [0.0, 12.345, 33.333_33, 50.0, 66.666_66, 99.999, 100.0] {
            let r = GenerationLikelihoodResult::from_ai_probability(
                ai,
                ai,
                ai > 50.0,
                "test",
                serde_json::Value::Null,
            );
            assert!((r.ai_probability + r.human_probability - 100.0).abs() < 0.011);
        }
    }

    #[test]
    fn test_out_of_range_probability_is_clamped() {
        let r = GenerationLikelihoodResult::from_ai_probability(
            130.0,
            130.0,
            true,
            "test",
            serde_json::Value::Null,
        );
        assert_eq!(r.ai_probability, 100.0);
        assert_eq!(r.human_probability, 0.0);
        assert_eq!(r.confidence, 100.0);
    }

    #[test]
    fn test_confidence_buckets() {
        assert_eq!(ConfidenceLevel::from_confidence(95.0), ConfidenceLevel::VeryHigh);
        assert_eq!(ConfidenceLevel::from_confidence(75.0), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_confidence(60.0), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_confidence(45.0), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_confidence(10.0), ConfidenceLevel::VeryLow);
        assert_eq!(ConfidenceLevel::VeryHigh.to_string(), "Very High");
    }

    #[test]
    fn test_verdict_label_hedges_low_confidence() {
        let mut r = GenerationLikelihoodResult::neutral(MODEL_FALLBACK, "none");
        assert_eq!(r.verdict_label(), "Uncertain - Needs Manual Review");
        r.confidence = 65.0;
        r.is_generated = true;
        assert_eq!(r.verdict_label(), "Likely AI Generated");
        r.confidence = 80.0;
        r.is_generated = false;
        assert_eq!(r.verdict_label(), "Human Created");
    }
}
