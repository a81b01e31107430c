//! Fact corroboration results

use serde::{Deserialize, Serialize};
use url::Url;

/// Whether a reference confirms a claim.
///
/// `Unknown` means the reference exists but neither confirms nor denies the
/// full assertion (a place existing says nothing about what happened there).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TruthState {
    True,
    False,
    Unknown,
}

/// One claim resolved by the first positive provider in the cascade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub claim: String,
    pub truth_state: TruthState,
    pub source_name: String,
    /// 0-100
    pub confidence: f64,
    pub details: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverallVerdict {
    Verified,
    PartiallyVerified,
    Unverifiable,
    /// Never produced by the corroboration algorithm; kept in the taxonomy
    /// because the verdict synthesizer treats it like `Unverifiable`.
    Uncertain,
}

impl OverallVerdict {
    /// True when at least one claim found a reference
    pub fn is_corroborated(self) -> bool {
        matches!(self, Self::Verified | Self::PartiallyVerified)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::PartiallyVerified => "partially-verified",
            Self::Unverifiable => "unverifiable",
            Self::Uncertain => "uncertain",
        }
    }
}

/// Aggregate corroboration outcome over all probed claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactCheckResult {
    pub verified: Vec<VerificationRecord>,
    pub unverified: Vec<String>,
    pub sources: Vec<Url>,
    pub overall_verdict: OverallVerdict,
    /// 0-100, may be fractional for partial verification
    pub confidence: f64,
}

impl FactCheckResult {
    /// Number of claims the cascade actually probed
    pub fn probed_count(&self) -> usize {
        self.verified.len() + self.unverified.len()
    }

    /// Content is treated as possibly false when nothing corroborated it
    pub fn likely_false(&self) -> bool {
        !self.overall_verdict.is_corroborated()
    }

    /// Human-readable summary of the corroboration outcome
    pub fn summary_message(&self) -> String {
        let verified = self.verified.len();
        let unverified = self.unverified.len();

        match self.overall_verdict {
            OverallVerdict::Verified => format!(
                "Information verified across {} credible source(s) with {:.1}% confidence. \
                 Claims found in encyclopedic sources and reference databases.",
                verified, self.confidence
            ),
            OverallVerdict::PartiallyVerified => format!(
                "Partially verified ({:.1}% confidence). {} of {} claims found in credible sources. \
                 {} claim(s) could not be verified.",
                self.confidence,
                verified,
                verified + unverified,
                unverified
            ),
            OverallVerdict::Unverifiable => format!(
                "Unable to verify claims ({:.1}% confidence). No credible sources found. \
                 This information should be treated with caution and may be false.",
                self.confidence
            ),
            OverallVerdict::Uncertain => format!(
                "Fact-check inconclusive ({:.1}% confidence). Insufficient information available. \
                 Manual verification recommended.",
                self.confidence
            ),
        }
    }
}
