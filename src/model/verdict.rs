//! Final risk verdict combining generation likelihood and corroboration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerdictCategory {
    /// Human-written and corroborated
    Trusted,
    /// Human-written but nothing corroborates it
    RealFakeNews,
    /// Machine-generated but corroborated
    AiAccurate,
    /// Machine-generated and nothing corroborates it
    AiMisinformation,
    /// Inconclusive
    Uncertain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalVerdict {
    pub category: VerdictCategory,
    pub risk_level: RiskLevel,
    pub explanation: String,
}
