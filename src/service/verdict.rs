//! Final verdict synthesis
//!
//! A fixed decision table over the generation decision and whether any claim
//! was corroborated.

use crate::model::{FinalVerdict, OverallVerdict, RiskLevel, VerdictCategory};

const TRUSTED_EXPLANATION: &str = "This content appears to be human-created and the information \
     has been verified across credible sources.";
const REAL_FAKE_NEWS_EXPLANATION: &str = "This content appears to be human-created but contains \
     unverifiable or false information. Potential misinformation.";
const AI_ACCURATE_EXPLANATION: &str = "This content appears to be AI-generated but the information \
     is accurate and verified.";
const AI_MISINFORMATION_EXPLANATION: &str = "This content appears to be AI-generated and contains \
     unverifiable or false information. High risk of misinformation.";
const INCONCLUSIVE_EXPLANATION: &str =
    "Detection results are inconclusive. Manual verification strongly recommended.";

fn verdict(category: VerdictCategory, risk_level: RiskLevel, explanation: &str) -> FinalVerdict {
    FinalVerdict {
        category,
        risk_level,
        explanation: explanation.to_string(),
    }
}

/// Combine the generation decision with the corroboration outcome
pub fn synthesize(is_generated: bool, overall_verdict: OverallVerdict) -> FinalVerdict {
    match (is_generated, overall_verdict.is_corroborated()) {
        (false, true) => verdict(VerdictCategory::Trusted, RiskLevel::Low, TRUSTED_EXPLANATION),
        (false, false) => verdict(
            VerdictCategory::RealFakeNews,
            RiskLevel::High,
            REAL_FAKE_NEWS_EXPLANATION,
        ),
        (true, true) => verdict(
            VerdictCategory::AiAccurate,
            RiskLevel::Medium,
            AI_ACCURATE_EXPLANATION,
        ),
        (true, false) => verdict(
            VerdictCategory::AiMisinformation,
            RiskLevel::Critical,
            AI_MISINFORMATION_EXPLANATION,
        ),
    }
}

/// Verdict for a request whose stages did not all complete
pub fn inconclusive() -> FinalVerdict {
    verdict(
        VerdictCategory::Uncertain,
        RiskLevel::Medium,
        INCONCLUSIVE_EXPLANATION,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VERDICTS: [OverallVerdict; 4] = [
        OverallVerdict::Verified,
        OverallVerdict::PartiallyVerified,
        OverallVerdict::Unverifiable,
        OverallVerdict::Uncertain,
    ];

    #[test]
    fn test_decision_table() {
        for overall in ALL_VERDICTS {
            let corroborated = overall.is_corroborated();

            let human = synthesize(false, overall);
            let generated = synthesize(true, overall);

            if corroborated {
                assert_eq!(
                    (human.category, human.risk_level),
                    (VerdictCategory::Trusted, RiskLevel::Low)
                );
                assert_eq!(
                    (generated.category, generated.risk_level),
                    (VerdictCategory::AiAccurate, RiskLevel::Medium)
                );
            } else {
                assert_eq!(
                    (human.category, human.risk_level),
                    (VerdictCategory::RealFakeNews, RiskLevel::High)
                );
                assert_eq!(
                    (generated.category, generated.risk_level),
                    (VerdictCategory::AiMisinformation, RiskLevel::Critical)
                );
            }
        }
    }

    #[test]
    fn test_partial_verification_counts_as_corroborated() {
        let v = synthesize(false, OverallVerdict::PartiallyVerified);
        assert_eq!(v.category, VerdictCategory::Trusted);
        assert_eq!(v.explanation, TRUSTED_EXPLANATION);
    }

    #[test]
    fn test_inconclusive() {
        let v = inconclusive();
        assert_eq!(v.category, VerdictCategory::Uncertain);
        assert_eq!(v.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_categories_serialize_kebab_case() {
        let json = serde_json::to_value(synthesize(false, OverallVerdict::Unverifiable)).unwrap();
        assert_eq!(json["category"], "real-fake-news");
        assert_eq!(json["risk_level"], "high");
    }
}
