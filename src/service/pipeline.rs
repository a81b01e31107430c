//! Verification pipeline coordinator
//!
//! Runs one request end to end: generation likelihood, claim extraction,
//! corroboration, then verdict synthesis. Stages run one after another and
//! every external call is paced by the shared governor.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::cancellation::CancellationToken;
use super::claim_extraction::ClaimExtractor;
use super::fact_check::FactChecker;
use super::governor::{FixedDelayGovernor, RateGovernor};
use super::likelihood::{GenerationLikelihoodEstimator, ImageSource};
use super::verdict;
use crate::model::report::content_hash;
use crate::model::{ContentKind, PipelineConfig, PipelineReport};
use crate::oracle::HuggingFaceOracle;
use crate::retriever::{
    DuckDuckGoRetriever, NominatimRetriever, WikidataRetriever, WikipediaRetriever,
};

/// Shorter text carries nothing worth checking
const MIN_TEXT_CHARS: usize = 10;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PipelineError {
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    #[error("Text too short: at least {min} characters required")]
    TextTooShort { min: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Content submitted for verification, with text supplied by upstream extraction
#[derive(Debug, Clone)]
pub enum VerificationRequest {
    Text {
        text: String,
    },
    Image {
        image: ImageSource,
        /// OCR output, possibly empty
        ocr_text: String,
        /// Caption describing the image, possibly empty
        caption: String,
    },
    Video {
        frames: Vec<ImageSource>,
        /// Speech transcript, possibly empty
        transcript: String,
    },
}

impl VerificationRequest {
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Text { .. } => ContentKind::Text,
            Self::Image { .. } => ContentKind::Image,
            Self::Video { .. } => ContentKind::Video,
        }
    }

    /// Text whose claims are checked
    pub fn checkable_text(&self) -> String {
        match self {
            Self::Text { text } => text.clone(),
            Self::Image {
                ocr_text, caption, ..
            } => format!("{} {}", ocr_text, caption).trim().to_string(),
            Self::Video { transcript, .. } => transcript.clone(),
        }
    }

    fn validate(&self) -> Result<(), PipelineError> {
        match self {
            Self::Text { text } if text.trim().is_empty() => Err(PipelineError::EmptyInput("text")),
            Self::Text { text } if text.trim().chars().count() < MIN_TEXT_CHARS => {
                Err(PipelineError::TextTooShort {
                    min: MIN_TEXT_CHARS,
                })
            }
            Self::Image {
                image: ImageSource::Bytes(bytes),
                ..
            } if bytes.is_empty() => Err(PipelineError::EmptyInput("image")),
            Self::Video { frames, .. } if frames.is_empty() => {
                Err(PipelineError::EmptyInput("video frames"))
            }
            _ => Ok(()),
        }
    }
}

pub struct VerificationPipeline {
    extractor: ClaimExtractor,
    estimator: GenerationLikelihoodEstimator,
    fact_checker: FactChecker,
}

impl VerificationPipeline {
    pub fn new(
        extractor: ClaimExtractor,
        estimator: GenerationLikelihoodEstimator,
        fact_checker: FactChecker,
    ) -> Self {
        Self {
            extractor,
            estimator,
            fact_checker,
        }
    }

    /// Wire the live providers and oracle from configuration
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let invalid = |e: url::ParseError| PipelineError::InvalidConfig(e.to_string());
        let providers = &config.providers;

        let governor: Arc<dyn RateGovernor> =
            Arc::new(FixedDelayGovernor::new(config.pacing_delay()));

        let estimator = GenerationLikelihoodEstimator::new(
            Arc::new(HuggingFaceOracle::new(&config.oracle)),
            Arc::clone(&governor),
            config.oracle.timeout(),
            config.max_frames,
        );

        let fact_checker = FactChecker::with_standard_cascade(
            Arc::new(WikipediaRetriever::new(providers).map_err(invalid)?),
            Arc::new(DuckDuckGoRetriever::new(providers).map_err(invalid)?),
            Arc::new(NominatimRetriever::new(providers).map_err(invalid)?),
            Arc::new(WikidataRetriever::new(providers).map_err(invalid)?),
            governor,
            config.max_claims,
            config.fallback_claim_chars,
        );

        tracing::debug!(
            pacing_delay_ms = config.pacing_delay_ms,
            max_claims = config.max_claims,
            max_frames = config.max_frames,
            "Verification pipeline configured"
        );

        Ok(Self::new(ClaimExtractor::new(), estimator, fact_checker))
    }

    /// Run a request to completion.
    ///
    /// Only empty input is an error. Provider and oracle failures degrade the
    /// result; a cancelled request returns an inconclusive verdict flagged as
    /// cancelled.
    pub async fn verify(
        &self,
        request: &VerificationRequest,
        cancel: &CancellationToken,
    ) -> Result<PipelineReport, PipelineError> {
        request.validate()?;

        let id = Uuid::new_v4();
        let kind = request.kind();
        tracing::info!(request_id = %id, kind = ?kind, "Starting verification");

        let likelihood = match request {
            VerificationRequest::Text { text } => self.estimator.estimate_text(text, cancel).await,
            VerificationRequest::Image { image, .. } => {
                self.estimator.estimate_image(image, cancel).await
            }
            VerificationRequest::Video { frames, .. } => {
                self.estimator.estimate_frames(frames, cancel).await
            }
        };

        let checked_text = request.checkable_text();
        let extraction = self.extractor.extract(&checked_text);
        let fact_check = self
            .fact_checker
            .corroborate(&extraction.claims, &checked_text, cancel)
            .await;

        let cancelled = cancel.is_cancelled();
        let final_verdict = if cancelled {
            tracing::warn!(request_id = %id, "Verification cancelled before completion");
            verdict::inconclusive()
        } else {
            verdict::synthesize(likelihood.is_generated, fact_check.overall_verdict)
        };

        tracing::info!(
            request_id = %id,
            is_generated = likelihood.is_generated,
            model = %likelihood.model_used,
            fact_verdict = fact_check.overall_verdict.as_str(),
            category = ?final_verdict.category,
            risk = ?final_verdict.risk_level,
            "Verification complete"
        );

        Ok(PipelineReport {
            id,
            content_kind: kind,
            content_hash: content_hash(&checked_text),
            created_at: Utc::now(),
            claims: extraction.claims,
            extracted_data: extraction.extracted_data,
            likelihood_level: likelihood.confidence_level(),
            likelihood_message: likelihood.summary_message(),
            likelihood,
            likely_false: fact_check.likely_false(),
            fact_check_message: fact_check.summary_message(),
            fact_check,
            final_verdict,
            cancelled,
        })
    }
}
