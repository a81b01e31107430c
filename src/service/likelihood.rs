//! Generation-likelihood estimation
//!
//! Wraps the remote oracle and degrades to local fallbacks on any failure, so
//! callers always receive a normalized result.

use std::borrow::Cow;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use serde_json::json;

use super::cancellation::CancellationToken;
use super::governor::RateGovernor;
use crate::model::GenerationLikelihoodResult;
use crate::model::likelihood::{
    MODEL_FALLBACK, MODEL_FALLBACK_HEURISTIC, MODEL_FRAME_ANALYSIS, round2,
};
use crate::oracle::{GenerationOracle, OracleError, OracleOutput};

/// Points per AI-disclosure phrase found
const INDICATOR_WEIGHT: f64 = 30.0;
/// Points for suspiciously uniform sentence length
const UNIFORMITY_WEIGHT: f64 = 20.0;
/// The heuristic never claims more than this
const HEURISTIC_CAP: f64 = 70.0;
/// Mean sentence length (words) considered suspiciously uniform, [start, end)
const UNIFORM_SENTENCE_WORDS: std::ops::Range<f64> = 20.0..25.0;
/// Generated-frame share above which suspicious patterns are reported
const SUSPICIOUS_FRAME_SHARE: f64 = 0.6;

/// Phrases that disclose chatbot-written text
const AI_DISCLOSURE_PATTERNS: &[&str] = &[
    r"(?i)as an ai language model",
    r"(?i)i don['’]t have personal",
    r"(?i)i cannot (?:provide|access|browse)",
    r"(?i)my knowledge (?:cutoff|was last updated)",
    r"(?i)i['’]m (?:just )?an ai",
];

/// An image to score, either already in memory or on disk
#[derive(Debug, Clone)]
pub enum ImageSource {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

impl ImageSource {
    async fn load(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match self {
            Self::Bytes(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
            Self::Path(path) => tokio::fs::read(path).await.map(Cow::Owned),
        }
    }
}

/// Why an image produced no oracle score
#[derive(Debug, thiserror::Error)]
enum ImageFailure {
    #[error("Image could not be read: {0}")]
    Unreadable(#[from] std::io::Error),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl ImageFailure {
    /// Whether the failure happened after an external call was made
    fn reached_oracle(&self) -> bool {
        match self {
            Self::Unreadable(_) => false,
            Self::Oracle(OracleError::NotConfigured | OracleError::Cancelled) => false,
            Self::Oracle(_) => true,
        }
    }
}

/// Content whose generation likelihood is estimated
#[derive(Debug, Clone, Copy)]
pub enum Content<'a> {
    Text(&'a str),
    Image(&'a ImageSource),
    /// Decoded video frames in playback order
    Frames(&'a [ImageSource]),
}

/// Estimates whether content was machine-generated
pub struct GenerationLikelihoodEstimator {
    oracle: Arc<dyn GenerationOracle>,
    governor: Arc<dyn RateGovernor>,
    timeout: Duration,
    max_frames: usize,
    indicators: Vec<Regex>,
    sentence_split: Regex,
}

impl GenerationLikelihoodEstimator {
    pub fn new(
        oracle: Arc<dyn GenerationOracle>,
        governor: Arc<dyn RateGovernor>,
        timeout: Duration,
        max_frames: usize,
    ) -> Self {
        Self {
            oracle,
            governor,
            timeout,
            max_frames,
            indicators: AI_DISCLOSURE_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("disclosure pattern must compile"))
                .collect(),
            sentence_split: Regex::new(r"[.!?]+(?:\s+|$)")
                .expect("sentence pattern must compile"),
        }
    }

    pub async fn estimate(
        &self,
        content: Content<'_>,
        cancel: &CancellationToken,
    ) -> GenerationLikelihoodResult {
        match content {
            Content::Text(text) => self.estimate_text(text, cancel).await,
            Content::Image(image) => self.estimate_image(image, cancel).await,
            Content::Frames(frames) => self.estimate_frames(frames, cancel).await,
        }
    }

    /// Score text with the oracle, falling back to the phrase heuristic
    pub async fn estimate_text(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> GenerationLikelihoodResult {
        match self.call_oracle(self.oracle.text_probability(text), cancel).await {
            Ok(output) => match normalize_oracle_output(&output) {
                Ok(result) => return result,
                Err(e) => {
                    tracing::warn!(error = %e, "Oracle text response unusable, using heuristic")
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Oracle text detection failed, using heuristic");
            }
        }

        self.heuristic_text_estimate(text)
    }

    /// Score an image with the oracle; failures yield a neutral result
    pub async fn estimate_image(
        &self,
        image: &ImageSource,
        cancel: &CancellationToken,
    ) -> GenerationLikelihoodResult {
        match self.score_image(image, cancel).await {
            Ok(result) => result,
            Err(e) => image_fallback(&e),
        }
    }

    async fn score_image(
        &self,
        image: &ImageSource,
        cancel: &CancellationToken,
    ) -> Result<GenerationLikelihoodResult, ImageFailure> {
        let bytes = image.load().await?;
        let output = self
            .call_oracle(self.oracle.image_probability(&bytes), cancel)
            .await?;
        Ok(normalize_oracle_output(&output)?)
    }

    /// Score the first frames one by one and aggregate
    pub async fn estimate_frames(
        &self,
        frames: &[ImageSource],
        cancel: &CancellationToken,
    ) -> GenerationLikelihoodResult {
        let to_analyze = &frames[..frames.len().min(self.max_frames)];
        let mut frame_results = Vec::with_capacity(to_analyze.len());

        for (index, frame) in to_analyze.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::debug!(analyzed = index, "Frame analysis cancelled");
                break;
            }

            let outcome = self.score_image(frame, cancel).await;
            let paced = match &outcome {
                Ok(_) => true,
                Err(e) => e.reached_oracle(),
            };

            let result = match outcome {
                Ok(result) => result,
                Err(ImageFailure::Oracle(OracleError::Cancelled)) => {
                    tracing::debug!(analyzed = index, "Frame analysis cancelled mid-call");
                    break;
                }
                Err(e) => image_fallback(&e),
            };

            tracing::debug!(
                frame = index,
                is_generated = result.is_generated,
                confidence = result.confidence,
                model = %result.model_used,
                "Frame analyzed"
            );
            frame_results.push(result);

            if paced {
                self.governor.pace(cancel).await;
            }
        }

        if frame_results.iter().all(|r| r.is_fallback()) {
            tracing::warn!(
                frames_supplied = frames.len(),
                "No frame could be analyzed, using neutral fallback"
            );
            return GenerationLikelihoodResult::neutral(MODEL_FALLBACK, "Video analysis failed");
        }

        aggregate_frames(frame_results)
    }

    /// Local phrase and sentence-uniformity heuristic, capped below the oracle
    pub fn heuristic_text_estimate(&self, text: &str) -> GenerationLikelihoodResult {
        let indicators_found = self.indicators.iter().filter(|p| p.is_match(text)).count();

        let sentence_lengths: Vec<usize> = self
            .sentence_split
            .split(text)
            .map(|s| s.split_whitespace().count())
            .filter(|&words| words > 0)
            .collect();
        let mean_sentence_words = if sentence_lengths.is_empty() {
            0.0
        } else {
            sentence_lengths.iter().sum::<usize>() as f64 / sentence_lengths.len() as f64
        };
        let uniform = UNIFORM_SENTENCE_WORDS.contains(&mean_sentence_words);

        let score = (indicators_found as f64 * INDICATOR_WEIGHT
            + if uniform { UNIFORMITY_WEIGHT } else { 0.0 })
        .min(HEURISTIC_CAP);

        tracing::debug!(
            indicators_found = indicators_found,
            mean_sentence_words = mean_sentence_words,
            score = score,
            "Heuristic text estimate"
        );

        GenerationLikelihoodResult::from_ai_probability(
            score,
            score,
            score > 50.0,
            MODEL_FALLBACK_HEURISTIC,
            json!({
                "method": "heuristic",
                "indicatorsFound": indicators_found,
                "meanSentenceWords": round2(mean_sentence_words),
                "uniformSentences": uniform,
                "note": "Primary model unavailable, using basic detection",
            }),
        )
    }

    /// Run an oracle call bounded by the timeout and the request's cancellation
    async fn call_oracle<F>(
        &self,
        call: F,
        cancel: &CancellationToken,
    ) -> Result<OracleOutput, OracleError>
    where
        F: Future<Output = Result<OracleOutput, OracleError>>,
    {
        if cancel.is_cancelled() {
            return Err(OracleError::Cancelled);
        }

        tokio::select! {
            outcome = tokio::time::timeout(self.timeout, call) => {
                outcome.map_err(|_| OracleError::Timeout)?
            }
            _ = cancel.cancelled() => Err(OracleError::Cancelled),
        }
    }
}

fn image_fallback(failure: &ImageFailure) -> GenerationLikelihoodResult {
    tracing::warn!(error = %failure, "Image detection failed, using neutral fallback");
    let reason = match failure {
        ImageFailure::Unreadable(_) => "Image could not be read",
        ImageFailure::Oracle(_) => "Detection failed, using fallback",
    };
    GenerationLikelihoodResult::neutral(MODEL_FALLBACK_HEURISTIC, reason)
}

/// Convert oracle labels into a complementary percentage result
fn normalize_oracle_output(
    output: &OracleOutput,
) -> Result<GenerationLikelihoodResult, OracleError> {
    let generated = output.generated_probability()?;
    let is_generated = generated > 0.5;
    let confidence = generated.max(1.0 - generated) * 100.0;

    Ok(GenerationLikelihoodResult::from_ai_probability(
        generated * 100.0,
        confidence,
        is_generated,
        output.model.clone(),
        json!({ "labels": output.labels }),
    ))
}

fn aggregate_frames(frame_results: Vec<GenerationLikelihoodResult>) -> GenerationLikelihoodResult {
    let analyzed = frame_results.len();
    let generated_frames = frame_results.iter().filter(|r| r.is_generated).count();
    let generated_share = generated_frames as f64 / analyzed as f64;
    let mean_confidence =
        frame_results.iter().map(|r| r.confidence).sum::<f64>() / analyzed as f64;

    let mut result = GenerationLikelihoodResult::from_ai_probability(
        generated_share * 100.0,
        mean_confidence,
        generated_share > 0.5,
        MODEL_FRAME_ANALYSIS,
        json!({
            "framesAnalyzed": analyzed,
            "aiFrames": generated_frames,
            "humanFrames": analyzed - generated_frames,
            "avgScore": (mean_confidence / 100.0 * 1000.0).round() / 1000.0,
            "frameResults": frame_results,
        }),
    );

    if generated_share > SUSPICIOUS_FRAME_SHARE {
        result.suspicious_patterns = vec![
            "Multiple frames show AI generation patterns".to_string(),
            "Inconsistent visual artifacts detected".to_string(),
        ];
    }

    result
}
