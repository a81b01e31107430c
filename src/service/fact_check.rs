//! Fact corroboration cascade
//!
//! Each claim is offered to an ordered list of reference providers. The first
//! provider reporting a positive finding resolves the claim; a provider error
//! counts as a negative finding for that provider only.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde_json::json;
use url::Url;

use super::cancellation::CancellationToken;
use super::governor::RateGovernor;
use crate::model::{FactCheckResult, OverallVerdict, TruthState, VerificationRecord};
use crate::retriever::{
    EncyclopediaSearch, GazetteerSearch, InstantAnswerSearch, KnowledgeBaseSearch, ProviderError,
};

pub const ENCYCLOPEDIA_SOURCE: &str = "Wikipedia";
pub const INSTANT_ANSWER_SOURCE: &str = "DuckDuckGo Instant Answer";
pub const GAZETTEER_SOURCE: &str = "OpenStreetMap";
pub const KNOWLEDGE_BASE_SOURCE: &str = "Wikidata";

const ENCYCLOPEDIA_CONFIDENCE: f64 = 75.0;
const INSTANT_ANSWER_CONFIDENCE: f64 = 70.0;
const GAZETTEER_CONFIDENCE: f64 = 65.0;
const KNOWLEDGE_BASE_CONFIDENCE: f64 = 60.0;

const UNVERIFIABLE_CONFIDENCE: f64 = 30.0;
const VERIFIED_CONFIDENCE: f64 = 80.0;
const PARTIAL_BASE_CONFIDENCE: f64 = 50.0;
const PARTIAL_CONFIDENCE_SPAN: f64 = 30.0;

/// Positive result from one provider
#[derive(Debug, Clone)]
pub struct ProviderFinding {
    pub truth_state: TruthState,
    pub confidence: f64,
    pub details: serde_json::Value,
    pub sources: Vec<Url>,
}

/// One step of the corroboration cascade
#[async_trait]
pub trait CascadeProvider: Send + Sync {
    fn source_name(&self) -> &'static str;

    /// Query to send for a claim, or `None` when the provider does not apply
    fn query<'a>(&self, claim: &'a str) -> Option<Cow<'a, str>> {
        Some(Cow::Borrowed(claim))
    }

    /// `Ok(None)` is a negative finding
    async fn probe(&self, query: &str) -> Result<Option<ProviderFinding>, ProviderError>;
}

/// Encyclopedic search: any article hit is provisional corroboration
pub struct EncyclopediaProvider {
    search: Arc<dyn EncyclopediaSearch>,
}

impl EncyclopediaProvider {
    pub fn new(search: Arc<dyn EncyclopediaSearch>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl CascadeProvider for EncyclopediaProvider {
    fn source_name(&self) -> &'static str {
        ENCYCLOPEDIA_SOURCE
    }

    async fn probe(&self, query: &str) -> Result<Option<ProviderFinding>, ProviderError> {
        let hits = self.search.search_encyclopedia(query).await?;
        if hits.is_empty() {
            return Ok(None);
        }

        Ok(Some(ProviderFinding {
            truth_state: TruthState::True,
            confidence: ENCYCLOPEDIA_CONFIDENCE,
            sources: hits.iter().map(|h| h.url.clone()).collect(),
            details: json!(hits),
        }))
    }
}

/// Instant answers count only when they carry an abstract
pub struct InstantAnswerProvider {
    search: Arc<dyn InstantAnswerSearch>,
}

impl InstantAnswerProvider {
    pub fn new(search: Arc<dyn InstantAnswerSearch>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl CascadeProvider for InstantAnswerProvider {
    fn source_name(&self) -> &'static str {
        INSTANT_ANSWER_SOURCE
    }

    async fn probe(&self, query: &str) -> Result<Option<ProviderFinding>, ProviderError> {
        let answer = self.search.search_instant_answer(query).await?;
        if !answer.has_abstract() {
            return Ok(None);
        }

        Ok(Some(ProviderFinding {
            truth_state: TruthState::True,
            confidence: INSTANT_ANSWER_CONFIDENCE,
            sources: answer.abstract_url.iter().cloned().collect(),
            details: json!({
                "abstract": answer.abstract_text,
                "source": answer.abstract_source,
            }),
        }))
    }
}

/// Gazetteer lookup of the place named in a claim.
///
/// A place existing does not validate what the claim says happened there, so
/// the truth state stays unknown.
pub struct GazetteerProvider {
    search: Arc<dyn GazetteerSearch>,
    location: Regex,
}

impl GazetteerProvider {
    pub fn new(search: Arc<dyn GazetteerSearch>) -> Self {
        Self {
            search,
            location: Regex::new(r"\bin\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)")
                .expect("location pattern must compile"),
        }
    }
}

#[async_trait]
impl CascadeProvider for GazetteerProvider {
    fn source_name(&self) -> &'static str {
        GAZETTEER_SOURCE
    }

    fn query<'a>(&self, claim: &'a str) -> Option<Cow<'a, str>> {
        self.location
            .captures(claim)
            .and_then(|caps| caps.get(1))
            .map(|place| Cow::Borrowed(place.as_str()))
    }

    async fn probe(&self, query: &str) -> Result<Option<ProviderFinding>, ProviderError> {
        let places = self.search.search_gazetteer(query).await?;
        if places.is_empty() {
            return Ok(None);
        }

        Ok(Some(ProviderFinding {
            truth_state: TruthState::Unknown,
            confidence: GAZETTEER_CONFIDENCE,
            sources: vec![],
            details: json!(places),
        }))
    }
}

/// Structured entity search; an entity match says nothing about the claim itself
pub struct KnowledgeBaseProvider {
    search: Arc<dyn KnowledgeBaseSearch>,
}

impl KnowledgeBaseProvider {
    pub fn new(search: Arc<dyn KnowledgeBaseSearch>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl CascadeProvider for KnowledgeBaseProvider {
    fn source_name(&self) -> &'static str {
        KNOWLEDGE_BASE_SOURCE
    }

    async fn probe(&self, query: &str) -> Result<Option<ProviderFinding>, ProviderError> {
        let entities = self.search.search_knowledge_base(query).await?;
        if entities.is_empty() {
            return Ok(None);
        }

        Ok(Some(ProviderFinding {
            truth_state: TruthState::Unknown,
            confidence: KNOWLEDGE_BASE_CONFIDENCE,
            sources: vec![],
            details: json!(entities),
        }))
    }
}

/// Overall verdict and confidence for `verified` out of `probed` claims
pub fn overall_verdict(verified: usize, probed: usize) -> (OverallVerdict, f64) {
    if verified == 0 {
        (OverallVerdict::Unverifiable, UNVERIFIABLE_CONFIDENCE)
    } else if verified >= probed {
        (OverallVerdict::Verified, VERIFIED_CONFIDENCE)
    } else {
        let share = PARTIAL_CONFIDENCE_SPAN * verified as f64 / probed as f64;
        (OverallVerdict::PartiallyVerified, PARTIAL_BASE_CONFIDENCE + share)
    }
}

/// Corroborates claims against the provider cascade
pub struct FactChecker {
    providers: Vec<Box<dyn CascadeProvider>>,
    governor: Arc<dyn RateGovernor>,
    max_claims: usize,
    fallback_claim_chars: usize,
}

impl FactChecker {
    /// Providers are tried in the given order
    pub fn new(
        providers: Vec<Box<dyn CascadeProvider>>,
        governor: Arc<dyn RateGovernor>,
        max_claims: usize,
        fallback_claim_chars: usize,
    ) -> Self {
        Self {
            providers,
            governor,
            max_claims,
            fallback_claim_chars,
        }
    }

    /// Standard cascade: encyclopedia, instant answer, gazetteer, knowledge base
    pub fn with_standard_cascade(
        encyclopedia: Arc<dyn EncyclopediaSearch>,
        instant_answer: Arc<dyn InstantAnswerSearch>,
        gazetteer: Arc<dyn GazetteerSearch>,
        knowledge_base: Arc<dyn KnowledgeBaseSearch>,
        governor: Arc<dyn RateGovernor>,
        max_claims: usize,
        fallback_claim_chars: usize,
    ) -> Self {
        Self::new(
            vec![
                Box::new(EncyclopediaProvider::new(encyclopedia)),
                Box::new(InstantAnswerProvider::new(instant_answer)),
                Box::new(GazetteerProvider::new(gazetteer)),
                Box::new(KnowledgeBaseProvider::new(knowledge_base)),
            ],
            governor,
            max_claims,
            fallback_claim_chars,
        )
    }

    /// Claims that will actually be probed: the first extracted claims, or a
    /// synthetic claim cut from the text when extraction found none
    pub fn claims_to_probe(&self, claims: &[String], fallback_text: &str) -> Vec<String> {
        if !claims.is_empty() {
            return claims.iter().take(self.max_claims).cloned().collect();
        }

        let fallback = fallback_text.trim();
        if fallback.is_empty() {
            return vec![];
        }

        vec![fallback.chars().take(self.fallback_claim_chars).collect()]
    }

    pub async fn corroborate(
        &self,
        claims: &[String],
        fallback_text: &str,
        cancel: &CancellationToken,
    ) -> FactCheckResult {
        let to_probe = self.claims_to_probe(claims, fallback_text);
        let mut verified = Vec::new();
        let mut unverified = Vec::new();
        let mut sources = Vec::new();

        for claim in &to_probe {
            match self.run_cascade(claim, cancel).await {
                Some((source_name, finding)) => {
                    tracing::debug!(claim = %claim, source = source_name, "Claim corroborated");
                    sources.extend(finding.sources);
                    verified.push(VerificationRecord {
                        claim: claim.clone(),
                        truth_state: finding.truth_state,
                        source_name: source_name.to_string(),
                        confidence: finding.confidence,
                        details: finding.details,
                    });
                }
                None => {
                    tracing::debug!(claim = %claim, "No provider corroborated claim");
                    unverified.push(claim.clone());
                }
            }
        }

        let (overall_verdict, confidence) = overall_verdict(verified.len(), to_probe.len());

        tracing::info!(
            claims_extracted = claims.len(),
            claims_probed = to_probe.len(),
            verified = verified.len(),
            unverified = unverified.len(),
            verdict = overall_verdict.as_str(),
            confidence = confidence,
            cancelled = cancel.is_cancelled(),
            "Fact check complete"
        );

        FactCheckResult {
            verified,
            unverified,
            sources,
            overall_verdict,
            confidence,
        }
    }

    /// Try each provider in order; stop at the first positive finding
    async fn run_cascade(
        &self,
        claim: &str,
        cancel: &CancellationToken,
    ) -> Option<(&'static str, ProviderFinding)> {
        for provider in &self.providers {
            let Some(query) = provider.query(claim) else {
                tracing::trace!(provider = provider.source_name(), "Provider not applicable");
                continue;
            };

            if cancel.is_cancelled() {
                return None;
            }

            let outcome = tokio::select! {
                outcome = provider.probe(&query) => outcome,
                _ = cancel.cancelled() => return None,
            };

            self.governor.pace(cancel).await;

            match outcome {
                Ok(Some(finding)) => return Some((provider.source_name(), finding)),
                Ok(None) => {
                    tracing::debug!(provider = provider.source_name(), query = %query, "No match");
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.source_name(),
                        query = %query,
                        error = %e,
                        "Provider failed, trying next"
                    );
                }
            }
        }

        None
    }
}
