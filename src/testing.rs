//! Deterministic fakes for the external capabilities

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use url::Url;

use crate::oracle::{GenerationOracle, OracleError, OracleLabel, OracleOutput};
use crate::retriever::{
    EncyclopediaHit, EncyclopediaSearch, GazetteerSearch, InstantAnswer, InstantAnswerSearch,
    KnowledgeBaseSearch, KnowledgeEntity, Place, ProviderError,
};
use crate::service::{CancellationToken, RateGovernor};

#[derive(Debug, Clone, Default)]
enum Mode {
    #[default]
    Empty,
    AnswerAll,
    AnswerQuery(String),
    Fail,
    /// Calls never complete
    Hang,
    /// Instant answer with related topics but no abstract
    NoAbstract,
}

/// Shared state of a fake provider: how it answers and what it was asked
#[derive(Debug, Default)]
struct FakeState {
    mode: Mutex<Mode>,
    queries: Mutex<Vec<String>>,
}

impl FakeState {
    fn set(&self, mode: Mode) {
        *self.mode.lock().unwrap() = mode;
    }

    /// Record the query and return how the fake answers it
    async fn record(&self, query: &str) -> Result<Mode, ProviderError> {
        self.queries.lock().unwrap().push(query.to_string());
        let mode = self.mode.lock().unwrap().clone();
        match mode {
            Mode::Fail => Err(ProviderError::RateLimited),
            Mode::Hang => std::future::pending().await,
            Mode::AnswerQuery(ref q) if q != query => Ok(Mode::Empty),
            other => Ok(other),
        }
    }

    fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

fn is_positive(mode: &Mode) -> bool {
    matches!(mode, Mode::AnswerAll | Mode::AnswerQuery(_))
}

macro_rules! fake_controls {
    ($name:ident) => {
        #[derive(Debug, Default)]
        pub struct $name {
            state: FakeState,
        }

        #[allow(dead_code)]
        impl $name {
            pub fn answer_all(&self) {
                self.state.set(Mode::AnswerAll);
            }

            pub fn answer_query(&self, query: &str) {
                self.state.set(Mode::AnswerQuery(query.to_string()));
            }

            pub fn fail_all(&self) {
                self.state.set(Mode::Fail);
            }

            pub fn hang_all(&self) {
                self.state.set(Mode::Hang);
            }

            pub fn calls(&self) -> usize {
                self.state.calls()
            }

            pub fn queries(&self) -> Vec<String> {
                self.state.queries()
            }
        }
    };
}

fake_controls!(FakeEncyclopedia);
fake_controls!(FakeInstantAnswer);
fake_controls!(FakeGazetteer);
fake_controls!(FakeKnowledgeBase);

impl FakeInstantAnswer {
    pub fn answer_without_abstract(&self) {
        self.state.set(Mode::NoAbstract);
    }
}

#[async_trait]
impl EncyclopediaSearch for FakeEncyclopedia {
    async fn search_encyclopedia(
        &self,
        query: &str,
    ) -> Result<Vec<EncyclopediaHit>, ProviderError> {
        if !is_positive(&self.state.record(query).await?) {
            return Ok(vec![]);
        }
        Ok(vec![EncyclopediaHit {
            title: "Reference Article".to_string(),
            snippet: format!("Article about {}", query),
            url: Url::parse("https://en.wikipedia.org/wiki/Reference_Article").unwrap(),
        }])
    }
}

#[async_trait]
impl InstantAnswerSearch for FakeInstantAnswer {
    async fn search_instant_answer(&self, query: &str) -> Result<InstantAnswer, ProviderError> {
        let mode = self.state.record(query).await?;
        if matches!(mode, Mode::NoAbstract) {
            return Ok(InstantAnswer {
                abstract_text: Some(String::new()),
                abstract_source: Some("Wikipedia".to_string()),
                abstract_url: None,
            });
        }
        if !is_positive(&mode) {
            return Ok(InstantAnswer::default());
        }
        Ok(InstantAnswer {
            abstract_text: Some(format!("Summary of {}", query)),
            abstract_source: Some("Wikipedia".to_string()),
            abstract_url: Url::parse("https://en.wikipedia.org/wiki/Summary").ok(),
        })
    }
}

#[async_trait]
impl GazetteerSearch for FakeGazetteer {
    async fn search_gazetteer(&self, place_name: &str) -> Result<Vec<Place>, ProviderError> {
        if !is_positive(&self.state.record(place_name).await?) {
            return Ok(vec![]);
        }
        Ok(vec![Place {
            display_name: place_name.to_string(),
            lat: "0.0".to_string(),
            lon: "0.0".to_string(),
            place_type: Some("city".to_string()),
            importance: Some(0.5),
        }])
    }
}

#[async_trait]
impl KnowledgeBaseSearch for FakeKnowledgeBase {
    async fn search_knowledge_base(
        &self,
        query: &str,
    ) -> Result<Vec<KnowledgeEntity>, ProviderError> {
        if !is_positive(&self.state.record(query).await?) {
            return Ok(vec![]);
        }
        Ok(vec![KnowledgeEntity {
            id: "Q1".to_string(),
            label: Some(query.to_string()),
            description: None,
        }])
    }
}

/// Counts pacing requests instead of sleeping
#[derive(Debug, Default)]
pub struct RecordingGovernor {
    calls: AtomicUsize,
}

impl RecordingGovernor {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateGovernor for RecordingGovernor {
    async fn pace(&self, _cancel: &CancellationToken) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
enum OracleMode {
    Labels(Vec<OracleLabel>),
    /// One generated-side score per call, in order
    Sequence(Vec<f64>),
    /// Like `Sequence`, but calls past the end never complete
    SequenceThenHang(Vec<f64>),
    Fail,
    Hang,
}

pub struct FakeOracle {
    mode: OracleMode,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl FakeOracle {
    fn with_mode(mode: OracleMode) -> Self {
        Self {
            mode,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn labels(labels: &[(&str, f64)]) -> Vec<OracleLabel> {
        labels
            .iter()
            .map(|(label, score)| OracleLabel {
                label: label.to_string(),
                score: *score,
            })
            .collect()
    }

    pub fn text_labels(labels: &[(&str, f64)]) -> Self {
        Self::with_mode(OracleMode::Labels(Self::labels(labels)))
    }

    pub fn image_labels(labels: &[(&str, f64)]) -> Self {
        Self::with_mode(OracleMode::Labels(Self::labels(labels)))
    }

    pub fn image_sequence(scores: &[f64]) -> Self {
        Self::with_mode(OracleMode::Sequence(scores.to_vec()))
    }

    pub fn image_sequence_then_hang(scores: &[f64]) -> Self {
        Self::with_mode(OracleMode::SequenceThenHang(scores.to_vec()))
    }

    pub fn failing() -> Self {
        Self::with_mode(OracleMode::Fail)
    }

    pub fn hanging() -> Self {
        Self::with_mode(OracleMode::Hang)
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    async fn respond(&self) -> Result<OracleOutput, OracleError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let labels = match &self.mode {
            OracleMode::Labels(labels) => labels.clone(),
            OracleMode::Sequence(scores) => {
                let score = scores.get(call).copied().unwrap_or(0.5);
                vec![OracleLabel {
                    label: "artificial".to_string(),
                    score,
                }]
            }
            OracleMode::SequenceThenHang(scores) => match scores.get(call) {
                Some(&score) => vec![OracleLabel {
                    label: "artificial".to_string(),
                    score,
                }],
                None => std::future::pending().await,
            },
            OracleMode::Fail => return Err(OracleError::Status(503)),
            OracleMode::Hang => std::future::pending().await,
        };

        Ok(OracleOutput {
            model: "fake-detector".to_string(),
            labels,
        })
    }
}

#[async_trait]
impl GenerationOracle for FakeOracle {
    async fn text_probability(&self, _text: &str) -> Result<OracleOutput, OracleError> {
        self.respond().await
    }

    async fn image_probability(&self, _image: &[u8]) -> Result<OracleOutput, OracleError> {
        self.respond().await
    }
}
