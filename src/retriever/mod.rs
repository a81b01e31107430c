//! Reference providers consulted by the fact corroboration cascade
//!
//! Each provider is exposed as a narrow search capability so the cascade can be
//! driven by deterministic fakes in tests and by reqwest clients in production.

mod duckduckgo;
mod nominatim;
mod wikidata;
mod wikipedia;

use async_trait::async_trait;
use reqwest::{Client, Response};
use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::ProviderConfig;

pub use duckduckgo::DuckDuckGoRetriever;
pub use nominatim::NominatimRetriever;
pub use wikidata::WikidataRetriever;
pub use wikipedia::WikipediaRetriever;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Unexpected status {status}: {url}")]
    Status { status: u16, url: String },
}

/// Encyclopedia article matching a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncyclopediaHit {
    pub title: String,
    pub snippet: String,
    pub url: Url,
}

/// Instant-answer lookup; an empty abstract means no answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstantAnswer {
    pub abstract_text: Option<String>,
    pub abstract_source: Option<String>,
    pub abstract_url: Option<Url>,
}

impl InstantAnswer {
    pub fn has_abstract(&self) -> bool {
        self.abstract_text
            .as_deref()
            .map(|text| !text.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Gazetteer match for a place name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub display_name: String,
    pub lat: String,
    pub lon: String,
    pub place_type: Option<String>,
    pub importance: Option<f64>,
}

/// Knowledge-base entity matching a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntity {
    pub id: String,
    pub label: Option<String>,
    pub description: Option<String>,
}

#[async_trait]
pub trait EncyclopediaSearch: Send + Sync {
    async fn search_encyclopedia(&self, query: &str)
    -> Result<Vec<EncyclopediaHit>, ProviderError>;
}

#[async_trait]
pub trait InstantAnswerSearch: Send + Sync {
    async fn search_instant_answer(&self, query: &str) -> Result<InstantAnswer, ProviderError>;
}

#[async_trait]
pub trait GazetteerSearch: Send + Sync {
    async fn search_gazetteer(&self, place_name: &str) -> Result<Vec<Place>, ProviderError>;
}

#[async_trait]
pub trait KnowledgeBaseSearch: Send + Sync {
    async fn search_knowledge_base(&self, query: &str)
    -> Result<Vec<KnowledgeEntity>, ProviderError>;
}

/// Build the shared HTTP client; some providers reject requests without a User-Agent
fn build_client(config: &ProviderConfig) -> Client {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Map rate limiting and non-success statuses to provider errors
fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        tracing::warn!(url = %response.url(), "Provider rate limited");
        return Err(ProviderError::RateLimited);
    }

    if !status.is_success() {
        return Err(ProviderError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }

    Ok(response)
}

/// Strip markup from a search snippet
fn strip_html(fragment: &str) -> String {
    Html::parse_fragment(fragment)
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}
