//! Wikipedia full-text search

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{
    EncyclopediaHit, EncyclopediaSearch, ProviderError, build_client, check_status, strip_html,
};
use crate::model::ProviderConfig;

/// Articles kept per search
const MAX_HITS: usize = 3;

// Response models - only the fields we need
#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    title: String,
    #[serde(default)]
    snippet: String,
}

/// Encyclopedic search against the MediaWiki search API
pub struct WikipediaRetriever {
    client: Client,
    api_url: Url,
}

impl WikipediaRetriever {
    pub fn new(config: &ProviderConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            client: build_client(config),
            api_url: Url::parse(&config.wikipedia_url)?,
        })
    }

    /// Article URL for a search title, e.g. `/wiki/Eiffel_Tower`
    fn article_url(&self, title: &str) -> Result<Url, ProviderError> {
        let slug = urlencoding::encode(&title.replace(' ', "_")).into_owned();
        self.api_url
            .join(&format!("/wiki/{}", slug))
            .map_err(|e| {
                ProviderError::ParseError(format!("Invalid article URL for {}: {}", title, e))
            })
    }
}

#[async_trait]
impl EncyclopediaSearch for WikipediaRetriever {
    async fn search_encyclopedia(
        &self,
        query: &str,
    ) -> Result<Vec<EncyclopediaHit>, ProviderError> {
        tracing::debug!(query = %query, "Searching Wikipedia");

        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("format", "json"),
            ])
            .send()
            .await?;

        let body: SearchResponse = check_status(response)?.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to deserialize Wikipedia search: {}", e))
        })?;

        body.query
            .map(|q| q.search)
            .unwrap_or_default()
            .into_iter()
            .take(MAX_HITS)
            .map(|entry| {
                Ok(EncyclopediaHit {
                    url: self.article_url(&entry.title)?,
                    snippet: strip_html(&entry.snippet),
                    title: entry.title,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_url() {
        let retriever = WikipediaRetriever::new(&ProviderConfig::default()).unwrap();
        let url = retriever.article_url("Eiffel Tower").unwrap();
        assert_eq!(url.as_str(), "https://en.wikipedia.org/wiki/Eiffel_Tower");
    }

    #[test]
    fn test_missing_query_block_parses() {
        let body: SearchResponse = serde_json::from_str(r#"{"batchcomplete": ""}"#).unwrap();
        assert!(body.query.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_search_known_article() {
        let retriever = WikipediaRetriever::new(&ProviderConfig::default()).unwrap();
        let hits = retriever.search_encyclopedia("Eiffel Tower").await.unwrap();
        assert!(!hits.is_empty());
        assert!(hits.len() <= MAX_HITS);
    }
}
