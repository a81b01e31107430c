//! Wikidata entity search

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{KnowledgeBaseSearch, KnowledgeEntity, ProviderError, build_client, check_status};
use crate::model::ProviderConfig;

const MAX_ENTITIES: usize = 3;

#[derive(Debug, Deserialize)]
struct EntitySearchResponse {
    #[serde(default)]
    search: Vec<EntityEntry>,
}

#[derive(Debug, Deserialize)]
struct EntityEntry {
    id: String,
    label: Option<String>,
    description: Option<String>,
}

pub struct WikidataRetriever {
    client: Client,
    api_url: Url,
}

impl WikidataRetriever {
    pub fn new(config: &ProviderConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            client: build_client(config),
            api_url: Url::parse(&config.wikidata_url)?,
        })
    }
}

#[async_trait]
impl KnowledgeBaseSearch for WikidataRetriever {
    async fn search_knowledge_base(
        &self,
        query: &str,
    ) -> Result<Vec<KnowledgeEntity>, ProviderError> {
        tracing::debug!(query = %query, "Searching Wikidata entities");

        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[
                ("action", "wbsearchentities"),
                ("search", query),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await?;

        let body: EntitySearchResponse = check_status(response)?.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to deserialize Wikidata search: {}", e))
        })?;

        Ok(body
            .search
            .into_iter()
            .take(MAX_ENTITIES)
            .map(|e| KnowledgeEntity {
                id: e.id,
                label: e.label,
                description: e.description,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_parses_as_empty() {
        // wbsearchentities reports bad input with an error object and no results
        let body: EntitySearchResponse =
            serde_json::from_str(r#"{"error": {"code": "no-such-entity"}}"#).unwrap();
        assert!(body.search.is_empty());
    }
}
