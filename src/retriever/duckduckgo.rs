//! DuckDuckGo Instant Answer API

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{InstantAnswer, InstantAnswerSearch, ProviderError, build_client, check_status};
use crate::model::ProviderConfig;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswerResponse {
    #[serde(default, rename = "Abstract")]
    abstract_text: String,
    #[serde(default)]
    abstract_source: String,
    #[serde(default, rename = "AbstractURL")]
    abstract_url: String,
}

pub struct DuckDuckGoRetriever {
    client: Client,
    api_url: Url,
}

impl DuckDuckGoRetriever {
    pub fn new(config: &ProviderConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            client: build_client(config),
            api_url: Url::parse(&config.duckduckgo_url)?,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl From<InstantAnswerResponse> for InstantAnswer {
    fn from(response: InstantAnswerResponse) -> Self {
        Self {
            abstract_text: non_empty(response.abstract_text),
            abstract_source: non_empty(response.abstract_source),
            abstract_url: Url::parse(&response.abstract_url).ok(),
        }
    }
}

#[async_trait]
impl InstantAnswerSearch for DuckDuckGoRetriever {
    async fn search_instant_answer(&self, query: &str) -> Result<InstantAnswer, ProviderError> {
        tracing::debug!(query = %query, "Querying DuckDuckGo instant answer");

        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?;

        // The API answers with a javascript content type, so decode manually
        let body = check_status(response)?.text().await?;
        let parsed: InstantAnswerResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::ParseError(format!("Failed to deserialize instant answer: {}", e))
        })?;

        Ok(parsed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_answer_has_no_abstract() {
        let parsed: InstantAnswerResponse =
            serde_json::from_str(r#"{"Abstract": "", "AbstractURL": "", "RelatedTopics": []}"#)
                .unwrap();
        let answer = InstantAnswer::from(parsed);
        assert!(!answer.has_abstract());
        assert!(answer.abstract_url.is_none());
    }

    #[test]
    fn test_answer_with_abstract() {
        let parsed: InstantAnswerResponse = serde_json::from_str(
            r#"{"Abstract": "Paris is the capital of France.", "AbstractSource": "Wikipedia", "AbstractURL": "https://en.wikipedia.org/wiki/Paris"}"#,
        )
        .unwrap();
        let answer = InstantAnswer::from(parsed);
        assert!(answer.has_abstract());
        assert_eq!(answer.abstract_source.as_deref(), Some("Wikipedia"));
        assert_eq!(
            answer.abstract_url.unwrap().as_str(),
            "https://en.wikipedia.org/wiki/Paris"
        );
    }
}
