//! Hugging Face inference API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{GenerationOracle, OracleError, OracleLabel, OracleOutput};
use crate::model::OracleConfig;

/// Text models wrap their scores in an extra list, image models do not
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<OracleLabel>>),
    Flat(Vec<OracleLabel>),
}

impl InferenceResponse {
    fn into_labels(self) -> Vec<OracleLabel> {
        match self {
            Self::Nested(mut outer) => {
                if outer.is_empty() {
                    vec![]
                } else {
                    outer.swap_remove(0)
                }
            }
            Self::Flat(labels) => labels,
        }
    }
}

/// Oracle backed by hosted text and image detector models
pub struct HuggingFaceOracle {
    client: Client,
    api_key: Option<String>,
    text_model_url: String,
    image_model_url: String,
}

impl HuggingFaceOracle {
    pub fn new(config: &OracleConfig) -> Self {
        if config.api_key.is_none() {
            tracing::warn!("Hugging Face API key not found, generation detection will use fallbacks");
        }

        Self {
            client: Client::builder()
                .timeout(config.timeout())
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key: config.api_key.clone(),
            text_model_url: config.text_model_url.clone(),
            image_model_url: config.image_model_url.clone(),
        }
    }

    fn api_key(&self) -> Result<&str, OracleError> {
        self.api_key.as_deref().ok_or(OracleError::NotConfigured)
    }

    async fn classify(
        &self,
        request: reqwest::RequestBuilder,
        model_url: &str,
    ) -> Result<OracleOutput, OracleError> {
        let response = request.bearer_auth(self.api_key()?).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::debug!(status = %status, model = %model_url, "Oracle returned error status");
            return Err(OracleError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: InferenceResponse = serde_json::from_str(&body)
            .map_err(|e| OracleError::Malformed(format!("{}: {}", e, truncate(&body, 200))))?;

        let labels = parsed.into_labels();
        if labels.is_empty() {
            return Err(OracleError::Malformed("empty label list".to_string()));
        }

        Ok(OracleOutput {
            model: model_name(model_url),
            labels,
        })
    }
}

#[async_trait]
impl GenerationOracle for HuggingFaceOracle {
    async fn text_probability(&self, text: &str) -> Result<OracleOutput, OracleError> {
        tracing::debug!(chars = text.len(), "Scoring text with generation oracle");

        let request = self
            .client
            .post(&self.text_model_url)
            .json(&serde_json::json!({ "inputs": text }));

        self.classify(request, &self.text_model_url).await
    }

    async fn image_probability(&self, image: &[u8]) -> Result<OracleOutput, OracleError> {
        tracing::debug!(bytes = image.len(), "Scoring image with generation oracle");

        let request = self
            .client
            .post(&self.image_model_url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec());

        self.classify(request, &self.image_model_url).await
    }
}

/// Model id from an inference URL, e.g. `umm-maybe/AI-image-detector`
fn model_name(model_url: &str) -> String {
    model_url
        .split_once("/models/")
        .map(|(_, model)| model.trim_end_matches('/').to_string())
        .unwrap_or_else(|| model_url.to_string())
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
