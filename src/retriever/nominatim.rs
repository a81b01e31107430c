//! OpenStreetMap Nominatim place search

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{GazetteerSearch, Place, ProviderError, build_client, check_status};
use crate::model::ProviderConfig;

const MAX_PLACES: &str = "3";

#[derive(Debug, Deserialize)]
struct PlaceEntry {
    display_name: String,
    lat: String,
    lon: String,
    #[serde(rename = "type")]
    place_type: Option<String>,
    importance: Option<f64>,
}

/// Gazetteer lookups. Nominatim requires an identifying User-Agent.
pub struct NominatimRetriever {
    client: Client,
    api_url: Url,
}

impl NominatimRetriever {
    pub fn new(config: &ProviderConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            client: build_client(config),
            api_url: Url::parse(&config.nominatim_url)?,
        })
    }
}

#[async_trait]
impl GazetteerSearch for NominatimRetriever {
    async fn search_gazetteer(&self, place_name: &str) -> Result<Vec<Place>, ProviderError> {
        tracing::debug!(place = %place_name, "Searching Nominatim");

        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[("q", place_name), ("format", "json"), ("limit", MAX_PLACES)])
            .send()
            .await?;

        let entries: Vec<PlaceEntry> = check_status(response)?.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to deserialize Nominatim results: {}", e))
        })?;

        Ok(entries
            .into_iter()
            .map(|e| Place {
                display_name: e.display_name,
                lat: e.lat,
                lon: e.lon,
                place_type: e.place_type,
                importance: e.importance,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_place_entries() {
        let entries: Vec<PlaceEntry> = serde_json::from_str(
            r#"[{"display_name": "Paris, Île-de-France, France", "lat": "48.85", "lon": "2.35", "type": "city", "importance": 0.9}]"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].place_type.as_deref(), Some("city"));
    }
}
