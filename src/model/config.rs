use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

const ENV_CONFIG_PATH: &str = "VERIFACT_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const ENV_HUGGING_FACE_API_KEY: &str = "HUGGING_FACE_API_KEY";

const DEFAULT_PACING_DELAY_MS: u64 = 500;
const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CLAIMS: usize = 3;
const DEFAULT_MAX_FRAMES: usize = 10;
const DEFAULT_FALLBACK_CLAIM_CHARS: usize = 200;

const DEFAULT_USER_AGENT: &str = "verifact/1.0";
const DEFAULT_WIKIPEDIA_URL: &str = "https://en.wikipedia.org/w/api.php";
const DEFAULT_DUCKDUCKGO_URL: &str = "https://api.duckduckgo.com/";
const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const DEFAULT_WIKIDATA_URL: &str = "https://www.wikidata.org/w/api.php";
const DEFAULT_TEXT_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/roberta-base-openai-detector";
const DEFAULT_IMAGE_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/umm-maybe/AI-image-detector";

/// Endpoints of the reference providers
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub user_agent: String,
    pub wikipedia_url: String,
    pub duckduckgo_url: String,
    pub nominatim_url: String,
    pub wikidata_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            wikipedia_url: DEFAULT_WIKIPEDIA_URL.to_string(),
            duckduckgo_url: DEFAULT_DUCKDUCKGO_URL.to_string(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            wikidata_url: DEFAULT_WIKIDATA_URL.to_string(),
        }
    }
}

/// Generation-likelihood oracle settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub text_model_url: String,
    pub image_model_url: String,
    pub timeout_secs: u64,
    /// Never read from the config file, only from `HUGGING_FACE_API_KEY`
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            text_model_url: DEFAULT_TEXT_MODEL_URL.to_string(),
            image_model_url: DEFAULT_IMAGE_MODEL_URL.to_string(),
            timeout_secs: DEFAULT_ORACLE_TIMEOUT_SECS,
            api_key: None,
        }
    }
}

impl OracleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Work bounds and pacing for a single verification request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Delay inserted after every external call
    pub pacing_delay_ms: u64,
    /// Claims probed per request
    pub max_claims: usize,
    /// Video frames analyzed per request
    pub max_frames: usize,
    /// Length of the synthetic claim used when extraction finds nothing
    pub fallback_claim_chars: usize,
    pub providers: ProviderConfig,
    pub oracle: OracleConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pacing_delay_ms: DEFAULT_PACING_DELAY_MS,
            max_claims: DEFAULT_MAX_CLAIMS,
            max_frames: DEFAULT_MAX_FRAMES,
            fallback_claim_chars: DEFAULT_FALLBACK_CLAIM_CHARS,
            providers: ProviderConfig::default(),
            oracle: OracleConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = Self::load_config_file(&config_path).unwrap_or_default();
        config.oracle.api_key = std::env::var(ENV_HUGGING_FACE_API_KEY)
            .ok()
            .filter(|key| !key.trim().is_empty());

        config.normalized()
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<Self> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents, path),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    fn parse(contents: &str, path: &Path) -> Option<Self> {
        let contents = contents.trim();
        if contents.is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Some(Self::default());
        }

        match serde_yaml::from_str(contents) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Loaded configuration from file");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                None
            }
        }
    }

    /// Replace values that would disable throttling or bounding
    fn normalized(mut self) -> Self {
        if self.pacing_delay_ms == 0 {
            tracing::warn!(
                default_ms = DEFAULT_PACING_DELAY_MS,
                "pacing_delay_ms of 0 would disable rate limiting, using default"
            );
            self.pacing_delay_ms = DEFAULT_PACING_DELAY_MS;
        }
        if self.max_claims == 0 {
            self.max_claims = DEFAULT_MAX_CLAIMS;
        }
        if self.max_frames == 0 {
            self.max_frames = DEFAULT_MAX_FRAMES;
        }
        if self.fallback_claim_chars == 0 {
            self.fallback_claim_chars = DEFAULT_FALLBACK_CLAIM_CHARS;
        }
        if self.oracle.timeout_secs == 0 {
            self.oracle.timeout_secs = DEFAULT_ORACLE_TIMEOUT_SECS;
        }
        self
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.pacing_delay(), Duration::from_millis(500));
        assert_eq!(config.max_claims, 3);
        assert_eq!(config.max_frames, 10);
        assert_eq!(config.fallback_claim_chars, 200);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pacing_delay_ms: 1200\nproviders:\n  user_agent: test-agent/2.0").unwrap();

        let config = PipelineConfig::load_config_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.pacing_delay_ms, 1200);
        assert_eq!(config.providers.user_agent, "test-agent/2.0");
        assert_eq!(config.providers.wikipedia_url, DEFAULT_WIKIPEDIA_URL);
        assert_eq!(config.max_claims, 3);
    }

    #[test]
    fn test_empty_and_invalid_files() {
        let path = Path::new("config.yaml");
        assert!(PipelineConfig::parse("   \n", path).is_some());
        assert!(PipelineConfig::parse("max_claims: [not, a, number]", path).is_none());
        assert!(PipelineConfig::load_config_file("/nonexistent/verifact.yaml").is_none());
    }

    #[test]
    fn test_zero_pacing_is_rejected() {
        let config = PipelineConfig {
            pacing_delay_ms: 0,
            max_claims: 0,
            ..PipelineConfig::default()
        }
        .normalized();
        assert_eq!(config.pacing_delay_ms, 500);
        assert_eq!(config.max_claims, 3);
    }

    #[test]
    fn test_zero_fallback_claim_length_uses_default() {
        let yaml = "fallback_claim_chars: 0\nmax_frames: 0";
        let config = PipelineConfig::parse(yaml, Path::new("config.yaml"))
            .unwrap()
            .normalized();
        assert_eq!(config.fallback_claim_chars, 200);
        assert_eq!(config.max_frames, 10);
    }
}
