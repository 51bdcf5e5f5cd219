//! Ranking collaborator integration.
//!
//! Supports:
//! - **Anthropic** / **OpenAI**: completion models via rig-core, prompted
//!   for the collaborator's JSON wire shape
//! - **HTTP**: an external ranking service speaking the same shape
//!
//! All backends sit behind the [`SectionRanker`] trait; `create_ranker`
//! picks one from configuration.

pub mod http;
pub mod llm;
pub mod ranker;

pub use http::HttpRanker;
pub use llm::LlmRanker;
pub use ranker::{RankRequest, RankResponse, SectionRanker};

use std::sync::Arc;
use std::time::Duration;

use rig::client::CompletionClient;
use secrecy::ExposeSecret;

use crate::error::RankError;

/// Supported ranking backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankerBackend {
    Anthropic,
    OpenAi,
    Http,
}

/// Configuration for creating a ranker.
#[derive(Debug, Clone)]
pub struct RankerConfig {
    pub backend: RankerBackend,
    /// API key for the LLM backends; unused for HTTP.
    pub api_key: secrecy::SecretString,
    /// Model name for the LLM backends.
    pub model: String,
    /// Ranking-service URL for the HTTP backend.
    pub endpoint: Option<String>,
    /// Per-request timeout for the HTTP backend.
    pub timeout: Duration,
}

/// Create a ranker from configuration.
pub fn create_ranker(config: &RankerConfig) -> Result<Arc<dyn SectionRanker>, RankError> {
    match config.backend {
        RankerBackend::Anthropic => create_anthropic_ranker(config),
        RankerBackend::OpenAi => create_openai_ranker(config),
        RankerBackend::Http => {
            let endpoint = config.endpoint.clone().ok_or_else(|| RankError::RequestFailed {
                backend: "http".to_string(),
                reason: "no ranking service endpoint configured".to_string(),
            })?;
            tracing::info!(endpoint = %endpoint, "Using HTTP ranking service");
            Ok(Arc::new(HttpRanker::new(endpoint, config.timeout)))
        }
    }
}

fn create_anthropic_ranker(config: &RankerConfig) -> Result<Arc<dyn SectionRanker>, RankError> {
    use rig::providers::anthropic;

    let client: rig::client::Client<anthropic::client::AnthropicExt> =
        anthropic::Client::new(config.api_key.expose_secret()).map_err(|e| {
            RankError::RequestFailed {
                backend: "anthropic".to_string(),
                reason: format!("Failed to create Anthropic client: {}", e),
            }
        })?;

    let agent = client
        .agent(&config.model)
        .preamble(llm::RANKER_PREAMBLE)
        .build();
    tracing::info!("Using Anthropic ranker (model: {})", config.model);
    Ok(Arc::new(LlmRanker::new(agent, &config.model)))
}

fn create_openai_ranker(config: &RankerConfig) -> Result<Arc<dyn SectionRanker>, RankError> {
    use rig::providers::openai;

    let client: rig::client::Client<openai::client::OpenAIResponsesExt> =
        openai::Client::new(config.api_key.expose_secret()).map_err(|e| {
            RankError::RequestFailed {
                backend: "openai".to_string(),
                reason: format!("Failed to create OpenAI client: {}", e),
            }
        })?;

    let agent = client
        .agent(&config.model)
        .preamble(llm::RANKER_PREAMBLE)
        .build();
    tracing::info!("Using OpenAI ranker (model: {})", config.model);
    Ok(Arc::new(LlmRanker::new(agent, &config.model)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_anthropic_ranker_constructs() {
        // rig-core clients accept any string as API key at construction
        // time; the auth failure happens on the first request.
        let config = RankerConfig {
            backend: RankerBackend::Anthropic,
            api_key: secrecy::SecretString::from("test-key"),
            model: "claude-3-5-sonnet-latest".to_string(),
            endpoint: None,
            timeout: Duration::from_secs(15),
        };
        let ranker = create_ranker(&config);
        assert!(ranker.is_ok());
        assert_eq!(ranker.unwrap().name(), "claude-3-5-sonnet-latest");
    }

    #[test]
    fn create_http_ranker_requires_endpoint() {
        let config = RankerConfig {
            backend: RankerBackend::Http,
            api_key: secrecy::SecretString::from(""),
            model: String::new(),
            endpoint: None,
            timeout: Duration::from_secs(15),
        };
        assert!(create_ranker(&config).is_err());
    }

    #[test]
    fn create_http_ranker_with_endpoint() {
        let config = RankerConfig {
            backend: RankerBackend::Http,
            api_key: secrecy::SecretString::from(""),
            model: String::new(),
            endpoint: Some("http://localhost:9000/rank".to_string()),
            timeout: Duration::from_secs(15),
        };
        let ranker = create_ranker(&config).unwrap();
        assert_eq!(ranker.name(), "http");
    }
}
