//! HTTP ranker — JSON POST to an external ranking service.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::RankError;

use super::ranker::{RankRequest, RankResponse, SectionRanker};

/// Ranker that delegates to a ranking service over HTTP. The service
/// accepts the [`RankRequest`] wire shape and answers with
/// [`RankResponse`].
pub struct HttpRanker {
    endpoint: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpRanker {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl SectionRanker for HttpRanker {
    fn name(&self) -> &str {
        "http"
    }

    async fn rank(&self, request: RankRequest) -> Result<RankResponse, RankError> {
        debug!(endpoint = %self.endpoint, "Sending ranking request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RankError::Timeout {
                        timeout: self.timeout,
                    }
                } else {
                    RankError::RequestFailed {
                        backend: "http".into(),
                        reason: e.to_string(),
                    }
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RankError::RequestFailed {
                backend: "http".into(),
                reason: format!("status {status}: {body}"),
            });
        }

        response
            .json::<RankResponse>()
            .await
            .map_err(|e| RankError::InvalidResponse {
                reason: e.to_string(),
            })
    }
}
