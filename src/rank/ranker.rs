//! Ranking collaborator boundary — trait and wire types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RankError;

/// Request payload for the ranking collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    /// The visitor's navigation history, entries joined in arrival order.
    pub user_navigation_history: String,
    /// Static corpus describing effective patterns for this class of page.
    pub analysis_corpus: String,
    /// Every registry key, in declaration order.
    pub content_sections: Vec<String>,
}

/// Response payload from the ranking collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankResponse {
    /// Proposed section order, expected to be a permutation of the request's
    /// `content_sections`.
    pub prioritized_content_sections: Vec<String>,
}

/// A collaborator that proposes a section order from navigation history.
///
/// Implementations surface transport and schema problems as [`RankError`];
/// structural validation of the proposed order happens at the call site.
#[async_trait]
pub trait SectionRanker: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Propose a section order.
    async fn rank(&self, request: RankRequest) -> Result<RankResponse, RankError>;
}
