//! LLM-backed ranker — prompts a completion model for a section order.

use rig::agent::Agent;
use rig::completion::{CompletionModel, Prompt};
use tracing::warn;

use crate::error::RankError;

use super::ranker::{RankRequest, RankResponse, SectionRanker};

/// System preamble for the ranking agent. The model is asked for the exact
/// wire shape so the response parses like any other collaborator's.
pub const RANKER_PREAMBLE: &str = "You are an expert in optimizing landing page content \
for SaaS products. Given a visitor's navigation history, an analysis of successful SaaS \
landing pages, and the available content sections, determine the order of sections most \
likely to lead to a registration or demo booking.\n\n\
Respond with a JSON object of the form \
{\"prioritizedContentSections\": [\"section\", ...]} listing every given section exactly \
once, best first. ONLY output the JSON object.";

/// Ranker backed by a rig-core completion model.
pub struct LlmRanker<M: CompletionModel> {
    agent: Agent<M>,
    model_name: String,
}

impl<M: CompletionModel> LlmRanker<M> {
    pub fn new(agent: Agent<M>, model_name: &str) -> Self {
        Self {
            agent,
            model_name: model_name.to_string(),
        }
    }
}

fn build_prompt(request: &RankRequest) -> String {
    format!(
        "User Navigation History: {history}\n\
         Successful SaaS Landing Pages Analysis: {corpus}\n\
         Content Sections: {sections}\n\n\
         Prioritized Content Sections (in optimal order):",
        history = request.user_navigation_history,
        corpus = request.analysis_corpus,
        sections = request.content_sections.join(", "),
    )
}

#[async_trait::async_trait]
impl<M: CompletionModel> SectionRanker for LlmRanker<M> {
    fn name(&self) -> &str {
        &self.model_name
    }

    async fn rank(&self, request: RankRequest) -> Result<RankResponse, RankError> {
        let prompt = build_prompt(&request);

        let raw = self
            .agent
            .prompt(prompt)
            .await
            .map_err(|e| RankError::RequestFailed {
                backend: self.model_name.clone(),
                reason: e.to_string(),
            })?;

        parse_rank_response(&raw)
    }
}

/// Parse the model's output into a [`RankResponse`], tolerating markdown
/// fences and surrounding prose.
pub(crate) fn parse_rank_response(raw: &str) -> Result<RankResponse, RankError> {
    let json_str = extract_json_object(raw);

    serde_json::from_str(&json_str).map_err(|e| {
        warn!(error = %e, response = raw, "Failed to parse ranker output");
        RankError::InvalidResponse {
            reason: format!("unparseable ranker output: {e}"),
        }
    })
}

/// Extract a JSON object from LLM output that might contain markdown or
/// extra text.
fn extract_json_object(text: &str) -> String {
    let trimmed = text.trim();

    // Already a JSON object
    if trimmed.starts_with('{') {
        return trimmed.to_string();
    }

    // Wrapped in a markdown code block
    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim().to_string();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if inner.starts_with('{') {
                return inner.to_string();
            }
        }
    }

    // Try to find object bounds
    if let Some(start) = trimmed.find('{') {
        if let Some(end) = trimmed.rfind('}') {
            if end > start {
                return trimmed[start..=end].to_string();
            }
        }
    }

    // Give up, return as-is and let the parser report the failure
    trimmed.to_string()
}
