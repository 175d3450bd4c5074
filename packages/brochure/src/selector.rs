//! Link selection via the language model.
//!
//! One JSON-object completion decides which seed-page links belong in a
//! brochure. Selection fails open: any request or parse failure is
//! logged and treated as "no relevant links", so the pipeline continues
//! with the seed page alone.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use openai_client::{ChatRequest, Message, OpenAIClient};

use crate::config::BrochureConfig;
use crate::page::PageContent;
use crate::prompts::{link_selection_user_prompt, LINK_SELECTION_SYSTEM_PROMPT};
use crate::types::LinkCandidate;

/// Chooses brochure-relevant sub-pages from a seed page.
#[async_trait]
pub trait Selector: Send + Sync {
    /// Return the candidates judged relevant, in model output order.
    /// Never fails; an empty vector means "use the seed page only".
    async fn select(&self, seed: &PageContent) -> Vec<LinkCandidate>;
}

/// Expected response shape: `{"links": [{"type": ..., "url": ...}]}`.
#[derive(Debug, Default, Deserialize)]
struct SelectionRaw {
    #[serde(default)]
    links: Vec<LinkCandidate>,
}

/// Model-backed link selector.
pub struct LinkSelector {
    client: OpenAIClient,
    model: String,
    timeout: Duration,
    max_links_in_prompt: usize,
}

impl LinkSelector {
    /// Create a selector from the pipeline configuration.
    pub fn new(client: OpenAIClient, config: &BrochureConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            timeout: config.selection_timeout,
            max_links_in_prompt: config.max_links_in_prompt,
        }
    }
}

#[async_trait]
impl Selector for LinkSelector {
    async fn select(&self, seed: &PageContent) -> Vec<LinkCandidate> {
        let request = ChatRequest::new(&self.model)
            .message(Message::system(LINK_SELECTION_SYSTEM_PROMPT))
            .message(Message::user(link_selection_user_prompt(
                seed,
                self.max_links_in_prompt,
            )))
            .json_object()
            .timeout(self.timeout);

        // Single attempt, no retry: a failed selection only costs depth.
        match self.client.chat_completion(request).await {
            Ok(response) => {
                let candidates = parse_selection(&response.content);
                debug!(url = %seed.url, candidates = candidates.len(), "link selection complete");
                candidates
            }
            Err(e) => {
                warn!(url = %seed.url, error = %e, "link selection request failed");
                Vec::new()
            }
        }
    }
}

/// Parse the model's JSON answer; malformed output yields no candidates.
fn parse_selection(raw: &str) -> Vec<LinkCandidate> {
    match serde_json::from_str::<SelectionRaw>(raw) {
        Ok(selection) => selection.links,
        Err(e) => {
            warn!(error = %e, "link selection response was not valid JSON");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        let raw = r#"{"links": [
            {"type": "about page", "url": "https://example.com/about"},
            {"type": "careers page", "url": "https://example.com/careers"}
        ]}"#;

        let candidates = parse_selection(raw);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].label, "about page");
        assert_eq!(candidates[1].url, "https://example.com/careers");
    }

    #[test]
    fn test_parse_selection_preserves_model_order() {
        let raw = r#"{"links": [
            {"type": "z page", "url": "https://example.com/z"},
            {"type": "a page", "url": "https://example.com/a"}
        ]}"#;

        let candidates = parse_selection(raw);
        assert_eq!(candidates[0].label, "z page");
        assert_eq!(candidates[1].label, "a page");
    }

    #[test]
    fn test_parse_selection_malformed_json_fails_open() {
        assert!(parse_selection("not json at all").is_empty());
        assert!(parse_selection(r#"{"links": "oops"}"#).is_empty());
        assert!(parse_selection("").is_empty());
    }

    #[test]
    fn test_parse_selection_missing_links_key() {
        assert!(parse_selection(r#"{"pages": []}"#).is_empty());
        assert!(parse_selection("{}").is_empty());
    }
}
