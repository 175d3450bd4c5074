//! Brochure synthesis.
//!
//! Drives the assembler, then streams a completion that renders the
//! corpus into a markdown brochure. The output is a lazy, finite,
//! non-restartable sequence of text chunks; every failure class is
//! reported in-band as a single chunk with a literal `"Error"` prefix,
//! which is the only error channel across this boundary.

use async_stream::stream;
use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::time::Duration;
use tracing::{error, info};

use openai_client::{ChatRequest, Message, OpenAIClient};

use crate::assembler::CorpusAssembler;
use crate::config::BrochureConfig;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::prompts::{brochure_system_prompt, brochure_user_prompt};
use crate::selector::{LinkSelector, Selector};
use crate::types::BrochureRequest;

/// Sampling temperature for brochure synthesis.
const SYNTHESIS_TEMPERATURE: f32 = 0.7;

/// Boxed stream of text deltas from a completion backend.
pub type DeltaStream = Pin<Box<dyn Stream<Item = openai_client::Result<String>> + Send>>;

/// Streaming completion backend.
///
/// The seam between the synthesizer and the model service; tests swap
/// in a deterministic stub.
#[async_trait]
pub trait Completions: Send + Sync {
    /// Start a streaming completion and return its delta stream.
    async fn stream_chat(&self, request: ChatRequest) -> openai_client::Result<DeltaStream>;
}

#[async_trait]
impl Completions for OpenAIClient {
    async fn stream_chat(&self, request: ChatRequest) -> openai_client::Result<DeltaStream> {
        let stream = self.chat_completion_stream(request).await?;
        Ok(Box::pin(stream))
    }
}

/// Synthesizer for the OpenAI-backed production pipeline.
pub type OpenAIBrochureSynthesizer = BrochureSynthesizer<HttpFetcher, LinkSelector, OpenAIClient>;

/// Renders an assembled corpus into a streamed markdown brochure.
pub struct BrochureSynthesizer<F, S, C> {
    assembler: CorpusAssembler<F, S>,
    completions: C,
    model: String,
    timeout: Duration,
}

impl OpenAIBrochureSynthesizer {
    /// Wire up the production pipeline from the configuration.
    pub fn from_config(config: &BrochureConfig) -> Self {
        let client = OpenAIClient::new(config.api_key.clone());
        let selector = LinkSelector::new(client.clone(), config);
        let assembler = CorpusAssembler::new(HttpFetcher::new(), selector, config);
        Self::new(assembler, client, config)
    }
}

impl<F, S, C> BrochureSynthesizer<F, S, C>
where
    F: Fetcher,
    S: Selector,
    C: Completions,
{
    /// Create a synthesizer over an assembler and a completion backend.
    pub fn new(assembler: CorpusAssembler<F, S>, completions: C, config: &BrochureConfig) -> Self {
        Self {
            assembler,
            completions,
            model: config.model.clone(),
            timeout: config.synthesis_timeout,
        }
    }

    /// Generate the brochure as a stream of text chunks.
    ///
    /// If the corpus cannot be assembled, the stream yields that
    /// `"Error:"` string as its only chunk. A completion failure, before
    /// or during streaming, yields one final
    /// `"Error generating brochure: …"` chunk; chunks already yielded
    /// are not retracted.
    pub fn stream_brochure<'a>(
        &'a self,
        request: &'a BrochureRequest,
    ) -> impl Stream<Item = String> + 'a {
        stream! {
            let corpus = self.assembler.assemble(&request.seed_url).await;
            if corpus.starts_with("Error:") {
                yield corpus;
                return;
            }

            info!(
                company = %request.company_name,
                corpus_chars = corpus.chars().count(),
                "starting brochure synthesis"
            );

            let chat = ChatRequest::new(&self.model)
                .message(Message::system(brochure_system_prompt(
                    &request.language,
                    request.tone,
                )))
                .message(Message::user(brochure_user_prompt(
                    &request.company_name,
                    &corpus,
                )))
                .temperature(SYNTHESIS_TEMPERATURE)
                .timeout(self.timeout);

            let mut deltas = match self.completions.stream_chat(chat).await {
                Ok(deltas) => deltas,
                Err(e) => {
                    error!(error = %e, "brochure completion request failed");
                    yield format!("Error generating brochure: {}", e);
                    return;
                }
            };

            while let Some(item) = deltas.next().await {
                match item {
                    Ok(delta) => {
                        if !delta.is_empty() {
                            yield delta;
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "brochure stream failed mid-flight");
                        yield format!("Error generating brochure: {}", e);
                        return;
                    }
                }
            }
        }
    }
}
