//! Testing doubles for the pipeline seams.
//!
//! Deterministic fetcher, selector, and completion backends so the
//! assembler and synthesizer can be exercised without the network or a
//! live model. Each double records its calls for assertions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use openai_client::{ChatRequest, OpenAIError};

use crate::fetcher::Fetcher;
use crate::page::PageContent;
use crate::selector::Selector;
use crate::synthesizer::{Completions, DeltaStream};
use crate::types::LinkCandidate;

/// Fetcher that serves pre-scripted pages by URL.
///
/// URLs without a scripted response come back as failed pages, which
/// exercises the assembler's skip path.
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, PageContent>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a page, parsed from HTML as the real fetcher would.
    pub fn with_page(mut self, url: impl Into<String>, html: &str) -> Self {
        let url = url.into();
        self.pages.insert(url.clone(), PageContent::from_html(&url, html));
        self
    }

    /// Script a failed fetch.
    pub fn with_failure(mut self, url: impl Into<String>, reason: impl Into<String>) -> Self {
        let url = url.into();
        self.pages
            .insert(url.clone(), PageContent::failed(&url, reason));
        self
    }

    /// URLs fetched so far, in call order.
    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    /// Shared handle to the fetch log, for asserting after the fetcher
    /// has been moved into an assembler.
    pub fn fetch_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.fetched)
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> PageContent {
        self.fetched.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| PageContent::failed(url, "no scripted response"))
    }
}

/// Selector that returns a fixed candidate list.
#[derive(Default)]
pub struct ScriptedSelector {
    candidates: Vec<LinkCandidate>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSelector {
    pub fn new(candidates: Vec<LinkCandidate>) -> Self {
        Self {
            candidates,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Selector that never finds a relevant link.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// How many times `select` was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shared handle to the call counter, for asserting after the
    /// selector has been moved into an assembler.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Selector for ScriptedSelector {
    async fn select(&self, _seed: &PageContent) -> Vec<LinkCandidate> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.candidates.clone()
    }
}

/// Completion backend that replays a fixed chunk script.
#[derive(Default)]
pub struct StubCompletions {
    chunks: Vec<String>,
    request_error: Option<String>,
    mid_stream_error: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl StubCompletions {
    /// Stream the given chunks, then end cleanly.
    pub fn with_chunks(chunks: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            chunks: chunks.into_iter().map(|c| c.into()).collect(),
            ..Default::default()
        }
    }

    /// Fail before any chunk is produced.
    pub fn failing_request(message: impl Into<String>) -> Self {
        Self {
            request_error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Fail mid-stream, after the scripted chunks.
    pub fn with_mid_stream_error(mut self, message: impl Into<String>) -> Self {
        self.mid_stream_error = Some(message.into());
        self
    }

    /// How many times `stream_chat` was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shared handle to the call counter.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Completions for StubCompletions {
    async fn stream_chat(&self, _request: ChatRequest) -> openai_client::Result<DeltaStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.request_error {
            return Err(OpenAIError::Api(message.clone()));
        }

        let mut items: Vec<openai_client::Result<String>> =
            self.chunks.iter().cloned().map(Ok).collect();
        if let Some(message) = &self.mid_stream_error {
            items.push(Err(OpenAIError::Network(message.clone())));
        }

        Ok(Box::pin(futures::stream::iter(items)))
    }
}
