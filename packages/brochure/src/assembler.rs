//! Corpus assembly.
//!
//! Drives the fetcher and the selector across the seed page and its
//! chosen sub-pages, concatenates the renderings, and truncates the
//! result to the character budget. One bad link never sinks the whole
//! brochure; only an unreachable seed page aborts assembly.

use std::time::Duration;
use tracing::{info, warn};

use crate::config::BrochureConfig;
use crate::fetcher::Fetcher;
use crate::selector::Selector;

/// Assembles the bounded text corpus for one brochure request.
pub struct CorpusAssembler<F, S> {
    fetcher: F,
    selector: S,
    page_timeout: Duration,
    link_delay: Duration,
    max_links: usize,
    corpus_cap: usize,
}

impl<F: Fetcher, S: Selector> CorpusAssembler<F, S> {
    /// Create an assembler from the pipeline configuration.
    pub fn new(fetcher: F, selector: S, config: &BrochureConfig) -> Self {
        Self {
            fetcher,
            selector,
            page_timeout: config.page_timeout,
            link_delay: config.link_delay,
            max_links: config.max_links,
            corpus_cap: config.corpus_cap,
        }
    }

    /// Assemble the corpus for `seed_url`.
    ///
    /// Returns the corpus text, or a string prefixed `"Error:"` when the
    /// seed page itself cannot be fetched. Sub-link failures are logged
    /// and skipped.
    pub async fn assemble(&self, seed_url: &str) -> String {
        let seed = self.fetcher.fetch(seed_url, self.page_timeout).await;
        if let Some(reason) = &seed.error {
            warn!(url = %seed_url, reason = %reason, "seed page fetch failed, aborting assembly");
            return format!("Error: Could not access {}. {}", seed_url, reason);
        }

        let mut corpus = String::from("Landing page:\n");
        corpus.push_str(&seed.get_contents());

        let candidates = self.selector.select(&seed).await;
        info!(url = %seed_url, candidates = candidates.len(), "assembling corpus");

        for candidate in candidates.iter().take(self.max_links) {
            let page = self.fetcher.fetch(&candidate.url, self.page_timeout).await;
            if page.is_valid() {
                corpus.push_str("\n\n");
                corpus.push_str(&candidate.label);
                corpus.push_str(":\n");
                corpus.push_str(&page.get_contents());
            } else {
                warn!(url = %candidate.url, "skipping unreachable link");
            }

            // Politeness toward the target site; runs after every
            // attempt, succeeded or failed.
            if !self.link_delay.is_zero() {
                tokio::time::sleep(self.link_delay).await;
            }
        }

        truncate_chars(corpus, self.corpus_cap)
    }
}

/// Truncate to the first `max_chars` characters. The cap is a character
/// count, not a byte count, so a multibyte corpus is never split inside
/// a character.
fn truncate_chars(mut s: String, max_chars: usize) -> String {
    if let Some((idx, _)) = s.char_indices().nth(max_chars) {
        s.truncate(idx);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_short_string_untouched() {
        assert_eq!(truncate_chars("hello".to_string(), 10), "hello");
        assert_eq!(truncate_chars("hello".to_string(), 5), "hello");
    }

    #[test]
    fn test_truncate_chars_counts_characters_not_bytes() {
        // Four 3-byte characters
        assert_eq!(truncate_chars("日本語文".to_string(), 2), "日本");
    }

    #[test]
    fn test_truncate_chars_ascii() {
        let long = "a".repeat(30_000);
        assert_eq!(truncate_chars(long, 25_000).len(), 25_000);
    }
}
