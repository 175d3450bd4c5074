//! AI marketing brochure generation from a company website.
//!
//! A sequential two-stage pipeline: scrape a seed page, let a language
//! model pick the brochure-relevant sub-pages, scrape those into a
//! bounded corpus, then stream a completion that renders the corpus as
//! a structured markdown brochure. A separate exporter turns the final
//! markdown into a paginated PDF on demand.
//!
//! # Example
//!
//! ```rust,ignore
//! use brochure::{BrochureConfig, BrochureRequest, OpenAIBrochureSynthesizer, Tone};
//! use futures::StreamExt;
//!
//! let config = BrochureConfig::from_env()?;
//! let synthesizer = OpenAIBrochureSynthesizer::from_config(&config);
//!
//! let request = BrochureRequest::new("Acme Inc.", "https://www.acme.com")
//!     .with_tone(Tone::Friendly);
//!
//! let stream = synthesizer.stream_brochure(&request);
//! futures::pin_mut!(stream);
//! while let Some(chunk) = stream.next().await {
//!     print!("{chunk}");
//! }
//! ```

pub mod assembler;
pub mod config;
pub mod error;
pub mod exporter;
pub mod fetcher;
pub mod page;
pub mod prompts;
pub mod selector;
pub mod synthesizer;
pub mod testing;
pub mod types;

pub use assembler::CorpusAssembler;
pub use config::{validate_api_key, BrochureConfig};
pub use error::{BrochureError, ExportError, Result};
pub use exporter::export_pdf;
pub use fetcher::{Fetcher, HttpFetcher};
pub use page::PageContent;
pub use selector::{LinkSelector, Selector};
pub use synthesizer::{BrochureSynthesizer, Completions, OpenAIBrochureSynthesizer};
pub use types::{BrochureRequest, LinkCandidate, Tone, LANGUAGES};
