//! Error types for the OpenAI client.

use thiserror::Error;

/// Result type for OpenAI client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// OpenAI client errors.
///
/// Both call shapes share this taxonomy; for the streaming call,
/// `Network` and `Parse` can also surface mid-stream as an item of the
/// delta stream, after the request itself succeeded.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// `OPENAI_API_KEY` unset or without the `sk-` prefix; raised by
    /// `from_env` before any request is issued
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP request failed in transit: connection refused, the
    /// per-request timeout elapsed, or the stream connection dropped
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-2xx status (bad key, rate limit,
    /// unknown model) or with no choices
    #[error("API error: {0}")]
    Api(String),

    /// A response body or SSE chunk that should be JSON was not
    #[error("Parse error: {0}")]
    Parse(String),
}
