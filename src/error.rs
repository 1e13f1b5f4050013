//! Error taxonomy for a single prompt invocation.

use thiserror::Error;

/// Every way a prompt invocation can fail.
///
/// Only [`GeminiError::Transport`] and [`GeminiError::Api`] are transient;
/// the retry controller propagates everything else on the first occurrence.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// The composed prompt was blank after trimming.
    #[error("Prompt is empty.")]
    EmptyPrompt,

    /// The estimated token count exceeds the configured ceiling.
    #[error("Prompt too long: estimated {estimated} tokens > {limit} limit.")]
    PromptTooLarge { estimated: usize, limit: usize },

    /// No credential was found at startup.
    #[error("Please set the GEMINI_API_KEY environment variable.")]
    AuthMissing,

    /// Timeout, DNS failure, connection reset and friends.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// A success response without `candidates[0].content.parts`.
    #[error("Unexpected response structure")]
    MalformedResponse,

    /// The user pressed Ctrl+C while the request was in flight.
    #[error("Interrupted by user.")]
    Interrupted,

    /// Writing the answer to the terminal failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl GeminiError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, GeminiError::Transport(_) | GeminiError::Api { .. })
    }
}
