//! One prompt, start to finish.
//!
//! Estimate the prompt, optionally start the spinner, run the (retrying)
//! generator, stop and join the spinner, then format and print the answer.
//! The spinner is always joined before anything is printed or returned,
//! including on failure and interruption.

use crate::display::{Formatter, ProgressSession};
use crate::error::GeminiError;
use crate::llm::Generator;
use crate::prompt;
use crate::protocol::ResponseDocument;
use std::future::Future;
use std::io::Write;
use tracing::debug;

/// Printed when the model returns nothing but whitespace.
pub const NO_RESPONSE: &str = "[INFO] No response.";

/// Where an invocation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Estimating,
    ShowingProgress,
    Requesting,
    Formatting,
    Done,
    Failed,
}

fn enter(phase: Phase) {
    debug!("phase: {:?}", phase);
}

/// Per-invocation settings.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Token ceiling for the pre-flight estimate.
    pub max_tokens: usize,
    pub formatter: Formatter,
}

/// Run one prompt through `generator` and print the answer to `out`.
///
/// When `progress` is `Some`, a spinner draws to it for the duration of the
/// request. `interrupt` completing while the request is in flight aborts it
/// with [`GeminiError::Interrupted`].
pub async fn run<G, P, I, W>(
    generator: &G,
    prompt: &str,
    options: &RunOptions,
    progress: Option<P>,
    interrupt: I,
    out: &mut W,
) -> Result<(), GeminiError>
where
    G: Generator + ?Sized,
    P: Write + Send + 'static,
    I: Future<Output = ()>,
    W: Write,
{
    enter(Phase::Idle);
    let result = execute(generator, prompt, options, progress, interrupt, out).await;
    match &result {
        Ok(()) => enter(Phase::Done),
        Err(e) => {
            enter(Phase::Failed);
            debug!("invocation failed: {}", e);
        }
    }
    result
}

async fn execute<G, P, I, W>(
    generator: &G,
    prompt: &str,
    options: &RunOptions,
    progress: Option<P>,
    interrupt: I,
    out: &mut W,
) -> Result<(), GeminiError>
where
    G: Generator + ?Sized,
    P: Write + Send + 'static,
    I: Future<Output = ()>,
    W: Write,
{
    enter(Phase::Estimating);
    let prompt = prompt::estimate_and_check(prompt, options.max_tokens)?;

    let document = request(generator, prompt, progress, interrupt).await?;

    enter(Phase::Formatting);
    let text = document.text();
    let text = text.trim();
    if text.is_empty() {
        writeln!(out, "{}", NO_RESPONSE)?;
    } else {
        writeln!(out, "{}", options.formatter.format(text))?;
    }
    out.flush()?;
    Ok(())
}

/// The request itself, bracketed by the spinner.
async fn request<G, P, I>(
    generator: &G,
    prompt: &str,
    progress: Option<P>,
    interrupt: I,
) -> Result<ResponseDocument, GeminiError>
where
    G: Generator + ?Sized,
    P: Write + Send + 'static,
    I: Future<Output = ()>,
{
    let session = progress.map(|out| {
        enter(Phase::ShowingProgress);
        ProgressSession::start(out)
    });

    enter(Phase::Requesting);
    let outcome = tokio::select! {
        result = generator.generate(prompt) => result,
        _ = interrupt => Err(GeminiError::Interrupted),
    };

    if let Some(session) = session {
        session.stop().await;
    }
    outcome
}
