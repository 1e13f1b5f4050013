//! Text generation backends.
//!
//! [`Generator`] is the seam between the orchestrator and the network: the
//! Gemini client implements it, [`retry::RetryingGenerator`] decorates it, and
//! tests substitute scripted mocks.

pub mod gemini;
pub mod retry;

use crate::error::GeminiError;
use crate::protocol::ResponseDocument;
use async_trait::async_trait;

/// Something that turns a prompt into a response document.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Perform one generation. Implementations backed by the network make
    /// exactly one round trip per call.
    async fn generate(&self, prompt: &str) -> Result<ResponseDocument, GeminiError>;
}

#[async_trait]
impl<T: Generator + ?Sized> Generator for &T {
    async fn generate(&self, prompt: &str) -> Result<ResponseDocument, GeminiError> {
        (**self).generate(prompt).await
    }
}
