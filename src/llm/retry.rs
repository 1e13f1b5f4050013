//! Bounded fixed-delay retry.
//!
//! No backoff, no jitter: `max_attempts` tries separated by `delay`. Failures
//! the predicate rejects propagate immediately; after the last attempt the
//! final error propagates unchanged.

use super::Generator;
use crate::error::GeminiError;
use crate::protocol::ResponseDocument;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// A policy of `max_attempts` total tries. Zero is treated as one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

/// Run `op` under `policy`, retrying while `should_retry` accepts the error.
pub async fn retry<T, E, F, Fut, P>(policy: RetryPolicy, should_retry: P, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_attempts && should_retry(&e) => {
                warn!(
                    "Attempt {}/{} failed: {}; retrying in {:?}",
                    attempt, policy.max_attempts, e, policy.delay
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Decorates a [`Generator`] with a retry policy over transient failures.
pub struct RetryingGenerator<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G: Generator> RetryingGenerator<G> {
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<G: Generator> Generator for RetryingGenerator<G> {
    async fn generate(&self, prompt: &str) -> Result<ResponseDocument, GeminiError> {
        let inner = &self.inner;
        retry(self.policy, GeminiError::is_transient, move || {
            inner.generate(prompt)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Replays scripted outcomes and records when each call happened.
    struct Scripted {
        outcomes: Mutex<VecDeque<Result<ResponseDocument, GeminiError>>>,
        calls: Mutex<Vec<Instant>>,
    }

    impl Scripted {
        fn new(outcomes: Vec<Result<ResponseDocument, GeminiError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Generator for Scripted {
        async fn generate(&self, _prompt: &str) -> Result<ResponseDocument, GeminiError> {
            self.calls.lock().unwrap().push(Instant::now());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("more calls than scripted outcomes")
        }
    }

    fn api_error(status: u16) -> GeminiError {
        GeminiError::Api {
            status,
            body: "unavailable".to_string(),
        }
    }

    fn doc(text: &str) -> ResponseDocument {
        ResponseDocument::new(vec![text.to_string()])
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt() {
        let scripted = Scripted::new(vec![Err(api_error(503)), Err(api_error(500)), Ok(doc("ok"))]);
        let retrying = RetryingGenerator::new(&scripted, RetryPolicy::default());

        let result = retrying.generate("prompt").await.unwrap();
        assert_eq!(result.text(), "ok");

        let times = scripted.call_times();
        assert_eq!(times.len(), 3);
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_secs(2));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_transient_error_propagates_unchanged() {
        let scripted = Scripted::new(vec![Err(api_error(500)), Err(api_error(502)), Err(api_error(404))]);
        let retrying = RetryingGenerator::new(&scripted, RetryPolicy::default());

        match retrying.generate("prompt").await {
            Err(GeminiError::Api { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected last Api error, got {:?}", other),
        }
        assert_eq!(scripted.call_times().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_errors_are_not_retried() {
        for fatal in [GeminiError::AuthMissing, GeminiError::MalformedResponse] {
            let scripted = Scripted::new(vec![Err(fatal)]);
            let retrying = RetryingGenerator::new(&scripted, RetryPolicy::default());

            let err = retrying.generate("prompt").await.unwrap_err();
            assert!(!err.is_transient());
            assert_eq!(scripted.call_times().len(), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_policy() {
        let scripted = Scripted::new(vec![Err(api_error(500)), Ok(doc("fine"))]);
        let policy = RetryPolicy::new(2, Duration::from_millis(250));
        let retrying = RetryingGenerator::new(&scripted, policy);

        assert_eq!(retrying.generate("p").await.unwrap().text(), "fine");
        let times = scripted.call_times();
        assert!(times[1] - times[0] >= Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_zero_attempts_means_one() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts, 1);

        let mut calls = 0;
        let result: Result<(), String> = retry(policy, |_| true, || {
            calls += 1;
            async { Err("boom".to_string()) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
