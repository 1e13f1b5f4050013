//! Prompt composition and the pre-flight token estimate.

use crate::error::GeminiError;

/// Empirical tokens-per-word factor. An approximation, not a tokenizer.
const TOKENS_PER_WORD: f64 = 1.33;

/// Join piped input and the argument prompt, separated by a blank line.
pub fn compose(stdin: Option<&str>, prompt: &str) -> String {
    let prompt = prompt.trim();
    match stdin.map(str::trim).filter(|s| !s.is_empty()) {
        Some(piped) => format!("{}\n\n{}", piped, prompt),
        None => prompt.to_string(),
    }
}

/// Whitespace-delimited word count scaled by [`TOKENS_PER_WORD`], truncated.
pub fn estimate_tokens(prompt: &str) -> usize {
    (prompt.split_whitespace().count() as f64 * TOKENS_PER_WORD) as usize
}

/// Reject blank prompts and prompts whose estimate exceeds `limit`.
pub fn estimate_and_check(prompt: &str, limit: usize) -> Result<&str, GeminiError> {
    if prompt.trim().is_empty() {
        return Err(GeminiError::EmptyPrompt);
    }
    let estimated = estimate_tokens(prompt);
    if estimated > limit {
        return Err(GeminiError::PromptTooLarge { estimated, limit });
    }
    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_with_stdin() {
        assert_eq!(compose(Some("ctx"), "question"), "ctx\n\nquestion");
    }

    #[test]
    fn test_compose_trims_both_sides() {
        assert_eq!(compose(Some("  ctx\n"), " question \n"), "ctx\n\nquestion");
    }

    #[test]
    fn test_compose_without_stdin() {
        assert_eq!(compose(None, "question"), "question");
        assert_eq!(compose(Some("   \n"), "question"), "question");
    }

    #[test]
    fn test_estimate_truncates() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("one"), 1);
        assert_eq!(estimate_tokens("one two three"), 3);
        assert_eq!(estimate_tokens("a b c d e f g h i j"), 13);
        assert_eq!(estimate_tokens("  spaced\t\tout\nwords  "), 3);
    }

    #[test]
    fn test_limit_boundary() {
        // 3 words -> 3 tokens
        assert!(estimate_and_check("one two three", 3).is_ok());
        match estimate_and_check("one two three", 2) {
            Err(GeminiError::PromptTooLarge { estimated, limit }) => {
                assert_eq!(estimated, 3);
                assert_eq!(limit, 2);
            }
            other => panic!("expected PromptTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_prompt_rejected() {
        assert!(matches!(
            estimate_and_check(" \n\t", 100),
            Err(GeminiError::EmptyPrompt)
        ));
    }
}
