//! Pluggable token counting for benchmark measurements.
//!
//! Provides a `Tokenizer` trait with two implementations: `TiktokenTokenizer`
//! (cl100k_base BPE, the default — measurements are only comparable across
//! deployments when everyone counts with the same encoding) and
//! `BytesEstimateTokenizer` (fast bytes/3 heuristic for local smoke runs).

use std::sync::Arc;

pub trait Tokenizer: Send + Sync {
    fn count_tokens(&self, text: &str) -> usize;
    fn name(&self) -> &str;
}

/// Tiktoken cl100k_base tokenizer (default).
pub struct TiktokenTokenizer {
    bpe: tiktoken_rs::CoreBPE,
}

impl TiktokenTokenizer {
    pub fn new() -> Self {
        Self { bpe: tiktoken_rs::cl100k_base().expect("embedded cl100k_base ranks must parse") }
    }
}

impl Default for TiktokenTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
    fn name(&self) -> &str {
        "tiktoken"
    }
}

/// Bytes/3 estimation (fast, no BPE table lookup)
pub struct BytesEstimateTokenizer;

impl Tokenizer for BytesEstimateTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        text.len().div_ceil(3)
    }
    fn name(&self) -> &str {
        "bytes-estimate"
    }
}

/// Create a tokenizer by name. Falls back to tiktoken for unknown names.
pub fn create_tokenizer(name: &str) -> Arc<dyn Tokenizer> {
    match name {
        "bytes-estimate" => Arc::new(BytesEstimateTokenizer),
        _ => Arc::new(TiktokenTokenizer::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_estimate_rounds_up() {
        let tok = BytesEstimateTokenizer;
        assert_eq!(tok.count_tokens(""), 0);
        assert_eq!(tok.count_tokens("ab"), 1);
        assert_eq!(tok.count_tokens("abcd"), 2);
    }

    #[test]
    fn tiktoken_is_deterministic() {
        let tok = TiktokenTokenizer::new();
        let a = tok.count_tokens("The quick brown fox jumps over the lazy dog");
        let b = tok.count_tokens("The quick brown fox jumps over the lazy dog");
        assert_eq!(a, b);
        assert!(a > 0);
    }

    #[test]
    fn tiktoken_empty_text_is_zero() {
        let tok = TiktokenTokenizer::new();
        assert_eq!(tok.count_tokens(""), 0);
    }

    #[test]
    fn factory_selects_by_name() {
        assert_eq!(create_tokenizer("bytes-estimate").name(), "bytes-estimate");
        assert_eq!(create_tokenizer("tiktoken").name(), "tiktoken");
        // Unknown names fall back to the accurate counter
        assert_eq!(create_tokenizer("bogus").name(), "tiktoken");
    }
}
