//! Tokenizer adapter — maps text to token ids for a model family.

use crate::error::TokenizerError;

pub trait Tokenizer: Send + Sync {
    /// A human-readable name (e.g. "heuristic", "tiktoken").
    fn name(&self) -> &str;

    /// Encode `text` the way `model` would see it.
    fn encode(&self, text: &str, model: &str) -> std::result::Result<Vec<u32>, TokenizerError>;

    /// Number of tokens in `text`.
    fn count_tokens(&self, text: &str, model: &str) -> std::result::Result<usize, TokenizerError> {
        Ok(self.encode(text, model)?.len())
    }
}
