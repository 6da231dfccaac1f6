use toolwise_core::error::TokenizerError;
use toolwise_core::tokenizer::Tokenizer;

/// Bytes-per-token estimate that needs no model files.
///
/// Every 4 bytes of UTF-8 (rounded up) count as one token. Ids are the
/// little-endian value of each chunk, so the same text always encodes the
/// same way regardless of model.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenizer;

const BYTES_PER_TOKEN: usize = 4;

impl Tokenizer for HeuristicTokenizer {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn encode(&self, text: &str, _model: &str) -> Result<Vec<u32>, TokenizerError> {
        Ok(text
            .as_bytes()
            .chunks(BYTES_PER_TOKEN)
            .map(|chunk| {
                let mut word = [0u8; BYTES_PER_TOKEN];
                word[..chunk.len()].copy_from_slice(chunk);
                u32::from_le_bytes(word)
            })
            .collect())
    }

    fn count_tokens(&self, text: &str, _model: &str) -> Result<usize, TokenizerError> {
        Ok(text.len().div_ceil(BYTES_PER_TOKEN))
    }
}
