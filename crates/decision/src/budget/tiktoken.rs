use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tiktoken_rs::CoreBPE;
use toolwise_core::error::TokenizerError;
use toolwise_core::tokenizer::Tokenizer;

/// Exact BPE encoding via `tiktoken-rs`.
///
/// Encodings are loaded once per model. Models tiktoken does not know are
/// encoded with `cl100k_base`.
#[derive(Default)]
pub struct TiktokenTokenizer {
    cache: Mutex<HashMap<String, Arc<CoreBPE>>>,
}

impl TiktokenTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn bpe_for(&self, model: &str) -> Result<Arc<CoreBPE>, TokenizerError> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| TokenizerError::EncodeFailed("encoding cache poisoned".into()))?;
        if let Some(bpe) = cache.get(model) {
            return Ok(Arc::clone(bpe));
        }

        let bpe = match tiktoken_rs::get_bpe_from_model(model) {
            Ok(bpe) => bpe,
            Err(e) => {
                tracing::warn!(model, error = %e, "Model not found, using cl100k_base encoding");
                tiktoken_rs::cl100k_base().map_err(|e| TokenizerError::EncodingUnavailable {
                    model: model.to_string(),
                    reason: e.to_string(),
                })?
            }
        };
        let bpe = Arc::new(bpe);
        cache.insert(model.to_string(), Arc::clone(&bpe));
        Ok(bpe)
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn name(&self) -> &str {
        "tiktoken"
    }

    fn encode(&self, text: &str, model: &str) -> Result<Vec<u32>, TokenizerError> {
        let bpe = self.bpe_for(model)?;
        Ok(bpe
            .encode_with_special_tokens(text)
            .into_iter()
            .map(|token| token as u32)
            .collect())
    }
}
