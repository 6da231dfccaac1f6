//! Token budget: how many tokens a reply may use.
//!
//! ```text
//! used      = tokens(conversation) + tokens(tool schemas)
//! limit     = context window of the model
//! available = limit - used
//! granted   = max            if available >= max
//!           = available      if max > available > min
//!           = min            otherwise
//! ```
//!
//! The granted value always lies in `[min, max]`.

pub mod accounting;
pub mod allocator;
pub mod heuristic;
#[cfg(feature = "tiktoken")]
pub mod tiktoken;
pub mod windows;

pub use accounting::{MessageAccounting, REPLY_PRIMING_TOKENS, TokenCounter, resolve_accounting};
pub use allocator::{TokenAllocator, TokenBudget, clamp_generation_tokens};
pub use heuristic::HeuristicTokenizer;
#[cfg(feature = "tiktoken")]
pub use tiktoken::TiktokenTokenizer;
pub use windows::ContextWindows;

use std::sync::Arc;
use toolwise_config::TokenizerKind;
use toolwise_core::error::DecisionError;
use toolwise_core::tokenizer::Tokenizer;

/// Create the configured tokenizer.
pub fn build_tokenizer(kind: TokenizerKind) -> Result<Arc<dyn Tokenizer>, DecisionError> {
    match kind {
        TokenizerKind::Heuristic => Ok(Arc::new(HeuristicTokenizer)),
        #[cfg(feature = "tiktoken")]
        TokenizerKind::Tiktoken => Ok(Arc::new(TiktokenTokenizer::new())),
        #[cfg(not(feature = "tiktoken"))]
        TokenizerKind::Tiktoken => Err(DecisionError::InvalidConfiguration(
            "tokenizer 'tiktoken' requires building with the `tiktoken` feature".into(),
        )),
    }
}
