use serde::Serialize;
use std::sync::Arc;
use toolwise_config::TokenConfig;
use toolwise_core::error::DecisionError;
use toolwise_core::message::Conversation;
use toolwise_core::tokenizer::Tokenizer;
use toolwise_core::tool::ToolSchema;

use super::accounting::TokenCounter;
use super::windows::ContextWindows;

/// Token usage of one request against a model's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenBudget {
    pub limit: usize,
    pub used: usize,
    pub min: usize,
    pub max: usize,
}

impl TokenBudget {
    /// Tokens left in the window; negative when history overflows it.
    pub fn available(&self) -> i64 {
        self.limit as i64 - self.used as i64
    }

    pub fn granted(&self) -> usize {
        clamp_generation_tokens(self.available(), self.min, self.max)
    }

    pub fn overflows(&self) -> bool {
        self.used > self.limit
    }
}

/// Clamp `available` into `[min, max]`.
pub fn clamp_generation_tokens(available: i64, min: usize, max: usize) -> usize {
    if available >= max as i64 {
        max
    } else if available > min as i64 {
        available as usize
    } else {
        min
    }
}

pub struct TokenAllocator {
    counter: TokenCounter,
    windows: ContextWindows,
    min: usize,
    max: usize,
}

impl TokenAllocator {
    pub fn new(
        tokenizer: Arc<dyn Tokenizer>,
        windows: ContextWindows,
        min: usize,
        max: usize,
    ) -> Result<Self, DecisionError> {
        if min > max {
            return Err(DecisionError::InvalidConfiguration(format!(
                "min_tokens ({min}) exceeds max_tokens ({max})"
            )));
        }
        Ok(Self {
            counter: TokenCounter::new(tokenizer),
            windows,
            min,
            max,
        })
    }

    pub fn from_config(config: &TokenConfig, tokenizer: Arc<dyn Tokenizer>) -> Result<Self, DecisionError> {
        Self::new(
            tokenizer,
            ContextWindows::with_overrides(&config.context_windows),
            config.min_tokens,
            config.max_tokens,
        )
    }

    pub fn bounds(&self) -> (usize, usize) {
        (self.min, self.max)
    }

    pub fn windows(&self) -> &ContextWindows {
        &self.windows
    }

    pub fn counter(&self) -> &TokenCounter {
        &self.counter
    }

    /// Count what `conversation` and `tools` use of `model`'s window.
    pub fn measure(
        &self,
        conversation: &Conversation,
        tools: Option<&[ToolSchema]>,
        model: &str,
    ) -> Result<TokenBudget, DecisionError> {
        let mut used = self.counter.count_conversation(conversation, model)?;
        if let Some(schemas) = tools {
            used += self.counter.count_tool_schemas(schemas, model)?;
        }
        let limit = self.windows.lookup(model)?;
        Ok(TokenBudget {
            limit,
            used,
            min: self.min,
            max: self.max,
        })
    }

    /// Generation tokens to request for the next reply.
    pub fn allocate(
        &self,
        conversation: &Conversation,
        tools: Option<&[ToolSchema]>,
        model: &str,
    ) -> Result<usize, DecisionError> {
        let budget = self.measure(conversation, tools, model)?;
        let granted = budget.granted();
        if budget.overflows() {
            tracing::warn!(
                model,
                used = budget.used,
                limit = budget.limit,
                "Conversation exceeds the context window"
            );
        }
        tracing::info!(
            model,
            used = budget.used,
            limit = budget.limit,
            granted,
            "Token budget allocated"
        );
        Ok(granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::HeuristicTokenizer;
    use toolwise_core::message::PromptMessage;
    use toolwise_core::tool::{FieldMap, FieldSpec};

    fn allocator(min: usize, max: usize) -> TokenAllocator {
        TokenAllocator::new(Arc::new(HeuristicTokenizer), ContextWindows::builtin(), min, max).unwrap()
    }

    #[test]
    fn clamp_cases() {
        assert_eq!(clamp_generation_tokens(10_000, 256, 4096), 4096);
        assert_eq!(clamp_generation_tokens(4096, 256, 4096), 4096);
        assert_eq!(clamp_generation_tokens(1000, 256, 4096), 1000);
        assert_eq!(clamp_generation_tokens(256, 256, 4096), 256);
        assert_eq!(clamp_generation_tokens(10, 256, 4096), 256);
        assert_eq!(clamp_generation_tokens(-500, 256, 4096), 256);
        assert_eq!(clamp_generation_tokens(300, 512, 512), 512);
    }

    #[test]
    fn clamp_always_within_bounds() {
        for min in [1usize, 64, 500] {
            for max in [min, min + 1, 2048] {
                for available in [-10_000i64, -1, 0, 1, 63, 64, 65, 499, 500, 501, 2047, 2048, 9_999] {
                    let granted = clamp_generation_tokens(available, min, max);
                    assert!(min <= granted && granted <= max, "{available} {min} {max} -> {granted}");
                }
            }
        }
    }

    #[test]
    fn small_conversation_gets_max() {
        let conv = Conversation::from_messages(vec![PromptMessage::user("What time is it?")]);
        assert_eq!(allocator(256, 4096).allocate(&conv, None, "gpt-4").unwrap(), 4096);
    }

    #[test]
    fn long_history_gets_remainder_then_floor() {
        // gpt-4 has 8192 tokens; 20_000 bytes of content ≈ 5000 tokens.
        let conv = Conversation::from_messages(vec![PromptMessage::user("a".repeat(20_000))]);
        let budget = allocator(256, 4096).measure(&conv, None, "gpt-4").unwrap();
        assert_eq!(budget.used, 3 + 1 + 5000 + 3);
        assert_eq!(budget.granted(), 8192 - 5007);

        let conv = Conversation::from_messages(vec![PromptMessage::user("a".repeat(40_000))]);
        let budget = allocator(256, 4096).measure(&conv, None, "gpt-4").unwrap();
        assert!(budget.overflows());
        assert_eq!(budget.granted(), 256);
    }

    #[test]
    fn tool_schemas_add_to_usage() {
        let conv = Conversation::from_messages(vec![PromptMessage::user("hi")]);
        let schemas = vec![ToolSchema::new(
            "weather",
            "Current weather",
            FieldMap::new().with("city", FieldSpec::text("City")),
        )];
        let a = allocator(256, 4096);
        let without = a.measure(&conv, None, "gpt-4o").unwrap().used;
        let with = a.measure(&conv, Some(&schemas), "gpt-4o").unwrap().used;
        assert!(with > without);
    }

    #[test]
    fn deterministic() {
        let conv = Conversation::from_messages(vec![
            PromptMessage::system("You are helpful."),
            PromptMessage::user("Summarise the news."),
        ]);
        let a = allocator(256, 4096);
        assert_eq!(
            a.measure(&conv, None, "gpt-4o").unwrap(),
            a.measure(&conv, None, "gpt-4o").unwrap()
        );
    }

    #[test]
    fn unknown_model_fails() {
        let conv = Conversation::from_messages(vec![PromptMessage::user("hi")]);
        let err = allocator(256, 4096).allocate(&conv, None, "gpt-4-0613").unwrap_err();
        assert!(matches!(err, DecisionError::ModelNotSupported(_)));
        let err = allocator(256, 4096).allocate(&conv, None, "llama3").unwrap_err();
        assert!(matches!(err, DecisionError::ModelNotSupported(_)));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let result = TokenAllocator::new(Arc::new(HeuristicTokenizer), ContextWindows::builtin(), 10, 5);
        assert!(matches!(result, Err(DecisionError::InvalidConfiguration(_))));
    }

    #[test]
    fn config_windows_are_used() {
        let mut config = TokenConfig::default();
        config.context_windows.insert("gpt-4o-mini".into(), 1_000);
        let a = TokenAllocator::from_config(&config, Arc::new(HeuristicTokenizer)).unwrap();
        let conv = Conversation::from_messages(vec![PromptMessage::user("hello")]);
        let budget = a.measure(&conv, None, "gpt-4o-mini").unwrap();
        assert_eq!(budget.limit, 1_000);
        assert_eq!(budget.granted(), 1_000 - budget.used);
    }
}
