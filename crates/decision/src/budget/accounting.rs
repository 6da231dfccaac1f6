//! Token accounting for chat conversations and tool schemas.

use std::sync::Arc;
use toolwise_core::error::DecisionError;
use toolwise_core::message::{Conversation, PromptMessage};
use toolwise_core::tokenizer::Tokenizer;
use toolwise_core::tool::ToolSchema;

/// Every reply is primed with `<|start|>assistant<|message|>`.
pub const REPLY_PRIMING_TOKENS: usize = 3;

/// Models counted with the current chat framing.
const CURRENT_FRAMING: &[&str] = &[
    "gpt-4o",
    "gpt-3.5-turbo",
    "gpt-3.5-turbo-0125",
    "gpt-3.5-turbo-1106",
    "gpt-3.5-turbo-0613",
    "gpt-3.5-turbo-16k",
    "gpt-3.5-turbo-16k-0613",
    "gpt-4-turbo",
    "gpt-4-turbo-preview",
    "gpt-4-0125-preview",
    "gpt-4-1106-preview",
    "gpt-4-0314",
    "gpt-4-32k-0314",
    "gpt-4",
    "gpt-4-0613",
    "gpt-4-32k",
    "gpt-4-32k-0613",
];

const LEGACY_FRAMING: &str = "gpt-3.5-turbo-0301";

/// Per-message framing overhead of a model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageAccounting {
    pub tokens_per_message: i64,
    /// Added once per message that carries a `name`.
    pub tokens_per_name: i64,
}

impl MessageAccounting {
    pub const CURRENT: Self = Self {
        tokens_per_message: 3,
        tokens_per_name: 1,
    };

    /// The name replaces the role, hence the negative adjustment.
    pub const LEGACY: Self = Self {
        tokens_per_message: 4,
        tokens_per_name: -1,
    };
}

/// Resolve the model whose accounting applies to `model`.
///
/// Undated variants fall back to a dated reference model of their family:
/// anything containing `gpt-3.5-turbo` to `gpt-3.5-turbo-0613`, anything
/// containing `gpt-4` to `gpt-4-0613`. Other families are not supported.
pub fn resolve_accounting(model: &str) -> Result<(&str, MessageAccounting), DecisionError> {
    if CURRENT_FRAMING.contains(&model) {
        Ok((model, MessageAccounting::CURRENT))
    } else if model == LEGACY_FRAMING {
        Ok((model, MessageAccounting::LEGACY))
    } else if model.contains("gpt-3.5-turbo") {
        Ok(("gpt-3.5-turbo-0613", MessageAccounting::CURRENT))
    } else if model.contains("gpt-4") {
        Ok(("gpt-4-0613", MessageAccounting::CURRENT))
    } else {
        Err(DecisionError::ModelNotSupported(model.to_string()))
    }
}

/// Counts prompt tokens with a [`Tokenizer`].
#[derive(Clone)]
pub struct TokenCounter {
    tokenizer: Arc<dyn Tokenizer>,
}

impl TokenCounter {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { tokenizer }
    }

    pub fn tokenizer_name(&self) -> &str {
        self.tokenizer.name()
    }

    /// Tokens used by a conversation, reply priming included.
    pub fn count_conversation(&self, conversation: &Conversation, model: &str) -> Result<usize, DecisionError> {
        let (resolved, accounting) = resolve_accounting(model)?;
        if resolved != model {
            tracing::debug!(model, resolved, "Counting tokens with reference model");
        }

        let mut total: i64 = 0;
        for message in &conversation.messages {
            total += accounting.tokens_per_message;
            total += self.count_message(message, resolved, accounting)?;
        }
        total += REPLY_PRIMING_TOKENS as i64;
        Ok(total.max(0) as usize)
    }

    /// Tokens used by tool schemas, each counted as its serialized text.
    pub fn count_tool_schemas(&self, schemas: &[ToolSchema], model: &str) -> Result<usize, DecisionError> {
        let mut total = 0;
        for schema in schemas {
            let text = serde_json::to_string(schema)?;
            total += self.tokenizer.count_tokens(&text, model)?;
        }
        Ok(total)
    }

    fn count_message(
        &self,
        message: &PromptMessage,
        model: &str,
        accounting: MessageAccounting,
    ) -> Result<i64, DecisionError> {
        if message.content.is_empty() {
            let text = serde_json::to_string(message)?;
            return Ok(self.tokenizer.count_tokens(&text, model)? as i64);
        }

        let mut tokens: i64 = 0;
        for (key, value) in message.fields() {
            tokens += self.tokenizer.count_tokens(value, model)? as i64;
            if key == "name" {
                tokens += accounting.tokens_per_name;
            }
        }
        Ok(tokens)
    }
}
