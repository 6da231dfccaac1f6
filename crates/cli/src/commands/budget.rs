//! `toolwise budget` — Token budget for a conversation.

use std::path::Path;
use toolwise_config::AppConfig;
use toolwise_decision::{TokenAllocator, build_tokenizer};

use crate::input;

pub async fn run(
    conversation: &Path,
    tools: Option<&Path>,
    model: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let model = model.unwrap_or_else(|| config.default_model.clone());

    let conversation = input::load_conversation(conversation)?;
    let catalog = tools.map(input::load_catalog).transpose()?;

    let tokenizer = build_tokenizer(config.tokens.tokenizer)?;
    let allocator = TokenAllocator::from_config(&config.tokens, tokenizer)?;
    let budget = allocator.measure(&conversation, catalog.as_ref().map(|c| c.schemas()), &model)?;

    println!("📊 Token budget — {model}");
    println!("   Tokenizer:  {}", allocator.counter().tokenizer_name());
    println!("   Messages:   {}", conversation.len());
    if let Some(catalog) = &catalog {
        println!("   Tools:      {}", catalog.len());
    }
    println!("   Used:       {}", budget.used);
    println!("   Limit:      {}", budget.limit);
    println!("   Available:  {}", budget.available());
    println!("   Bounds:     {}..={}", budget.min, budget.max);
    println!("   Granted:    {}", budget.granted());
    if budget.overflows() {
        println!("\n   ⚠️  Conversation exceeds the context window");
    }

    Ok(())
}
