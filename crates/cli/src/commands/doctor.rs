//! `toolwise doctor` — Diagnose setup.

use toolwise_config::AppConfig;
use toolwise_core::message::Conversation;
use toolwise_decision::{TokenAllocator, build_tokenizer};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 toolwise Doctor — Setup Diagnostics");
    println!("======================================\n");

    let mut issues = 0;

    println!("  ✅ Rust binary running");

    let config_path = AppConfig::config_dir().join("config.toml");
    let config = if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid");
                config
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                issues += 1;
                AppConfig::default()
            }
        }
    } else {
        println!("  ⚠️  No config file, using defaults — run `toolwise config init`");
        AppConfig::default()
    };

    match build_tokenizer(config.tokens.tokenizer) {
        Ok(tokenizer) => {
            println!("  ✅ Tokenizer available: {}", tokenizer.name());
            match TokenAllocator::from_config(&config.tokens, tokenizer)
                .and_then(|allocator| allocator.measure(&Conversation::new(), None, &config.default_model))
            {
                Ok(budget) => println!(
                    "  ✅ Model {} supported (context window {})",
                    config.default_model, budget.limit
                ),
                Err(e) => {
                    println!("  ❌ Model {}: {e}", config.default_model);
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  ❌ Tokenizer unavailable: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
