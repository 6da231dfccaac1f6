//! `toolwise config` — Configuration management commands.

use toolwise_config::{AppConfig, ScreeningStrategy};

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            if config.selection.auto_selection_threshold > config.selection.tool_dependence {
                warnings.push("auto_selection_threshold is above tool_dependence; every relevant tool is auto-selected");
            }

            if config.tokens.max_tokens < 2 * config.tokens.min_tokens {
                warnings.push("max_tokens is close to min_tokens; budgets will rarely vary");
            }

            if config.screening.strategy == ScreeningStrategy::Cascade
                && config.screening.cascade.kind.information.is_empty()
            {
                warnings.push("Cascade kind stage has no information labels; every non-chat request takes the action branch");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Model:      {}", config.default_model);
            println!("   Strategy:   {:?}", config.screening.strategy);
            println!(
                "   Selection:  dependence {} / auto {}",
                config.selection.tool_dependence, config.selection.auto_selection_threshold
            );
            println!(
                "   Tokens:     {}..={} ({:?})",
                config.tokens.min_tokens, config.tokens.max_tokens, config.tokens.tokenizer
            );
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

pub async fn init(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    if config_path.exists() && !force {
        println!("  Config file exists: {}", config_path.display());
        println!("  Use --force to overwrite it.");
        return Ok(());
    }

    std::fs::create_dir_all(&config_dir)?;
    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Wrote default config: {}", config_path.display());
    Ok(())
}
