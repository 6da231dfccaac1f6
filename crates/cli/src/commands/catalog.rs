//! `toolwise catalog` — Pick any tool from a catalog.

use std::path::Path;
use std::sync::Arc;
use toolwise_config::AppConfig;
use toolwise_decision::ToolSelector;

use crate::input;
use crate::terminal::TerminalChooser;

pub async fn run(tools: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let catalog = input::load_catalog(tools)?;
    if catalog.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }

    let selector = ToolSelector::from_config(&config.selection, Arc::new(TerminalChooser));
    match selector.select_from_catalog(&catalog.names())? {
        Some(name) => println!("{name}"),
        None => println!("No tool selected."),
    }
    Ok(())
}
