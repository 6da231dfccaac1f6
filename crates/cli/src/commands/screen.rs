//! `toolwise screen` — Decide whether a request needs a tool.
//!
//! Runs the guided dialogue with the user answering each question, so the
//! configured label sets can be tried out without a model.

use std::sync::Arc;
use toolwise_config::{AppConfig, ScreeningStrategy};
use toolwise_core::inference::ConstrainedGenerator;
use toolwise_decision::{IntentScreener, ToolNeed};

use crate::terminal::TerminalGenerator;

pub async fn run(request: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let mut screening = config.screening.clone();
    if screening.strategy != ScreeningStrategy::Guided {
        tracing::info!("No classifier available in the terminal, using the guided dialogue");
        screening.strategy = ScreeningStrategy::Guided;
    }

    let generator: Arc<dyn ConstrainedGenerator> = Arc::new(TerminalGenerator);
    let screener = IntentScreener::from_config(&screening, None, Some(generator))?;

    println!("🔎 Screening: {request}");
    match screener.screen(request).await? {
        ToolNeed::ToolNeeded => println!("\nComment: Tool may be required."),
        ToolNeed::NoToolNeeded => println!("\nComment: Tool may not be required."),
    }
    Ok(())
}
