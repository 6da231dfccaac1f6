//! `toolwise select` — Pick a tool from ranked candidates.

use std::path::Path;
use std::sync::Arc;
use toolwise_config::AppConfig;
use toolwise_core::tool::{FieldMap, ToolCatalog, ToolSchema};
use toolwise_decision::{CandidateRouter, Route, ToolSelector};

use crate::input;
use crate::terminal::TerminalChooser;

pub async fn run(
    candidates: &Path,
    tools: Option<&Path>,
    dependence: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(entry) = dependence {
        config.apply_tool_dependence(entry)?;
    }

    let candidates = input::load_candidates(candidates)?;
    let catalog = match tools {
        Some(path) => input::load_catalog(path)?,
        None => ToolCatalog::new(
            candidates
                .iter()
                .map(|c| ToolSchema::new(c.name.clone(), "", FieldMap::new()))
                .collect(),
        ),
    };

    let selector = ToolSelector::from_config(&config.selection, Arc::new(TerminalChooser));
    let router = CandidateRouter::new(selector, Arc::new(catalog), config.selection.tool_dependence);

    match router.route(&candidates)? {
        Route::Tool(name) => println!("{name}"),
        Route::NoSelection => println!("No tool selected."),
        Route::DirectReply => match candidates.first() {
            Some(closest) => println!(
                "No tool is close enough (closest {:.3} > tool dependence {:.3}).",
                closest.distance, config.selection.tool_dependence
            ),
            None => println!("No candidates given."),
        },
    }
    Ok(())
}
