//! Let the generator pick a tool from the catalog.
//!
//! The model first writes a short thought about the request, then chooses
//! among the catalog's tool names.

use std::sync::Arc;
use toolwise_core::error::{DecisionError, InferenceError};
use toolwise_core::inference::ConstrainedGenerator;
use toolwise_core::message::Role;
use toolwise_core::tool::ToolCatalog;
use toolwise_core::transcript::Transcript;

use crate::guard::guard;

const THOUGHT_STOP: &str = ".";

pub struct GenerativeToolPicker {
    generator: Arc<dyn ConstrainedGenerator>,
}

impl GenerativeToolPicker {
    pub fn new(generator: Arc<dyn ConstrainedGenerator>) -> Self {
        Self { generator }
    }

    /// Pick a tool for `request`. Returns `None` for an empty catalog.
    pub async fn pick(&self, request: &str, catalog: &ToolCatalog) -> Result<Option<String>, DecisionError> {
        if catalog.is_empty() {
            return Ok(None);
        }

        let mut transcript = Transcript::new();
        transcript.push_turn(Role::User, &tool_listing(catalog));
        transcript.open_turn(Role::Assistant, &format!("Request: {request}\nThought: "));

        let thought = guard(
            "selection.thought",
            self.generator.generate_free_text(&transcript, THOUGHT_STOP),
        )
        .await?;
        let thought = thought.split(THOUGHT_STOP).next().unwrap_or_default().trim();
        tracing::debug!(thought, "Tool picker reasoning");
        transcript.continue_turn(thought, ".\nAction: ");

        let names: Vec<String> = catalog.names().into_iter().map(str::to_string).collect();
        let chosen = guard("selection.action", async {
            let chosen = self.generator.choose_one(&transcript, &names).await?;
            if names.contains(&chosen) {
                Ok(chosen)
            } else {
                Err(InferenceError::MalformedResponse(format!("'{chosen}' is not a catalog tool")))
            }
        })
        .await?;
        transcript.close_turn(&chosen, "");

        tracing::info!(tool = %chosen, "Tool picked by generator");
        Ok(Some(chosen))
    }
}

fn tool_listing(catalog: &ToolCatalog) -> String {
    let mut text = String::from("You can use the following tools:\n");
    for schema in catalog.schemas() {
        text.push_str(&format!("- {}: {}\n", schema.name, schema.description.replace('\n', " ")));
    }
    text.push_str(
        "Answer in this format:\nRequest: the request to handle\nThought: what the request needs.\nAction: the tool to use",
    );
    text
}
