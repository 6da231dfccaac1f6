//! `toolwise assemble` — Fill a tool schema field by field.

use std::path::Path;
use std::sync::Arc;
use toolwise_config::AppConfig;
use toolwise_core::message::Conversation;
use toolwise_decision::{StructuredOutput, StructuredOutputAssembler};

use crate::input;
use crate::terminal::TerminalGenerator;

pub async fn run(
    schema: &Path,
    conversation: Option<&Path>,
    request: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let schema = input::load_schema(schema)?;
    let conversation = match conversation {
        Some(path) => input::load_conversation(path)?,
        None => Conversation::new(),
    };

    let assembler = StructuredOutputAssembler::from_config(&config.structured, Arc::new(TerminalGenerator));
    let output = assembler
        .assemble_as(
            &schema,
            &conversation,
            config.structured.include_system_message,
            request,
            json || config.structured.json_output,
        )
        .await?;

    match output {
        StructuredOutput::Json(text) => println!("{text}"),
        StructuredOutput::Record(record) => {
            println!("\n🧩 {}", schema.name);
            for (field, value) in record.iter() {
                println!("   {field}: {value}");
            }
        }
    }
    Ok(())
}
