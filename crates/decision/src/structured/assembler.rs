use std::sync::Arc;
use toolwise_config::StructuredConfig;
use toolwise_core::error::{DecisionError, InferenceError};
use toolwise_core::inference::ConstrainedGenerator;
use toolwise_core::message::{Conversation, Role};
use toolwise_core::record::StructuredRecord;
use toolwise_core::tool::{FieldSpec, ToolSchema};
use toolwise_core::transcript::Transcript;

use super::escape::decode_escapes;
use crate::guard::guard;

pub const DEFAULT_STOP_MARKER: &str = "<";

/// A filled record, either as ordered fields or as one JSON object string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredOutput {
    Record(StructuredRecord),
    Json(String),
}

/// Fills a tool schema field by field, in declaration order.
pub struct StructuredOutputAssembler {
    generator: Arc<dyn ConstrainedGenerator>,
    stop_marker: String,
}

impl StructuredOutputAssembler {
    pub fn new(generator: Arc<dyn ConstrainedGenerator>) -> Self {
        Self {
            generator,
            stop_marker: DEFAULT_STOP_MARKER.to_string(),
        }
    }

    pub fn with_stop_marker(mut self, stop_marker: impl Into<String>) -> Self {
        self.stop_marker = stop_marker.into();
        self
    }

    pub fn from_config(config: &StructuredConfig, generator: Arc<dyn ConstrainedGenerator>) -> Self {
        Self::new(generator).with_stop_marker(config.stop_marker.clone())
    }

    pub async fn assemble(
        &self,
        schema: &ToolSchema,
        conversation: &Conversation,
        include_system: bool,
    ) -> Result<StructuredRecord, DecisionError> {
        self.assemble_for(schema, conversation, include_system, None).await
    }

    /// Like [`assemble`](Self::assemble), with answers focused on `request`.
    pub async fn assemble_for(
        &self,
        schema: &ToolSchema,
        conversation: &Conversation,
        include_system: bool,
        request: Option<&str>,
    ) -> Result<StructuredRecord, DecisionError> {
        let mut transcript = Transcript::from_conversation(conversation, include_system);
        let focus = match request {
            Some(request) if !request.is_empty() => {
                format!(", particularly related to the following request:\n{request}")
            }
            _ => ".".to_string(),
        };
        transcript.push_turn(
            Role::Assistant,
            &format!("I am answering your questions based on the content in our conversation given above{focus}"),
        );

        let mut record = StructuredRecord::new();
        for (name, spec) in schema.fields().iter() {
            transcript.push_turn(Role::User, &format!("Question: {}", field_question(spec)));
            transcript.open_turn(Role::Assistant, "Answer: ");

            let stage = format!("structured.{}.{name}", schema.name);
            let raw = match &spec.options {
                Some(options) => {
                    if options.is_empty() {
                        return Err(DecisionError::InvalidConfiguration(format!(
                            "field '{name}' of '{}' declares an empty enum",
                            schema.name
                        )));
                    }
                    guard(&stage, self.choose(&transcript, options)).await?
                }
                None => {
                    let text = guard(
                        &stage,
                        self.generator.generate_free_text(&transcript, &self.stop_marker),
                    )
                    .await?;
                    truncate_at(&text, &self.stop_marker).to_string()
                }
            };
            transcript.close_turn(&raw, "");

            let value = decode_escapes(raw.trim_end());
            tracing::debug!(tool = %schema.name, field = name, value = %value, "Field answered");
            record.set(name, value);
        }

        tracing::info!(tool = %schema.name, fields = record.len(), "Structured record assembled");
        Ok(record)
    }

    /// Assemble and render in the requested format.
    pub async fn assemble_as(
        &self,
        schema: &ToolSchema,
        conversation: &Conversation,
        include_system: bool,
        request: Option<&str>,
        json_output: bool,
    ) -> Result<StructuredOutput, DecisionError> {
        let record = self.assemble_for(schema, conversation, include_system, request).await?;
        if json_output {
            Ok(StructuredOutput::Json(record.to_json()?))
        } else {
            Ok(StructuredOutput::Record(record))
        }
    }

    async fn choose(&self, transcript: &Transcript, options: &[String]) -> Result<String, InferenceError> {
        let answer = self.generator.choose_one(transcript, options).await?;
        if options.contains(&answer) {
            Ok(answer)
        } else {
            Err(InferenceError::MalformedResponse(format!(
                "'{answer}' is not one of the allowed options"
            )))
        }
    }
}

fn field_question(spec: &FieldSpec) -> String {
    let mut question = spec.description.replace('\n', " ");
    if let Some(options) = &spec.options {
        question.push_str(&format!(
            " Its value must be one of these options: '{}'",
            options.join("', '")
        ));
    }
    question
}

fn truncate_at<'a>(text: &'a str, stop_marker: &str) -> &'a str {
    match text.find(stop_marker) {
        Some(end) if !stop_marker.is_empty() => &text[..end],
        _ => text,
    }
}
