//! Guided dialogue: the request is quoted once, then each stage is a
//! question whose answer the generator must pick from the stage labels.
//! Answers stay in the transcript, so later questions see earlier ones.

use async_trait::async_trait;
use std::sync::Arc;
use toolwise_core::error::InferenceError;
use toolwise_core::inference::ConstrainedGenerator;
use toolwise_core::message::Role;

use super::{ScreeningBackend, ScreeningContext, Stage};

pub struct DialogueBackend {
    generator: Arc<dyn ConstrainedGenerator>,
}

impl DialogueBackend {
    pub fn new(generator: Arc<dyn ConstrainedGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl ScreeningBackend for DialogueBackend {
    fn name(&self) -> &str {
        self.generator.name()
    }

    fn prepare(&self, context: &mut ScreeningContext) {
        let intro = format!(
            "Please answer my questions with regards to the following request:\n<request>{}</request>",
            context.request
        );
        context.transcript.push_turn(Role::User, &intro);
        context
            .transcript
            .push_turn(Role::Assistant, "Certainly! Please provide me with the questions.");
    }

    async fn ask(&self, stage: &Stage, context: &mut ScreeningContext) -> Result<String, InferenceError> {
        let lead = format!("Question: {}\nAnswer: {} ", stage.question, stage.answer_prefix);
        context.transcript.open_turn(Role::User, &lead);
        let answer = self.generator.choose_one(&context.transcript, &stage.labels).await?;
        context.transcript.close_turn(&answer, ".");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedGenerator;

    fn stage(question: &str, prefix: &str, labels: &[&str]) -> Stage {
        Stage {
            name: "kind",
            question: question.into(),
            answer_prefix: prefix.into(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn transcript_accumulates_answers() {
        let generator = Arc::new(ScriptedGenerator::choices(&["issue", "current weather"]));
        let backend = DialogueBackend::new(generator.clone());
        let mut context = ScreeningContext::new("my umbrella question");
        backend.prepare(&mut context);

        let first = stage("How is it formulated?", "It is formulated like", &["question", "issue"]);
        let second = stage("What is it about?", "It is about", &["math", "current weather"]);
        assert_eq!(backend.ask(&first, &mut context).await.unwrap(), "issue");
        assert_eq!(backend.ask(&second, &mut context).await.unwrap(), "current weather");

        let seen = generator.transcripts();
        assert!(seen[0].contains("<request>my umbrella question</request>"));
        assert!(seen[0].ends_with("Answer: It is formulated like "));
        assert!(seen[1].contains("It is formulated like issue."));
        assert!(context.transcript.as_str().ends_with("It is about current weather.\n<|im_end|>\n"));
    }
}
