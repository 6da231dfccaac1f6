//! Intent screening: does this request need a tool?
//!
//! One decision tree (kind → information | action), two ways of answering
//! its stages:
//!
//! | Strategy | Backend | How a stage is answered |
//! |----------|---------|-------------------------|
//! | `cascade` | [`ClassifierBackend`] | zero-shot classification over the stage labels |
//! | `guided` | [`DialogueBackend`] | forced choice in a growing Q&A transcript |
//!
//! Both end in exactly one of [`ToolNeed::NoToolNeeded`] or
//! [`ToolNeed::ToolNeeded`]; nothing is kept between calls.

pub mod cascade;
pub mod dialogue;
pub mod tree;

pub use cascade::ClassifierBackend;
pub use dialogue::DialogueBackend;
pub use tree::{BranchStage, DecisionTree, KindRoute, KindStage, LabelPolicy, Stage, ToolNeed};

use async_trait::async_trait;
use std::sync::Arc;
use toolwise_config::{ScreeningConfig, ScreeningStrategy};
use toolwise_core::error::{DecisionError, InferenceError};
use toolwise_core::inference::{Classifier, ConstrainedGenerator};
use toolwise_core::transcript::Transcript;

use crate::guard::guard;

/// Per-call state handed to a backend while the tree is walked.
#[derive(Debug, Clone)]
pub struct ScreeningContext {
    pub request: String,
    pub transcript: Transcript,
}

impl ScreeningContext {
    pub fn new(request: &str) -> Self {
        Self {
            request: request.to_string(),
            transcript: Transcript::new(),
        }
    }
}

/// Answers one stage of the screening tree.
#[async_trait]
pub trait ScreeningBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Called once before the first stage.
    fn prepare(&self, _context: &mut ScreeningContext) {}

    /// Pick one label for `stage`.
    async fn ask(
        &self,
        stage: &Stage,
        context: &mut ScreeningContext,
    ) -> std::result::Result<String, InferenceError>;
}

/// Walks the decision tree with a configured backend.
pub struct IntentScreener {
    tree: DecisionTree,
    backend: Box<dyn ScreeningBackend>,
}

impl IntentScreener {
    pub fn new(tree: DecisionTree, backend: Box<dyn ScreeningBackend>) -> Self {
        Self { tree, backend }
    }

    /// Build the screener for the configured strategy.
    ///
    /// `cascade` needs a classifier, `guided` a constrained generator.
    pub fn from_config(
        config: &ScreeningConfig,
        classifier: Option<Arc<dyn Classifier>>,
        generator: Option<Arc<dyn ConstrainedGenerator>>,
    ) -> Result<Self, DecisionError> {
        let tree = DecisionTree::from_config(config.active_tree())?;
        let backend: Box<dyn ScreeningBackend> = match config.strategy {
            ScreeningStrategy::Cascade => Box::new(ClassifierBackend::new(classifier.ok_or_else(
                || DecisionError::InvalidConfiguration("cascade screening needs a classifier".into()),
            )?)),
            ScreeningStrategy::Guided => Box::new(DialogueBackend::new(generator.ok_or_else(
                || DecisionError::InvalidConfiguration("guided screening needs a constrained generator".into()),
            )?)),
        };
        Ok(Self::new(tree, backend))
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    /// Screen a request.
    pub async fn screen(&self, request: &str) -> Result<ToolNeed, DecisionError> {
        let mut context = ScreeningContext::new(request);
        self.backend.prepare(&mut context);

        let kind = self.ask(&self.tree.kind.stage, &mut context).await?;
        let need = match self.tree.kind.route(&kind) {
            KindRoute::ChatOnly => ToolNeed::NoToolNeeded,
            KindRoute::Unrecognized => {
                tracing::warn!(stage = "kind", label = %kind, "Unrecognized label, assuming no tool");
                ToolNeed::NoToolNeeded
            }
            KindRoute::Information => {
                let stage = &self.tree.information;
                let label = self.ask(&stage.stage, &mut context).await?;
                stage.verdict(&label)
            }
            KindRoute::Action => {
                let stage = &self.tree.action;
                let label = self.ask(&stage.stage, &mut context).await?;
                stage.verdict(&label)
            }
        };

        tracing::info!(
            backend = self.backend.name(),
            tool_needed = need.is_required(),
            "Screening finished"
        );
        Ok(need)
    }

    /// `true` when the request needs a tool.
    pub async fn requires_tool(&self, request: &str) -> Result<bool, DecisionError> {
        Ok(self.screen(request).await?.is_required())
    }

    async fn ask(&self, stage: &Stage, context: &mut ScreeningContext) -> Result<String, DecisionError> {
        let stage_id = format!("screening.{}", stage.name);
        let label = guard(&stage_id, self.backend.ask(stage, context)).await?;
        tracing::debug!(stage = stage.name, label = %label, "Stage answered");
        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedClassifier, ScriptedGenerator, backend_down, ok};

    fn cascade_screener(classifier: Arc<ScriptedClassifier>) -> IntentScreener {
        let classifier: Arc<dyn Classifier> = classifier;
        IntentScreener::from_config(&ScreeningConfig::default(), Some(classifier), None).unwrap()
    }

    fn guided_screener(generator: Arc<ScriptedGenerator>) -> IntentScreener {
        let config = ScreeningConfig {
            strategy: ScreeningStrategy::Guided,
            ..ScreeningConfig::default()
        };
        let generator: Arc<dyn ConstrainedGenerator> = generator;
        IntentScreener::from_config(&config, None, Some(generator)).unwrap()
    }

    #[tokio::test]
    async fn chat_only_kind_stops_after_one_call() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![ok("greeting")]));
        let screener = cascade_screener(classifier.clone());
        assert!(!screener.requires_tool("hello there").await.unwrap());
        assert_eq!(classifier.calls().len(), 1);
    }

    #[tokio::test]
    async fn information_branch_uses_information_labels() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![ok("question"), ok("current time")]));
        let screener = cascade_screener(classifier.clone());
        assert!(screener.requires_tool("what time is it?").await.unwrap());

        let calls = classifier.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].contains(&"current time".to_string()));
    }

    #[tokio::test]
    async fn action_branch_chat_only_answer() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![ok("command"), ok("translation")]));
        let screener = cascade_screener(classifier.clone());
        assert!(!screener.requires_tool("translate 'hola'").await.unwrap());
        assert!(classifier.calls()[1].contains(&"carrying out a task on your device".to_string()));
    }

    #[tokio::test]
    async fn action_branch_task_answer() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![
            ok("request"),
            ok("carrying out a task on your device"),
        ]));
        assert!(cascade_screener(classifier).requires_tool("open my downloads").await.unwrap());
    }

    #[tokio::test]
    async fn unrecognized_kind_is_no_tool() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![ok("sonnet")]));
        let screener = cascade_screener(classifier.clone());
        assert_eq!(screener.screen("...").await.unwrap(), ToolNeed::NoToolNeeded);
        assert_eq!(classifier.calls().len(), 1);
    }

    #[tokio::test]
    async fn backend_failure_is_inference_failed() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![ok("question"), backend_down()]));
        let err = cascade_screener(classifier).screen("weather?").await.unwrap_err();
        match err {
            DecisionError::InferenceFailed { stage, .. } => assert_eq!(stage, "screening.information"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn repeated_calls_agree() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![
            ok("issue"),
            ok("up-to-date news"),
            ok("issue"),
            ok("up-to-date news"),
        ]));
        let screener = cascade_screener(classifier);
        let first = screener.requires_tool("any news?").await.unwrap();
        let second = screener.requires_tool("any news?").await.unwrap();
        assert_eq!(first, second);
        assert!(first);
    }

    #[tokio::test]
    async fn guided_information_branch() {
        let generator = Arc::new(ScriptedGenerator::choices(&["an issue", "current weather"]));
        let screener = guided_screener(generator.clone());
        assert!(screener.requires_tool("is it raining in Oslo?").await.unwrap());

        let options = generator.option_sets();
        assert_eq!(options[0], vec!["a question", "a command", "a statement", "an issue", "a description"]);
        assert!(options[1].contains(&"current weather".to_string()));
    }

    #[tokio::test]
    async fn guided_command_branch_needs_device_task() {
        let generator = Arc::new(ScriptedGenerator::choices(&["a command", "writing a text-response"]));
        assert!(!guided_screener(generator).requires_tool("write a haiku").await.unwrap());

        let generator = Arc::new(ScriptedGenerator::choices(&[
            "a statement",
            "carrying out a task on your device",
        ]));
        assert!(guided_screener(generator).requires_tool("I need my volume muted").await.unwrap());
    }

    #[tokio::test]
    async fn strategies_agree_on_same_answers() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![ok("question"), ok("latest information")]));
        let generator = Arc::new(ScriptedGenerator::choices(&["a question", "latest information"]));
        let request = "what's the latest on the launch?";
        assert_eq!(
            cascade_screener(classifier).screen(request).await.unwrap(),
            guided_screener(generator).screen(request).await.unwrap()
        );
    }

    #[test]
    fn missing_backend_is_configuration_error() {
        let result = IntentScreener::from_config(&ScreeningConfig::default(), None, None);
        assert!(matches!(result, Err(DecisionError::InvalidConfiguration(_))));
    }
}
