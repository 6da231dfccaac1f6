//! The screening decision tree, independent of how stages are answered.

use toolwise_config::{BranchStageConfig, DecisionTreeConfig, KindStageConfig};
use toolwise_core::error::DecisionError;

/// Outcome of screening a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolNeed {
    NoToolNeeded,
    ToolNeeded,
}

impl ToolNeed {
    pub fn is_required(self) -> bool {
        matches!(self, ToolNeed::ToolNeeded)
    }
}

/// One question of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Short stage id used in logs and errors ("kind", "information", "action").
    pub name: &'static str,
    pub question: String,
    pub answer_prefix: String,
    pub labels: Vec<String>,
}

impl Stage {
    pub fn offers(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Where a kind answer leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindRoute {
    ChatOnly,
    Information,
    Action,
    Unrecognized,
}

#[derive(Debug, Clone)]
pub struct KindStage {
    pub stage: Stage,
    pub chat_only: Vec<String>,
    pub information: Vec<String>,
}

impl KindStage {
    pub fn route(&self, label: &str) -> KindRoute {
        if self.chat_only.iter().any(|l| l == label) {
            KindRoute::ChatOnly
        } else if self.information.iter().any(|l| l == label) {
            KindRoute::Information
        } else if self.stage.offers(label) {
            KindRoute::Action
        } else {
            KindRoute::Unrecognized
        }
    }
}

/// How a second-stage answer maps to a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelPolicy {
    /// A tool is needed unless the answer is one of these.
    ChatOnly(Vec<String>),
    /// A tool is needed only if the answer is one of these.
    ToolRequired(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct BranchStage {
    pub stage: Stage,
    pub policy: LabelPolicy,
}

impl BranchStage {
    /// Verdict for an answer. Answers outside the stage's labels never
    /// require a tool.
    pub fn verdict(&self, label: &str) -> ToolNeed {
        if !self.stage.offers(label) {
            tracing::warn!(stage = self.stage.name, label, "Unrecognized label, assuming no tool");
            return ToolNeed::NoToolNeeded;
        }
        let required = match &self.policy {
            LabelPolicy::ChatOnly(chat_only) => !chat_only.iter().any(|l| l == label),
            LabelPolicy::ToolRequired(tool_required) => tool_required.iter().any(|l| l == label),
        };
        if required {
            ToolNeed::ToolNeeded
        } else {
            ToolNeed::NoToolNeeded
        }
    }
}

/// kind → information | action.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    pub kind: KindStage,
    pub information: BranchStage,
    pub action: BranchStage,
}

impl DecisionTree {
    pub fn from_config(config: &DecisionTreeConfig) -> Result<Self, DecisionError> {
        Ok(Self {
            kind: kind_stage(&config.kind),
            information: branch_stage("information", &config.information)?,
            action: branch_stage("action", &config.action)?,
        })
    }
}

fn kind_stage(config: &KindStageConfig) -> KindStage {
    KindStage {
        stage: Stage {
            name: "kind",
            question: config.question.clone(),
            answer_prefix: config.answer_prefix.clone(),
            labels: config.labels.clone(),
        },
        chat_only: config.chat_only.clone(),
        information: config.information.clone(),
    }
}

fn branch_stage(name: &'static str, config: &BranchStageConfig) -> Result<BranchStage, DecisionError> {
    let policy = match (&config.chat_only, &config.tool_required) {
        (Some(chat_only), None) => LabelPolicy::ChatOnly(chat_only.clone()),
        (None, Some(tool_required)) => LabelPolicy::ToolRequired(tool_required.clone()),
        _ => {
            return Err(DecisionError::InvalidConfiguration(format!(
                "{name} stage needs exactly one of chat_only or tool_required"
            )));
        }
    };
    Ok(BranchStage {
        stage: Stage {
            name,
            question: config.question.clone(),
            answer_prefix: config.answer_prefix.clone(),
            labels: config.labels.clone(),
        },
        policy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolwise_config::ScreeningConfig;

    fn cascade() -> DecisionTree {
        DecisionTree::from_config(&ScreeningConfig::default().cascade).unwrap()
    }

    fn guided() -> DecisionTree {
        DecisionTree::from_config(&ScreeningConfig::default().guided).unwrap()
    }

    #[test]
    fn kind_routes() {
        let tree = cascade();
        assert_eq!(tree.kind.route("greeting"), KindRoute::ChatOnly);
        assert_eq!(tree.kind.route("question"), KindRoute::Information);
        assert_eq!(tree.kind.route("command"), KindRoute::Action);
        assert_eq!(tree.kind.route("poem"), KindRoute::Unrecognized);
    }

    #[test]
    fn guided_greeting_takes_information_branch() {
        assert_eq!(guided().kind.route("a greeting"), KindRoute::Information);
    }

    #[test]
    fn chat_only_policy() {
        let tree = cascade();
        assert_eq!(tree.information.verdict("current weather"), ToolNeed::ToolNeeded);
        assert_eq!(tree.information.verdict("math"), ToolNeed::NoToolNeeded);
        assert_eq!(tree.action.verdict("translation"), ToolNeed::NoToolNeeded);
    }

    #[test]
    fn tool_required_policy() {
        let tree = guided();
        assert_eq!(tree.information.verdict("up-to-date news"), ToolNeed::ToolNeeded);
        assert_eq!(tree.information.verdict("textbook content"), ToolNeed::NoToolNeeded);
        assert_eq!(
            tree.action.verdict("carrying out a task on your device"),
            ToolNeed::ToolNeeded
        );
        assert_eq!(tree.action.verdict("calculation"), ToolNeed::NoToolNeeded);
    }

    #[test]
    fn unknown_branch_label_is_safe_default() {
        // Not in labels, so not in chat_only either; still no tool.
        assert_eq!(cascade().information.verdict("astrology"), ToolNeed::NoToolNeeded);
    }

    #[test]
    fn ambiguous_policy_rejected() {
        let mut config = ScreeningConfig::default().cascade;
        config.action.tool_required = Some(vec![]);
        assert!(matches!(
            DecisionTree::from_config(&config),
            Err(DecisionError::InvalidConfiguration(_))
        ));
    }
}
