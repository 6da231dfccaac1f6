//! Tool selection among retrieved candidates.
//!
//! The closest candidate is taken without asking when its distance is within
//! the auto-selection threshold. Otherwise the user picks from the
//! candidates plus a trailing "more ..." entry that opens the full catalog.

pub mod generative;

pub use generative::GenerativeToolPicker;

use std::sync::Arc;
use toolwise_config::SelectionConfig;
use toolwise_core::chooser::{ChoiceRequest, Chooser};
use toolwise_core::error::DecisionError;
use toolwise_core::search::ToolCandidate;

/// Label of the synthetic option placed after the candidates.
pub const MORE_OPTION: &str = "more ...";

/// Outcome of distance-based selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionDecision {
    /// The nearest candidate was accepted without asking.
    Auto,
    /// The user picked this index; `candidates.len()` means "more ...".
    Manual(usize),
    Cancelled,
}

impl SelectionDecision {
    pub fn index(self) -> Option<usize> {
        match self {
            SelectionDecision::Auto => Some(0),
            SelectionDecision::Manual(index) => Some(index),
            SelectionDecision::Cancelled => None,
        }
    }
}

pub struct ToolSelector {
    threshold: f32,
    chooser: Arc<dyn Chooser>,
}

impl ToolSelector {
    pub fn new(threshold: f32, chooser: Arc<dyn Chooser>) -> Self {
        Self { threshold, chooser }
    }

    pub fn from_config(config: &SelectionConfig, chooser: Arc<dyn Chooser>) -> Self {
        Self::new(config.auto_selection_threshold, chooser)
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Pick a candidate by distance, asking the user when the closest match
    /// is not close enough. Candidate order is kept as given.
    pub fn select_by_distance(
        &self,
        candidates: &[ToolCandidate],
        closest: f32,
    ) -> Result<SelectionDecision, DecisionError> {
        if closest <= self.threshold {
            if candidates.is_empty() {
                tracing::warn!(closest, "Nothing to auto-select from");
                return Ok(SelectionDecision::Cancelled);
            }
            tracing::info!(tool = %candidates[0].name, closest, threshold = self.threshold, "Tool auto-selected");
            return Ok(SelectionDecision::Auto);
        }

        let options: Vec<String> = (0..=candidates.len()).map(|i| i.to_string()).collect();
        let mut descriptions: Vec<String> = candidates.iter().map(|c| c.name.replace('_', " ")).collect();
        descriptions.push(MORE_OPTION.to_string());

        let request = ChoiceRequest {
            title: "Tool Selection".into(),
            prompt: "Select a tool:".into(),
            default: options[0].clone(),
            options,
            descriptions,
        };

        let decision = match self.chooser.choose(&request)? {
            None => SelectionDecision::Cancelled,
            Some(answer) => match answer.trim().parse::<usize>() {
                Ok(index) if index <= candidates.len() => SelectionDecision::Manual(index),
                _ => {
                    tracing::warn!(answer = %answer, "Chooser returned an option that was not offered");
                    SelectionDecision::Cancelled
                }
            },
        };
        tracing::info!(?decision, closest, threshold = self.threshold, "Tool selection finished");
        Ok(decision)
    }

    /// Let the user pick any tool by name.
    pub fn select_from_catalog(&self, names: &[&str]) -> Result<Option<String>, DecisionError> {
        let options: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        let request = ChoiceRequest {
            title: "Tool Selection".into(),
            prompt: "Select a tool:".into(),
            descriptions: names.iter().map(|n| n.replace('_', " ")).collect(),
            default: options.first().cloned().unwrap_or_default(),
            options,
        };

        let chosen = match self.chooser.choose(&request)? {
            Some(name) if request.options.contains(&name) => Some(name),
            Some(name) => {
                tracing::warn!(answer = %name, "Chooser returned a tool outside the catalog");
                None
            }
            None => None,
        };
        tracing::info!(tool = ?chosen, "Catalog selection finished");
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedChooser;

    fn candidates() -> Vec<ToolCandidate> {
        vec![ToolCandidate::new("A", 0.1), ToolCandidate::new("B", 0.3)]
    }

    fn build(threshold: f32, answer: Option<&str>) -> (ToolSelector, Arc<ScriptedChooser>) {
        let chooser = Arc::new(ScriptedChooser::answering(answer));
        (ToolSelector::new(threshold, chooser.clone()), chooser)
    }

    #[test]
    fn close_match_is_auto_selected() {
        let (selector, chooser) = build(0.2, Some("1"));
        let decision = selector.select_by_distance(&candidates(), 0.1).unwrap();
        assert_eq!(decision, SelectionDecision::Auto);
        assert_eq!(decision.index(), Some(0));
        assert!(chooser.requests().is_empty());
    }

    #[test]
    fn threshold_is_inclusive() {
        let (selector, chooser) = build(0.1, None);
        assert_eq!(selector.select_by_distance(&candidates(), 0.1).unwrap(), SelectionDecision::Auto);
        assert!(chooser.requests().is_empty());
    }

    #[test]
    fn distant_match_asks_once_with_more_option() {
        let (selector, chooser) = build(0.05, Some("1"));
        let decision = selector.select_by_distance(&candidates(), 0.1).unwrap();
        assert_eq!(decision, SelectionDecision::Manual(1));

        let requests = chooser.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].options, vec!["0", "1", "2"]);
        assert_eq!(requests[0].descriptions, vec!["A", "B", MORE_OPTION]);
        assert_eq!(requests[0].default, "0");
    }

    #[test]
    fn more_option_index_is_candidate_count() {
        let (selector, _) = build(0.05, Some("2"));
        assert_eq!(selector.select_by_distance(&candidates(), 0.1).unwrap().index(), Some(2));
    }

    #[test]
    fn cancel_is_not_an_error() {
        let (selector, _) = build(0.05, None);
        assert_eq!(selector.select_by_distance(&candidates(), 0.1).unwrap(), SelectionDecision::Cancelled);
    }

    #[test]
    fn out_of_range_answer_is_cancelled() {
        let (selector, _) = build(0.05, Some("7"));
        assert_eq!(selector.select_by_distance(&candidates(), 0.1).unwrap(), SelectionDecision::Cancelled);
    }

    #[test]
    fn underscores_shown_as_spaces() {
        let (selector, chooser) = build(0.0, Some("0"));
        let found = vec![ToolCandidate::new("get_current_weather", 0.4)];
        selector.select_by_distance(&found, 0.4).unwrap();
        assert_eq!(chooser.requests()[0].descriptions[0], "get current weather");
    }

    #[test]
    fn empty_candidates_still_offer_more() {
        let (selector, chooser) = build(0.1, Some("0"));
        assert_eq!(selector.select_by_distance(&[], 0.9).unwrap(), SelectionDecision::Manual(0));
        assert_eq!(chooser.requests()[0].options, vec!["0"]);

        let (selector, chooser) = build(0.5, Some("0"));
        assert_eq!(selector.select_by_distance(&[], 0.1).unwrap(), SelectionDecision::Cancelled);
        assert!(chooser.requests().is_empty());
    }

    #[test]
    fn catalog_selection_returns_name() {
        let (selector, chooser) = build(0.5, Some("web_search"));
        let chosen = selector.select_from_catalog(&["clock", "web_search"]).unwrap();
        assert_eq!(chosen.as_deref(), Some("web_search"));
        assert_eq!(chooser.requests()[0].options, vec!["clock", "web_search"]);
    }

    #[test]
    fn catalog_selection_cancel_and_unknown() {
        let (selector, _) = build(0.5, None);
        assert_eq!(selector.select_from_catalog(&["clock"]).unwrap(), None);

        let (selector, _) = build(0.5, Some("teleport"));
        assert_eq!(selector.select_from_catalog(&["clock"]).unwrap(), None);
    }
}
