//! Interactive chooser — asks a human to pick one option.

use crate::error::ChooserError;

/// A single-choice prompt shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRequest {
    pub title: String,
    pub prompt: String,
    /// Values returned on selection.
    pub options: Vec<String>,
    /// Labels shown next to each option; same length as `options`.
    pub descriptions: Vec<String>,
    /// Preselected option.
    pub default: String,
}

/// A blocking single-choice dialog.
pub trait Chooser: Send + Sync {
    /// Returns the chosen option, or `None` if the user cancelled.
    fn choose(&self, request: &ChoiceRequest) -> std::result::Result<Option<String>, ChooserError>;
}
