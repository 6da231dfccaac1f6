//! Similarity search over the tool catalog.
//!
//! Retrieval itself (embeddings, nearest-neighbour index) belongs to the
//! backend; the decision layer only consumes the ranked output.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::InferenceError;

/// A tool ranked by distance to the user request. Smaller is closer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCandidate {
    pub name: String,
    pub distance: f32,
}

impl ToolCandidate {
    pub fn new(name: impl Into<String>, distance: f32) -> Self {
        Self {
            name: name.into(),
            distance: distance.max(0.0),
        }
    }
}

/// Nearest-neighbour lookup of tools for a query.
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    /// Up to `top_n` candidates, ascending by distance.
    async fn search(
        &self,
        query: &str,
        top_n: usize,
    ) -> std::result::Result<Vec<ToolCandidate>, InferenceError>;
}
