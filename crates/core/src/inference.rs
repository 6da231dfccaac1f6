//! Inference backend traits — zero-shot classification and constrained
//! generation.
//!
//! Both are blocking from the decision layer's point of view: each step is
//! awaited before the next one is built, because later questions depend on
//! earlier answers.

use async_trait::async_trait;
use crate::error::InferenceError;
use crate::transcript::Transcript;

/// A zero-shot text classifier.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// A human-readable name for this backend.
    fn name(&self) -> &str;

    /// Rank `candidate_labels` for `text`. The first element is the top label.
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[String],
    ) -> std::result::Result<Vec<String>, InferenceError>;
}

/// A generator that continues a transcript under a constraint.
///
/// The transcript is the accumulated prompt so far; the caller appends each
/// answer to it before asking the next question.
#[async_trait]
pub trait ConstrainedGenerator: Send + Sync {
    /// A human-readable name for this backend.
    fn name(&self) -> &str;

    /// Generate exactly one of `options`.
    async fn choose_one(
        &self,
        transcript: &Transcript,
        options: &[String],
    ) -> std::result::Result<String, InferenceError>;

    /// Generate open text, stopping before `stop_marker`.
    async fn generate_free_text(
        &self,
        transcript: &Transcript,
        stop_marker: &str,
    ) -> std::result::Result<String, InferenceError>;
}
