//! Failure policy for single inference steps.
//!
//! A classification, generation or search call that fails is logged and
//! turned into an [`InvalidStep`] marker. The marker never becomes data: the
//! component that issued the step stops and reports one
//! `DecisionError::InferenceFailed` upward.

use std::future::Future;
use toolwise_core::error::{DecisionError, InferenceError};

/// Sentinel text of a step that produced no valid result.
pub const INVALID_MARKER: &str = "[INVALID]";

/// A step whose backend call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStep {
    pub stage: String,
    pub reason: String,
}

impl std::fmt::Display for InvalidStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(INVALID_MARKER)
    }
}

impl From<InvalidStep> for DecisionError {
    fn from(step: InvalidStep) -> Self {
        DecisionError::InferenceFailed {
            stage: step.stage,
            reason: step.reason,
        }
    }
}

/// Await a collaborator call for `stage`, converting failure into an
/// [`InvalidStep`].
pub async fn guard<T, F>(stage: &str, call: F) -> Result<T, InvalidStep>
where
    F: Future<Output = Result<T, InferenceError>>,
{
    match call.await {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::error!(stage, error = %e, "Inference step failed");
            Err(InvalidStep {
                stage: stage.to_string(),
                reason: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn success_passes_through() {
        let value = guard("test", async { Ok::<_, InferenceError>(7) }).await;
        assert_eq!(value, Ok(7));
    }

    #[tokio::test]
    async fn failure_becomes_invalid_marker() {
        let step = guard("screening.kind", async {
            Err::<u8, _>(InferenceError::Backend("timeout".into()))
        })
        .await
        .unwrap_err();
        assert_eq!(step.to_string(), INVALID_MARKER);
        assert_eq!(step.stage, "screening.kind");

        let err: DecisionError = step.into();
        assert!(matches!(err, DecisionError::InferenceFailed { ref reason, .. } if reason.contains("timeout")));
    }
}
