//! Classifier cascade: each stage is a zero-shot classification of the raw
//! request against that stage's labels.

use async_trait::async_trait;
use std::sync::Arc;
use toolwise_core::error::InferenceError;
use toolwise_core::inference::Classifier;

use super::{ScreeningBackend, ScreeningContext, Stage};

pub struct ClassifierBackend {
    classifier: Arc<dyn Classifier>,
}

impl ClassifierBackend {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl ScreeningBackend for ClassifierBackend {
    fn name(&self) -> &str {
        self.classifier.name()
    }

    async fn ask(&self, stage: &Stage, context: &mut ScreeningContext) -> Result<String, InferenceError> {
        let ranked = self.classifier.classify(&context.request, &stage.labels).await?;
        ranked.into_iter().next().ok_or_else(|| {
            InferenceError::MalformedResponse(format!("classifier returned no labels for {} stage", stage.name))
        })
    }
}
