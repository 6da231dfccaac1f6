//! Shared scripted collaborators for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use toolwise_core::chooser::{ChoiceRequest, Chooser};
use toolwise_core::error::{ChooserError, InferenceError};
use toolwise_core::inference::{Classifier, ConstrainedGenerator};
use toolwise_core::search::{SimilaritySearch, ToolCandidate};
use toolwise_core::transcript::Transcript;

pub type Scripted = Result<String, InferenceError>;

pub fn ok(text: &str) -> Scripted {
    Ok(text.to_string())
}

pub fn backend_down() -> Scripted {
    Err(InferenceError::Backend("connection refused".into()))
}

/// A classifier that returns scripted top labels in sequence.
///
/// Panics if more calls are made than answers provided.
pub struct ScriptedClassifier {
    answers: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedClassifier {
    pub fn new(answers: Vec<Scripted>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The label sets each call was made with.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Classifier for ScriptedClassifier {
    fn name(&self) -> &str {
        "scripted_classifier"
    }

    async fn classify(&self, _text: &str, candidate_labels: &[String]) -> Result<Vec<String>, InferenceError> {
        self.calls.lock().unwrap().push(candidate_labels.to_vec());
        let next = self.answers.lock().unwrap().pop_front();
        match next {
            Some(answer) => answer.map(|top| {
                let mut ranked = vec![top.clone()];
                ranked.extend(candidate_labels.iter().filter(|l| **l != top).cloned());
                ranked
            }),
            None => panic!("ScriptedClassifier: no more answers"),
        }
    }
}

/// A generator that replays scripted choices and free-text answers.
pub struct ScriptedGenerator {
    choices: Mutex<VecDeque<Scripted>>,
    texts: Mutex<VecDeque<Scripted>>,
    option_sets: Mutex<Vec<Vec<String>>>,
    transcripts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(choices: Vec<Scripted>, texts: Vec<Scripted>) -> Self {
        Self {
            choices: Mutex::new(choices.into()),
            texts: Mutex::new(texts.into()),
            option_sets: Mutex::new(Vec::new()),
            transcripts: Mutex::new(Vec::new()),
        }
    }

    pub fn choices(choices: &[&str]) -> Self {
        Self::new(choices.iter().map(|c| ok(c)).collect(), Vec::new())
    }

    /// Options offered to each `choose_one` call.
    pub fn option_sets(&self) -> Vec<Vec<String>> {
        self.option_sets.lock().unwrap().clone()
    }

    /// Transcript as seen by each call, in order.
    pub fn transcripts(&self) -> Vec<String> {
        self.transcripts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ConstrainedGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted_generator"
    }

    async fn choose_one(&self, transcript: &Transcript, options: &[String]) -> Result<String, InferenceError> {
        self.transcripts.lock().unwrap().push(transcript.as_str().to_string());
        self.option_sets.lock().unwrap().push(options.to_vec());
        let next = self.choices.lock().unwrap().pop_front();
        next.unwrap_or_else(|| panic!("ScriptedGenerator: no more choices"))
    }

    async fn generate_free_text(&self, transcript: &Transcript, _stop_marker: &str) -> Result<String, InferenceError> {
        self.transcripts.lock().unwrap().push(transcript.as_str().to_string());
        let next = self.texts.lock().unwrap().pop_front();
        next.unwrap_or_else(|| panic!("ScriptedGenerator: no more texts"))
    }
}

/// A chooser that always answers the same way and records what it was shown.
pub struct ScriptedChooser {
    answer: Option<String>,
    requests: Mutex<Vec<ChoiceRequest>>,
}

impl ScriptedChooser {
    pub fn answering(answer: Option<&str>) -> Self {
        Self {
            answer: answer.map(str::to_string),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChoiceRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Chooser for ScriptedChooser {
    fn choose(&self, request: &ChoiceRequest) -> Result<Option<String>, ChooserError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.answer.clone())
    }
}

/// A search backend with a fixed result list.
pub struct StaticSearch {
    pub candidates: Vec<ToolCandidate>,
}

#[async_trait::async_trait]
impl SimilaritySearch for StaticSearch {
    async fn search(&self, _query: &str, top_n: usize) -> Result<Vec<ToolCandidate>, InferenceError> {
        Ok(self.candidates.iter().take(top_n).cloned().collect())
    }
}
