//! Configuration loading, validation, and management for toolwise.
//!
//! Loads configuration from `~/.toolwise/config.toml` with environment
//! variable overrides. Validates all settings at load time. The resulting
//! value is read-only: components receive the parts they need at
//! construction.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.toolwise/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model used for token accounting and generation
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Intent screening strategy and label sets
    #[serde(default)]
    pub screening: ScreeningConfig,

    /// Tool selection thresholds
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Generation token bounds and tokenizer
    #[serde(default)]
    pub tokens: TokenConfig,

    /// Structured output settings
    #[serde(default)]
    pub structured: StructuredConfig,
}

fn default_model() -> String {
    "gpt-4o".into()
}

// ── Screening ─────────────────────────────────────────────────────────────

/// Which backend drives the screening decision tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreeningStrategy {
    /// Zero-shot classifier over each stage's labels
    Cascade,
    /// Forced-choice Q&A against a constrained generator
    Guided,
}

impl std::str::FromStr for ScreeningStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cascade" => Ok(Self::Cascade),
            "guided" => Ok(Self::Guided),
            other => Err(ConfigError::ValidationError(format!(
                "unknown screening strategy '{other}' (expected cascade or guided)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningConfig {
    #[serde(default = "default_strategy")]
    pub strategy: ScreeningStrategy,

    /// Label sets for the classifier cascade
    #[serde(default = "default_cascade_tree")]
    pub cascade: DecisionTreeConfig,

    /// Label sets for the guided dialogue
    #[serde(default = "default_guided_tree")]
    pub guided: DecisionTreeConfig,
}

fn default_strategy() -> ScreeningStrategy {
    ScreeningStrategy::Cascade
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            cascade: default_cascade_tree(),
            guided: default_guided_tree(),
        }
    }
}

impl ScreeningConfig {
    /// The tree used by the active strategy.
    pub fn active_tree(&self) -> &DecisionTreeConfig {
        match self.strategy {
            ScreeningStrategy::Cascade => &self.cascade,
            ScreeningStrategy::Guided => &self.guided,
        }
    }
}

/// Three-stage screening tree: kind, then information or action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeConfig {
    pub kind: KindStageConfig,
    pub information: BranchStageConfig,
    pub action: BranchStageConfig,
}

/// First stage: what kind of request this is.
///
/// Labels in `chat_only` end screening with no tool. Labels in
/// `information` continue to the information stage; any other known label
/// continues to the action stage. `information` may name labels that are not
/// offered in `labels`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindStageConfig {
    #[serde(default)]
    pub question: String,

    #[serde(default)]
    pub answer_prefix: String,

    pub labels: Vec<String>,

    #[serde(default)]
    pub chat_only: Vec<String>,

    #[serde(default)]
    pub information: Vec<String>,
}

/// A second-stage question.
///
/// Exactly one of `chat_only` (a tool is needed unless the answer is listed)
/// or `tool_required` (a tool is needed only if the answer is listed) must be
/// set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchStageConfig {
    #[serde(default)]
    pub question: String,

    #[serde(default)]
    pub answer_prefix: String,

    pub labels: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_only: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_required: Option<Vec<String>>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const INFORMATION_LABELS: &[&str] = &[
    "greeting",
    "common knowledge",
    "math",
    "published content",
    "trained knowledge",
    "historical records",
    "programming knowledge",
    "religious knowledge",
    "insights obtainable from literature",
    "textbook content",
    "evolving data",
    "recent updates",
    "latest information",
    "current time",
    "current weather",
    "up-to-date news",
    "information specific to your device",
    "information unknown to me",
];

/// Information categories that only an external tool can answer.
const INFORMATION_TOOL_LABELS: &[&str] = &[
    "evolving data",
    "recent updates",
    "latest information",
    "current time",
    "current weather",
    "up-to-date news",
    "information specific to your device",
    "information unknown to me",
];

const ACTION_LABELS: &[&str] = &[
    "greeting",
    "calculation",
    "translation",
    "writing a text-response",
    "carrying out a task on your device",
];

const ACTION_TOOL_LABELS: &[&str] = &["carrying out a task on your device"];

fn information_chat_only() -> Vec<String> {
    INFORMATION_LABELS
        .iter()
        .filter(|l| !INFORMATION_TOOL_LABELS.contains(l))
        .map(|l| l.to_string())
        .collect()
}

fn action_chat_only() -> Vec<String> {
    ACTION_LABELS
        .iter()
        .filter(|l| !ACTION_TOOL_LABELS.contains(l))
        .map(|l| l.to_string())
        .collect()
}

fn default_cascade_tree() -> DecisionTreeConfig {
    DecisionTreeConfig {
        kind: KindStageConfig {
            question: "What kind of request is this?".into(),
            answer_prefix: "The request is".into(),
            labels: strings(&[
                "greeting",
                "small talk",
                "question",
                "issue",
                "description",
                "command",
                "request",
                "statement",
            ]),
            chat_only: strings(&["greeting", "small talk"]),
            information: strings(&["question", "issue", "description"]),
        },
        information: BranchStageConfig {
            question: "What is the request about?".into(),
            answer_prefix: "The request is about".into(),
            labels: strings(INFORMATION_LABELS),
            chat_only: Some(information_chat_only()),
            tool_required: None,
        },
        action: BranchStageConfig {
            question: "What does the request ask for?".into(),
            answer_prefix: "The request asks for".into(),
            labels: strings(ACTION_LABELS),
            chat_only: Some(action_chat_only()),
            tool_required: None,
        },
    }
}

fn default_guided_tree() -> DecisionTreeConfig {
    DecisionTreeConfig {
        kind: KindStageConfig {
            question: "Is the given request formulated like a greeting, a question, a command, a statement, an issue, a description?".into(),
            answer_prefix: "The given request is formulated like".into(),
            labels: strings(&["a question", "a command", "a statement", "an issue", "a description"]),
            chat_only: Vec::new(),
            information: strings(&["a greeting", "a question", "an issue", "a description"]),
        },
        information: BranchStageConfig {
            question: "What is the request about?".into(),
            answer_prefix: "The request is about".into(),
            labels: strings(INFORMATION_LABELS),
            chat_only: None,
            tool_required: Some(strings(INFORMATION_TOOL_LABELS)),
        },
        action: BranchStageConfig {
            question: "Does the given request ask for generating a text-response or carrying out a task on your device?".into(),
            answer_prefix: "The given request asks for".into(),
            labels: strings(ACTION_LABELS),
            chat_only: None,
            tool_required: Some(strings(ACTION_TOOL_LABELS)),
        },
    }
}

// ── Selection ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Closest distance above which no tool is considered relevant
    #[serde(default = "default_tool_dependence")]
    pub tool_dependence: f32,

    /// Closest distance at or below which the top candidate is taken without asking
    #[serde(default = "default_auto_selection_threshold")]
    pub auto_selection_threshold: f32,

    /// How many candidates to retrieve
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_tool_dependence() -> f32 {
    0.8
}
fn default_auto_selection_threshold() -> f32 {
    0.5
}
fn default_top_n() -> usize {
    5
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            tool_dependence: default_tool_dependence(),
            auto_selection_threshold: default_auto_selection_threshold(),
            top_n: default_top_n(),
        }
    }
}

// ── Tokens ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// ~4 bytes per token estimate
    Heuristic,
    /// Exact BPE counts (requires the `tiktoken` feature)
    Tiktoken,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Floor for the generation budget
    #[serde(default = "default_min_tokens")]
    pub min_tokens: usize,

    /// Ceiling for the generation budget
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    #[serde(default = "default_tokenizer")]
    pub tokenizer: TokenizerKind,

    /// Context windows that override or extend the built-in table
    #[serde(default)]
    pub context_windows: HashMap<String, usize>,
}

fn default_min_tokens() -> usize {
    256
}
fn default_max_tokens() -> usize {
    4096
}
fn default_tokenizer() -> TokenizerKind {
    TokenizerKind::Heuristic
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            min_tokens: default_min_tokens(),
            max_tokens: default_max_tokens(),
            tokenizer: default_tokenizer(),
            context_windows: HashMap::new(),
        }
    }
}

// ── Structured output ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredConfig {
    /// Marker that ends open-text answers
    #[serde(default = "default_stop_marker")]
    pub stop_marker: String,

    #[serde(default = "default_true")]
    pub include_system_message: bool,

    /// Emit records as a JSON object string
    #[serde(default)]
    pub json_output: bool,
}

fn default_stop_marker() -> String {
    "<".into()
}
fn default_true() -> bool {
    true
}

impl Default for StructuredConfig {
    fn default() -> Self {
        Self {
            stop_marker: default_stop_marker(),
            include_system_message: true,
            json_output: false,
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from the default path (~/.toolwise/config.toml).
    ///
    /// Environment overrides:
    /// - `TOOLWISE_MODEL` — default model
    /// - `TOOLWISE_STRATEGY` — `cascade` or `guided`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(model) = std::env::var("TOOLWISE_MODEL") {
            config.default_model = model;
        }

        if let Ok(strategy) = std::env::var("TOOLWISE_STRATEGY") {
            config.screening.strategy = strategy.parse()?;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".toolwise")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_model.trim().is_empty() {
            return Err(ConfigError::ValidationError("default_model must not be empty".into()));
        }

        let tokens = &self.tokens;
        if tokens.min_tokens == 0 {
            return Err(ConfigError::ValidationError("tokens.min_tokens must be > 0".into()));
        }
        if tokens.min_tokens > tokens.max_tokens {
            return Err(ConfigError::ValidationError(format!(
                "tokens.min_tokens ({}) must not exceed tokens.max_tokens ({})",
                tokens.min_tokens, tokens.max_tokens
            )));
        }
        if let Some((model, _)) = tokens.context_windows.iter().find(|(_, w)| **w == 0) {
            return Err(ConfigError::ValidationError(format!(
                "context window for '{model}' must be > 0"
            )));
        }

        let selection = &self.selection;
        check_unit_interval("selection.tool_dependence", selection.tool_dependence)?;
        check_unit_interval(
            "selection.auto_selection_threshold",
            selection.auto_selection_threshold,
        )?;
        if selection.top_n == 0 {
            return Err(ConfigError::ValidationError("selection.top_n must be > 0".into()));
        }

        if self.structured.stop_marker.is_empty() {
            return Err(ConfigError::ValidationError(
                "structured.stop_marker must not be empty".into(),
            ));
        }

        self.screening.cascade.validate("screening.cascade")?;
        self.screening.guided.validate("screening.guided")?;
        Ok(())
    }

    /// Apply a tool-dependence entry of the form `"<dependence>[!<threshold>]"`.
    ///
    /// Both values must lie in `[0, 1]`. Without an explicit threshold the
    /// auto-selection threshold becomes 5/8 of the dependence, rounded to
    /// five decimals.
    pub fn apply_tool_dependence(&mut self, entry: &str) -> Result<(), ConfigError> {
        let (dependence, threshold) = match entry.split_once('!') {
            Some((d, t)) => (d, Some(t)),
            None => (entry, None),
        };

        let dependence = parse_unit_interval("tool dependence", dependence)?;
        let threshold = match threshold {
            Some(t) => parse_unit_interval("auto selection threshold", t)?,
            None => ((dependence as f64 * 5.0 / 8.0 * 1e5).round() / 1e5) as f32,
        };

        self.selection.tool_dependence = dependence;
        self.selection.auto_selection_threshold = threshold;
        tracing::info!(
            tool_dependence = dependence,
            auto_selection_threshold = threshold,
            "Tool dependence updated"
        );
        Ok(())
    }

    /// Generate a default config TOML string (for `config init`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl DecisionTreeConfig {
    fn validate(&self, scope: &str) -> Result<(), ConfigError> {
        if self.kind.labels.is_empty() {
            return Err(ConfigError::ValidationError(format!("{scope}.kind.labels must not be empty")));
        }
        if let Some(label) = self.kind.chat_only.iter().find(|l| self.kind.information.contains(l)) {
            return Err(ConfigError::ValidationError(format!(
                "{scope}.kind: '{label}' is both chat_only and information"
            )));
        }
        self.information.validate(&format!("{scope}.information"))?;
        self.action.validate(&format!("{scope}.action"))
    }
}

impl BranchStageConfig {
    fn validate(&self, scope: &str) -> Result<(), ConfigError> {
        if self.labels.is_empty() {
            return Err(ConfigError::ValidationError(format!("{scope}.labels must not be empty")));
        }
        match (&self.chat_only, &self.tool_required) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            _ => Err(ConfigError::ValidationError(format!(
                "{scope}: set exactly one of chat_only or tool_required"
            ))),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            screening: ScreeningConfig::default(),
            selection: SelectionConfig::default(),
            tokens: TokenConfig::default(),
            structured: StructuredConfig::default(),
        }
    }
}

fn check_unit_interval(name: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{name} must be between 0.0 and 1.0 (got {value})"
        )))
    }
}

fn parse_unit_interval(name: &str, raw: &str) -> Result<f32, ConfigError> {
    let value: f32 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::ValidationError(format!("{name} '{raw}' is not a number")))?;
    check_unit_interval(name, value)?;
    Ok(value)
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
