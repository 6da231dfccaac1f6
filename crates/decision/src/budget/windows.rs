use std::collections::HashMap;
use toolwise_core::error::DecisionError;

/// Built-in context windows (prompt + reply tokens).
const BUILTIN_WINDOWS: &[(&str, usize)] = &[
    ("gpt-4o", 128_000),
    ("gpt-4-turbo", 128_000),
    ("gpt-4-turbo-preview", 128_000),
    ("gpt-4-0125-preview", 128_000),
    ("gpt-4-1106-preview", 128_000),
    ("gpt-3.5-turbo", 16_385),
    ("gpt-3.5-turbo-16k", 16_385),
    ("gpt-4", 8_192),
    ("gpt-4-32k", 32_768),
];

/// Model name → context window. Lookups are exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindows {
    table: HashMap<String, usize>,
}

impl Default for ContextWindows {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ContextWindows {
    pub fn builtin() -> Self {
        Self {
            table: BUILTIN_WINDOWS
                .iter()
                .map(|(model, window)| (model.to_string(), *window))
                .collect(),
        }
    }

    /// Built-in table with `overrides` replacing or adding entries.
    pub fn with_overrides(overrides: &HashMap<String, usize>) -> Self {
        let mut windows = Self::builtin();
        for (model, window) in overrides {
            windows.insert(model.clone(), *window);
        }
        windows
    }

    pub fn insert(&mut self, model: impl Into<String>, window: usize) {
        self.table.insert(model.into(), window);
    }

    pub fn lookup(&self, model: &str) -> Result<usize, DecisionError> {
        self.table
            .get(model)
            .copied()
            .ok_or_else(|| DecisionError::ModelNotSupported(model.to_string()))
    }

    /// Known models, sorted.
    pub fn models(&self) -> Vec<&str> {
        let mut models: Vec<&str> = self.table.keys().map(String::as_str).collect();
        models.sort_unstable();
        models
    }
}
