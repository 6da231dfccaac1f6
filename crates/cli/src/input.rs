//! JSON inputs for the commands.

use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;
use toolwise_core::message::{Conversation, PromptMessage};
use toolwise_core::search::ToolCandidate;
use toolwise_core::tool::{ToolCatalog, ToolSchema};
use toolwise_core::{Error, Result};

/// Read a file, or stdin when `path` is `-`.
pub fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path).map_err(|e| Error::input(path.display().to_string(), e))
}

fn parse<T: DeserializeOwned>(path: &Path, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| Error::input(path.display().to_string(), e))
}

/// A conversation given either as a bare message list or a full object.
pub fn load_conversation(path: &Path) -> Result<Conversation> {
    let text = read_source(path)?;
    parse_conversation(&text).map_err(|e| Error::input(path.display().to_string(), e))
}

pub fn parse_conversation(text: &str) -> std::result::Result<Conversation, serde_json::Error> {
    match serde_json::from_str::<Vec<PromptMessage>>(text) {
        Ok(messages) => Ok(Conversation::from_messages(messages)),
        Err(_) => serde_json::from_str(text),
    }
}

/// Tool schemas given as a list or as a single schema.
pub fn load_catalog(path: &Path) -> Result<ToolCatalog> {
    let text = read_source(path)?;
    if text.trim_start().starts_with('{') {
        let schema: ToolSchema = parse(path, &text)?;
        return Ok(ToolCatalog::new(vec![schema]));
    }
    parse(path, &text)
}

pub fn load_schema(path: &Path) -> Result<ToolSchema> {
    parse(path, &read_source(path)?)
}

pub fn load_candidates(path: &Path) -> Result<Vec<ToolCandidate>> {
    let candidates: Vec<ToolCandidate> = parse(path, &read_source(path)?)?;
    Ok(candidates
        .into_iter()
        .map(|c| ToolCandidate::new(c.name, c.distance))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn conversation_from_message_list() {
        let conv = parse_conversation(r#"[{"role":"user","content":"hi"}]"#).unwrap();
        assert_eq!(conv.len(), 1);
    }

    #[test]
    fn conversation_from_object() {
        let conv = parse_conversation(r#"{"messages":[{"role":"assistant","content":"ok"}]}"#).unwrap();
        assert_eq!(conv.messages[0].content, "ok");
    }

    #[test]
    fn catalog_accepts_single_schema() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"name":"clock","description":"Time","parameters":{{"type":"object","properties":{{}}}}}}"#
        )
        .unwrap();
        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.names(), vec!["clock"]);
    }

    #[test]
    fn negative_distances_clamped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name":"a","distance":-1.0}}]"#).unwrap();
        assert_eq!(load_candidates(file.path()).unwrap()[0].distance, 0.0);
    }

    #[test]
    fn unreadable_file_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = load_schema(&missing).unwrap_err();
        assert!(matches!(err, Error::Input { ref source_name, .. } if source_name.ends_with("missing.json")));
    }

    #[test]
    fn malformed_json_is_input_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[{{").unwrap();
        assert!(matches!(load_catalog(file.path()), Err(Error::Input { .. })));
        assert!(matches!(load_conversation(file.path()), Err(Error::Input { .. })));
    }
}
