//! Sample dialogue lookup
//!
//! Dialogues live in a JSON document keyed by section (the script or demo
//! name) and then by scenario. A value is either a raw transcript or an
//! ordered list of `[speaker, utterance]` pairs.

use crate::error::{Result, TtsError};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Process-wide dialogue cache, filled on first use
static DIALOGUES: OnceCell<DialogueStore> = OnceCell::new();

/// A stored dialogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DialogueEntry {
    /// Ready-to-send transcript, one `"Name: utterance"` per line
    Transcript(String),
    /// Ordered `(speaker, utterance)` pairs
    Script(Vec<(String, String)>),
}

impl DialogueEntry {
    /// Text to send to the provider
    pub fn to_dialogue_text(&self) -> String {
        match self {
            DialogueEntry::Transcript(text) => text.clone(),
            DialogueEntry::Script(lines) => format_script(lines),
        }
    }
}

/// Join script lines into `"Speaker: text"` lines
pub fn format_script<S, T>(lines: &[(S, T)]) -> String
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    lines
        .iter()
        .map(|(speaker, text)| format!("{}: {}", speaker.as_ref(), text.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// In-memory dialogue document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogueStore {
    sections: BTreeMap<String, BTreeMap<String, DialogueEntry>>,
}

impl DialogueStore {
    /// Parse a dialogue document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a dialogue file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&json)?;
        tracing::debug!(
            "Loaded {} dialogue sections from {}",
            store.sections.len(),
            path.display()
        );
        Ok(store)
    }

    /// Process-wide store, loaded from `path` on the first call.
    ///
    /// Later calls return the cached store whatever path they pass.
    pub fn global<P: AsRef<Path>>(path: P) -> Result<&'static DialogueStore> {
        DIALOGUES.get_or_try_init(|| Self::from_path(path))
    }

    /// Look up a dialogue by section and key
    pub fn get(&self, section: &str, key: &str) -> Result<&DialogueEntry> {
        let entries = self
            .sections
            .get(section)
            .ok_or_else(|| TtsError::NotFound(format!("section '{}'", section)))?;

        entries
            .get(key)
            .ok_or_else(|| TtsError::NotFound(format!("'{}' in section '{}'", key, section)))
    }

    /// Section names, sorted
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Scenario keys of a section, sorted
    pub fn keys(&self, section: &str) -> Result<impl Iterator<Item = &str>> {
        let entries = self
            .sections
            .get(section)
            .ok_or_else(|| TtsError::NotFound(format!("section '{}'", section)))?;
        Ok(entries.keys().map(String::as_str))
    }
}

/// Look up a dialogue in the process-wide store
pub fn get_dialogue<P: AsRef<Path>>(path: P, section: &str, key: &str) -> Result<&'static DialogueEntry> {
    DialogueStore::global(path)?.get(section, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "demo": {
            "chat": "A: hi\nB: hello é",
            "script": [["Emma", "Hey Alex!"], ["Alex", "Hi Emma."]]
        },
        "other": {}
    }"#;

    #[test]
    fn test_lookup_returns_exact_values() {
        let store = DialogueStore::from_json_str(SAMPLE).unwrap();

        assert_eq!(
            store.get("demo", "chat").unwrap(),
            &DialogueEntry::Transcript("A: hi\nB: hello \u{e9}".to_string())
        );
        assert_eq!(
            store.get("demo", "script").unwrap(),
            &DialogueEntry::Script(vec![
                ("Emma".to_string(), "Hey Alex!".to_string()),
                ("Alex".to_string(), "Hi Emma.".to_string()),
            ])
        );
    }

    #[test]
    fn test_lookup_miss_is_not_found() {
        let store = DialogueStore::from_json_str(SAMPLE).unwrap();

        assert!(matches!(store.get("missing", "chat"), Err(TtsError::NotFound(_))));
        assert!(matches!(store.get("demo", "missing"), Err(TtsError::NotFound(_))));
        assert!(matches!(store.get("other", "chat"), Err(TtsError::NotFound(_))));
    }

    #[test]
    fn test_format_script() {
        let text = format_script(&[("Alice", "Hello there!"), ("Bob", "Hi Alice, how are you?")]);
        assert_eq!(text, "Alice: Hello there!\nBob: Hi Alice, how are you?");
        assert_eq!(format_script::<&str, &str>(&[]), "");
    }

    #[test]
    fn test_entry_dialogue_text() {
        let store = DialogueStore::from_json_str(SAMPLE).unwrap();
        let script = store.get("demo", "script").unwrap();
        assert_eq!(script.to_dialogue_text(), "Emma: Hey Alex!\nAlex: Hi Emma.");

        let chat = store.get("demo", "chat").unwrap();
        assert_eq!(chat.to_dialogue_text(), "A: hi\nB: hello \u{e9}");
    }

    #[test]
    fn test_listing() {
        let store = DialogueStore::from_json_str(SAMPLE).unwrap();
        assert_eq!(store.sections().collect::<Vec<_>>(), vec!["demo", "other"]);
        assert_eq!(store.keys("demo").unwrap().collect::<Vec<_>>(), vec!["chat", "script"]);
        assert!(store.keys("nope").is_err());
    }

    #[test]
    fn test_malformed_document() {
        let err = DialogueStore::from_json_str(r#"{"demo": {"x": 42}}"#).unwrap_err();
        assert!(matches!(err, TtsError::Serialization(_)));
    }

    #[test]
    fn test_bundled_dialogues_load() {
        let store = DialogueStore::from_path(crate::config::BUNDLED_DIALOGUES).unwrap();
        assert!(store.get("gemini_tts_example", "tech_dialogue").is_ok());
        assert!(matches!(
            store.get("gemini_tts_example", "casual_script").unwrap(),
            DialogueEntry::Script(_)
        ));
        assert!(store.get("academic_papers_demo", "gneiss_web").is_ok());
    }
}
