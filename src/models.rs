//! Request and audio types, and validated request construction

use crate::error::{Result, TtsError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Voice used when the caller does not pick one
pub const DEFAULT_VOICE: &str = "kore";

/// Number of speakers a multi-speaker request must carry
pub const MULTI_SPEAKER_COUNT: usize = 2;

/// A named speaker bound to a provider voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerDescriptor {
    /// Speaker name as it appears in the dialogue text (`"Name: ..."`)
    pub name: String,
    /// Prebuilt provider voice, e.g. `kore` or `puck`
    pub voice: String,
}

impl SpeakerDescriptor {
    pub fn new(name: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            voice: voice.into(),
        }
    }
}

impl std::fmt::Display for SpeakerDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.voice)
    }
}

impl std::str::FromStr for SpeakerDescriptor {
    type Err = TtsError;

    /// Parse `NAME=VOICE`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, voice)) if !name.trim().is_empty() && !voice.trim().is_empty() => {
                Ok(SpeakerDescriptor::new(name.trim(), voice.trim()))
            }
            _ => Err(TtsError::Validation(format!(
                "Invalid speaker '{}', expected NAME=VOICE",
                s
            ))),
        }
    }
}

/// Voice selection carried by a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceSelection {
    /// One prebuilt voice reads the whole text
    Single { voice: String },
    /// Each speaker name in the text is read by its bound voice
    MultiSpeaker(Vec<SpeakerDescriptor>),
}

/// A provider-agnostic synthesis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    text: String,
    voices: VoiceSelection,
}

impl SynthesisRequest {
    /// Single-speaker request
    pub fn single_speaker(text: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voices: VoiceSelection::Single {
                voice: voice.into(),
            },
        }
    }

    /// Single-speaker request prefixed with a natural-language style
    /// instruction such as `"Say cheerfully:"`
    pub fn styled(text: &str, style_instruction: &str, voice: impl Into<String>) -> Self {
        Self::single_speaker(format!("{} {}", style_instruction, text), voice)
    }

    /// Validated multi-speaker request.
    ///
    /// Exactly two speakers are accepted; the text is kept as given and the
    /// speakers keep their order.
    pub fn multi_speaker(
        dialogue_text: impl Into<String>,
        speakers: &[SpeakerDescriptor],
    ) -> Result<Self> {
        if speakers.len() > MULTI_SPEAKER_COUNT {
            return Err(TtsError::Validation(
                "Multi-speaker TTS supports maximum 2 speakers".to_string(),
            ));
        }
        if speakers.len() < MULTI_SPEAKER_COUNT {
            return Err(TtsError::Validation(
                "Multi-speaker TTS requires at least 2 speakers".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for speaker in speakers {
            if speaker.name.is_empty() {
                return Err(TtsError::Validation(
                    "Speaker name must not be empty".to_string(),
                ));
            }
            if !seen.insert(speaker.name.as_str()) {
                return Err(TtsError::Validation(format!(
                    "Duplicate speaker name: {}",
                    speaker.name
                )));
            }
        }

        Ok(Self {
            text: dialogue_text.into(),
            voices: VoiceSelection::MultiSpeaker(speakers.to_vec()),
        })
    }

    /// Text sent to the provider
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn voices(&self) -> &VoiceSelection {
        &self.voices
    }

    /// Speaker bindings for a multi-speaker request, empty otherwise
    pub fn speakers(&self) -> &[SpeakerDescriptor] {
        match &self.voices {
            VoiceSelection::MultiSpeaker(speakers) => speakers,
            VoiceSelection::Single { .. } => &[],
        }
    }
}

/// Raw PCM bytes returned by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioBuffer {
    pcm: Vec<u8>,
}

impl AudioBuffer {
    pub fn new(pcm: Vec<u8>) -> Self {
        Self { pcm }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pcm
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pcm
    }

    /// Number of PCM bytes
    pub fn len(&self) -> usize {
        self.pcm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pcm.is_empty()
    }
}

impl From<Vec<u8>> for AudioBuffer {
    fn from(pcm: Vec<u8>) -> Self {
        Self::new(pcm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speakers(names: &[&str]) -> Vec<SpeakerDescriptor> {
        names
            .iter()
            .map(|n| SpeakerDescriptor::new(*n, "kore"))
            .collect()
    }

    #[test]
    fn test_multi_speaker_pairs_voices_in_order() {
        let speakers = vec![
            SpeakerDescriptor::new("A", "kore"),
            SpeakerDescriptor::new("B", "puck"),
        ];
        let request = SynthesisRequest::multi_speaker("A: hi\nB: hello", &speakers).unwrap();

        assert_eq!(request.text(), "A: hi\nB: hello");
        assert_eq!(request.speakers(), speakers.as_slice());
        assert_eq!(request.speakers()[0].name, "A");
        assert_eq!(request.speakers()[0].voice, "kore");
        assert_eq!(request.speakers()[1].name, "B");
        assert_eq!(request.speakers()[1].voice, "puck");
    }

    #[test]
    fn test_too_many_speakers() {
        for count in 3..6 {
            let names: Vec<String> = (0..count).map(|i| format!("S{}", i)).collect();
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let err = SynthesisRequest::multi_speaker("text", &speakers(&names)).unwrap_err();
            assert!(matches!(err, TtsError::Validation(_)));
            assert!(err.to_string().contains("maximum 2 speakers"));
        }
    }

    #[test]
    fn test_too_few_speakers() {
        let cases: [&[&str]; 2] = [&[], &["A"]];
        for names in cases {
            let err = SynthesisRequest::multi_speaker("A: hi", &speakers(names)).unwrap_err();
            assert!(matches!(err, TtsError::Validation(_)));
            assert!(err.to_string().contains("at least 2 speakers"));
        }
    }

    #[test]
    fn test_duplicate_and_empty_names() {
        let err = SynthesisRequest::multi_speaker("x", &speakers(&["A", "A"])).unwrap_err();
        assert!(err.to_string().contains("Duplicate speaker name: A"));

        let err = SynthesisRequest::multi_speaker("x", &speakers(&["", "B"])).unwrap_err();
        assert!(matches!(err, TtsError::Validation(_)));
    }

    #[test]
    fn test_styled_prompt() {
        let request = SynthesisRequest::styled("Welcome!", "Say cheerfully:", "puck");
        assert_eq!(request.text(), "Say cheerfully: Welcome!");
        assert_eq!(
            request.voices(),
            &VoiceSelection::Single {
                voice: "puck".to_string()
            }
        );
        assert!(request.speakers().is_empty());
    }

    #[test]
    fn test_speaker_from_str() {
        let speaker: SpeakerDescriptor = "Dr. Chen=kore".parse().unwrap();
        assert_eq!(speaker, SpeakerDescriptor::new("Dr. Chen", "kore"));

        assert!("no-separator".parse::<SpeakerDescriptor>().is_err());
        assert!("=kore".parse::<SpeakerDescriptor>().is_err());
    }
}
