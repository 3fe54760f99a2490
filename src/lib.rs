//! # Dialogue TTS
//!
//! Single- and multi-speaker speech synthesis over the Gemini TTS API.
//! Requests are validated locally, synthesized remotely, and the returned
//! PCM is written to WAV files. Sample dialogues can be loaded from a JSON
//! document keyed by section and scenario.

pub mod audio;
pub mod client;
pub mod config;
pub mod dialogues;
pub mod error;
pub mod models;
pub mod tts;

pub use audio::{write_wav, WavFileSpec};
pub use client::{GeminiClient, SpeechBackend};
pub use config::{ApiKey, Config};
pub use dialogues::{format_script, DialogueEntry, DialogueStore};
pub use error::{Result, TtsError};
pub use models::{AudioBuffer, SpeakerDescriptor, SynthesisRequest, VoiceSelection};
pub use tts::SpeechSynthesizer;
