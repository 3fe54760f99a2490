//! High-level synthesis entry points
//!
//! [`SpeechSynthesizer`] runs one stateless pipeline per call: credential
//! check, request construction, remote synthesis, WAV write. Nothing is
//! retried and nothing is kept between calls.
//!
//! # Example
//!
//! ```rust,no_run
//! use dialogue_tts::{Config, SpeakerDescriptor, SpeechSynthesizer};
//!
//! let synthesizer = SpeechSynthesizer::from_config(&Config::from_env())?;
//! synthesizer.text_to_speech_multi_speaker(
//!     "Host: Welcome back!\nGuest: Glad to be here.",
//!     &[
//!         SpeakerDescriptor::new("Host", "puck"),
//!         SpeakerDescriptor::new("Guest", "kore"),
//!     ],
//!     "podcast.wav",
//! )?;
//! # Ok::<(), dialogue_tts::TtsError>(())
//! ```

use crate::audio::{self, WavFileSpec};
use crate::client::{GeminiClient, SpeechBackend};
use crate::config::{ApiKey, Config, API_KEY_ENV};
use crate::error::{Result, TtsError};
use crate::models::{AudioBuffer, SpeakerDescriptor, SynthesisRequest};
use std::path::Path;

/// Synthesizes speech through a [`SpeechBackend`] and writes WAV files
pub struct SpeechSynthesizer<B = GeminiClient> {
    backend: B,
    api_key: Option<ApiKey>,
    wav_spec: WavFileSpec,
}

impl SpeechSynthesizer<GeminiClient> {
    /// Gemini-backed synthesizer using the configured key, model and WAV spec.
    ///
    /// A missing key is not an error here; each synthesis call reports it.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = GeminiClient::new(&config.api)?;
        Ok(Self::new(backend, config.api.api_key.clone()).with_wav_spec(config.audio))
    }
}

impl<B: SpeechBackend> SpeechSynthesizer<B> {
    pub fn new(backend: B, api_key: Option<ApiKey>) -> Self {
        Self {
            backend,
            api_key,
            wav_spec: WavFileSpec::default(),
        }
    }

    /// Set the WAV parameters used for output files
    pub fn with_wav_spec(mut self, wav_spec: WavFileSpec) -> Self {
        self.wav_spec = wav_spec;
        self
    }

    pub fn wav_spec(&self) -> &WavFileSpec {
        &self.wav_spec
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn api_key(&self) -> Result<&ApiKey> {
        self.api_key.as_ref().ok_or_else(|| {
            TtsError::Configuration(format!(
                "Please set the {} environment variable",
                API_KEY_ENV
            ))
        })
    }

    /// Send a built request to the backend and return its PCM
    pub fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioBuffer> {
        let api_key = self.api_key()?;
        self.backend.synthesize(request, api_key)
    }

    /// Synthesize `request` and write it to `output`
    pub fn synthesize_to_file<P: AsRef<Path>>(
        &self,
        request: &SynthesisRequest,
        output: P,
    ) -> Result<AudioBuffer> {
        let output = output.as_ref();
        let audio = self.synthesize(request)?;
        audio::write_wav(output, &audio, &self.wav_spec)?;

        tracing::info!(
            "Saved {:.2}s of audio to {}",
            audio::duration_seconds(audio.len(), &self.wav_spec),
            output.display()
        );
        Ok(audio)
    }

    /// Read `text` with a single prebuilt voice
    pub fn text_to_speech<P: AsRef<Path>>(&self, text: &str, voice: &str, output: P) -> Result<()> {
        self.api_key()?;
        let request = SynthesisRequest::single_speaker(text, voice);
        self.synthesize_to_file(&request, output)?;
        tracing::info!("Speech generated with voice {}", voice);
        Ok(())
    }

    /// Read `text` after a style instruction such as `"Say in a whisper:"`
    pub fn text_to_speech_with_style<P: AsRef<Path>>(
        &self,
        text: &str,
        style_instruction: &str,
        voice: &str,
        output: P,
    ) -> Result<()> {
        self.api_key()?;
        let request = SynthesisRequest::styled(text, style_instruction, voice);
        self.synthesize_to_file(&request, output)?;
        tracing::info!("Styled speech generated with voice {}", voice);
        Ok(())
    }

    /// Read a two-speaker dialogue, each speaker with its own voice
    pub fn text_to_speech_multi_speaker<P: AsRef<Path>>(
        &self,
        dialogue_text: &str,
        speakers: &[SpeakerDescriptor],
        output: P,
    ) -> Result<()> {
        self.api_key()?;
        let request = SynthesisRequest::multi_speaker(dialogue_text, speakers)?;
        self.synthesize_to_file(&request, output)?;

        let voices: Vec<String> = speakers.iter().map(ToString::to_string).collect();
        tracing::info!("Multi-speaker speech generated: {}", voices.join(", "));
        Ok(())
    }
}
