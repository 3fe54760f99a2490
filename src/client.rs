//! Remote synthesis client
//!
//! [`SpeechBackend`] is the seam between request construction and the
//! network. [`GeminiClient`] implements it against the Gemini
//! `generateContent` endpoint; tests substitute a mock.

use crate::config::{ApiConfig, ApiKey};
use crate::error::{Result, TtsError};
use crate::models::{AudioBuffer, SynthesisRequest, VoiceSelection};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// A provider that turns a request into raw PCM.
///
/// Implementations make exactly one attempt per call and do not cache.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechBackend {
    fn synthesize(&self, request: &SynthesisRequest, api_key: &ApiKey) -> Result<AudioBuffer>;
}

/// Blocking client for Gemini TTS models
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

impl SpeechBackend for GeminiClient {
    fn synthesize(&self, request: &SynthesisRequest, api_key: &ApiKey) -> Result<AudioBuffer> {
        let body = GenerateContentRequest::from_request(request);
        tracing::debug!(
            "POST {} ({} chars, {} speakers)",
            self.endpoint(),
            request.text().len(),
            request.speakers().len()
        );

        let resp = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key.expose())
            .json(&body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let text = match resp.text() {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Failed to read {} response body: {}", status, e);
                    format!("<error body unreadable: {}>", e)
                }
            };
            return Err(provider_error(status.as_u16(), &text));
        }

        let parsed: GenerateContentResponse = resp.json()?;
        extract_audio(parsed)
    }
}

// Request body

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_modalities: [&'static str; 1],
    speech_config: SpeechConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    voice_config: Option<VoiceConfig<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    multi_speaker_voice_config: Option<MultiSpeakerVoiceConfig<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig<'a> {
    prebuilt_voice_config: PrebuiltVoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig<'a> {
    voice_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MultiSpeakerVoiceConfig<'a> {
    speaker_voice_configs: Vec<SpeakerVoiceConfig<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeakerVoiceConfig<'a> {
    speaker: &'a str,
    voice_config: VoiceConfig<'a>,
}

impl<'a> VoiceConfig<'a> {
    fn prebuilt(voice_name: &'a str) -> Self {
        Self {
            prebuilt_voice_config: PrebuiltVoiceConfig { voice_name },
        }
    }
}

impl<'a> GenerateContentRequest<'a> {
    fn from_request(request: &'a SynthesisRequest) -> Self {
        let speech_config = match request.voices() {
            VoiceSelection::Single { voice } => SpeechConfig {
                voice_config: Some(VoiceConfig::prebuilt(voice)),
                multi_speaker_voice_config: None,
            },
            VoiceSelection::MultiSpeaker(speakers) => SpeechConfig {
                voice_config: None,
                multi_speaker_voice_config: Some(MultiSpeakerVoiceConfig {
                    speaker_voice_configs: speakers
                        .iter()
                        .map(|s| SpeakerVoiceConfig {
                            speaker: &s.name,
                            voice_config: VoiceConfig::prebuilt(&s.voice),
                        })
                        .collect(),
                }),
            },
        };

        Self {
            contents: vec![Content {
                parts: vec![TextPart {
                    text: request.text(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: ["AUDIO"],
                speech_config,
            },
        }
    }
}

// Response body

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    status: Option<String>,
}

fn extract_audio(response: GenerateContentResponse) -> Result<AudioBuffer> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| TtsError::synthesis("response contained no candidates"))?;

    let finish_reason = candidate.finish_reason;
    let inline = candidate
        .content
        .into_iter()
        .flat_map(|c| c.parts)
        .find_map(|p| p.inline_data)
        .ok_or_else(|| {
            TtsError::synthesis(format!(
                "response contained no audio (finish reason: {})",
                finish_reason.as_deref().unwrap_or("unknown")
            ))
        })?;

    if let Some(mime) = &inline.mime_type {
        tracing::debug!("Received audio payload of type {}", mime);
    }

    let pcm = base64::engine::general_purpose::STANDARD.decode(inline.data.as_bytes())?;
    if pcm.is_empty() {
        return Err(TtsError::synthesis("response contained an empty audio payload"));
    }

    Ok(AudioBuffer::new(pcm))
}

fn provider_error(status: u16, body: &str) -> TtsError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => TtsError::synthesis(format!(
            "provider returned {} {}: {}",
            status,
            parsed.error.status.as_deref().unwrap_or(""),
            parsed.error.message
        )),
        Err(_) => TtsError::synthesis(format!("provider returned {}: {}", status, body.trim())),
    }
}
