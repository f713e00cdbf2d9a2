//! Voice I/O via external speech services.
//!
//! Thin clients for a speech-to-text service and a text-to-speech service,
//! both reached over HTTP with an explicit timeout. Failures here are always
//! recoverable; the web layer turns them into `{success: false, error}`
//! payloads and never drops the process.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;

use crate::config::VoiceConfig;

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("voice input is not configured (voice.stt_url is unset)")]
    SttNotConfigured,

    #[error("voice output is not configured (voice.tts_url is unset)")]
    TtsNotConfigured,

    #[error("speech service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("speech service returned an unusable response: {0}")]
    BadResponse(String),
}

/// Transcription payload returned by the STT service.
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

pub struct VoiceClient {
    config: VoiceConfig,
    client: reqwest::blocking::Client,
}

impl VoiceClient {
    pub fn new(config: VoiceConfig) -> Result<Self, VoiceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Send recorded audio to the STT service and return the transcript.
    pub fn transcribe(&self, audio: &[u8], content_type: &str) -> Result<String, VoiceError> {
        let url = self
            .config
            .stt_url
            .as_deref()
            .ok_or(VoiceError::SttNotConfigured)?;

        let response = self
            .client
            .post(url)
            .header("content-type", content_type.to_string())
            .body(audio.to_vec())
            .send()?
            .error_for_status()?;

        let transcription: TranscriptionResponse = response
            .json()
            .map_err(|err| VoiceError::BadResponse(err.to_string()))?;

        log::info!("voice input converted: {}", transcription.text);
        Ok(transcription.text)
    }

    /// Synthesize speech for `text`; returns the audio as base64 so the
    /// frontend can play it directly.
    pub fn synthesize(&self, text: &str) -> Result<String, VoiceError> {
        let url = self
            .config
            .tts_url
            .as_deref()
            .ok_or(VoiceError::TtsNotConfigured)?;

        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "text": text }))
            .send()?
            .error_for_status()?;

        let audio = response.bytes()?;
        if audio.is_empty() {
            return Err(VoiceError::BadResponse("empty audio body".to_string()));
        }

        Ok(STANDARD.encode(audio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured() -> VoiceClient {
        VoiceClient::new(VoiceConfig {
            stt_url: None,
            tts_url: None,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_transcribe_unconfigured() {
        let client = unconfigured();
        let result = client.transcribe(b"RIFF", "audio/wav");
        assert!(matches!(result, Err(VoiceError::SttNotConfigured)));
    }

    #[test]
    fn test_synthesize_unconfigured() {
        let client = unconfigured();
        let result = client.synthesize("hello");
        assert!(matches!(result, Err(VoiceError::TtsNotConfigured)));
    }
}
