//! Gradio TTS provider
//!
//! Talks to a Gradio-hosted text-to-speech space. Synthesis is a two-step
//! exchange: a predict call that returns a URL for the generated audio
//! file, followed by a plain download of that URL.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpeechError};
use crate::provider::{SpeechProvider, SpeechRequest};

/// Provider for Gradio-hosted TTS endpoints
pub struct GradioTtsProvider {
    base_url: String,
    client: Client,
}

impl GradioTtsProvider {
    /// Create a new Gradio TTS provider for the given space URL
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Base URL this provider talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// Gradio API request/response types

#[derive(Debug, Serialize)]
struct PredictRequest {
    data: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    data: Vec<AudioPayload>,
}

#[derive(Debug, Deserialize)]
struct AudioPayload {
    #[serde(default)]
    url: Option<String>,
}

#[async_trait]
impl SpeechProvider for GradioTtsProvider {
    async fn synthesize(&self, request: SpeechRequest) -> Result<Vec<u8>> {
        let predict_request = PredictRequest {
            data: vec![request.text, request.voice, request.rate, request.pitch],
        };

        let url = format!("{}/run/predict", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&predict_request)
            .send()
            .await
            .map_err(|e| SpeechError::Request(format!("{}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SpeechError::ApiError {
                message,
                status_code: Some(status.as_u16()),
            });
        }

        let predict_response: PredictResponse =
            response.json().await.map_err(|e| SpeechError::ApiError {
                message: format!("Failed to parse response: {}", e),
                status_code: None,
            })?;

        // The first payload entry carries the generated audio file URL
        let audio_url = predict_response
            .data
            .first()
            .and_then(|p| p.url.clone())
            .filter(|u| u.starts_with("http"))
            .ok_or(SpeechError::InvalidAudioUrl)?;

        let download = self
            .client
            .get(&audio_url)
            .send()
            .await
            .map_err(|e| SpeechError::Download(format!("{}", e)))?;

        if !download.status().is_success() {
            return Err(SpeechError::Download(format!(
                "HTTP {}",
                download.status()
            )));
        }

        let bytes = download
            .bytes()
            .await
            .map_err(|e| SpeechError::Download(format!("{}", e)))?;

        Ok(bytes.to_vec())
    }

    fn name(&self) -> &'static str {
        "gradio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let provider = GradioTtsProvider::new("https://example.hf.space/");
        assert_eq!(provider.base_url(), "https://example.hf.space");
    }

    #[test]
    fn test_predict_request_shape() {
        let request = PredictRequest {
            data: vec![
                "Hello".to_string(),
                "es-ES-AlvaroNeural".to_string(),
                "+0%".to_string(),
                "+0Hz".to_string(),
            ],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"data": ["Hello", "es-ES-AlvaroNeural", "+0%", "+0Hz"]})
        );
    }

    #[test]
    fn test_predict_response_missing_url() {
        let response: PredictResponse = serde_json::from_str(r#"{"data": [{}]}"#).unwrap();
        assert!(response.data[0].url.is_none());
    }

    #[test]
    fn test_predict_response_with_url() {
        let response: PredictResponse =
            serde_json::from_str(r#"{"data": [{"url": "https://example.com/audio.mp3"}]}"#)
                .unwrap();
        assert_eq!(
            response.data[0].url.as_deref(),
            Some("https://example.com/audio.mp3")
        );
    }
}
