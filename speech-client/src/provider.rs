use async_trait::async_trait;

use crate::error::Result;

/// Request to send to a speech synthesis provider
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    /// Text to narrate
    pub text: String,
    /// Voice identifier understood by the endpoint (e.g. "es-ES-AlvaroNeural")
    pub voice: String,
    /// Speaking rate adjustment (e.g. "+0%")
    pub rate: String,
    /// Pitch adjustment (e.g. "+0Hz")
    pub pitch: String,
}

/// Trait for speech synthesis providers
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize the request and return the encoded audio bytes
    async fn synthesize(&self, request: SpeechRequest) -> Result<Vec<u8>>;

    /// Get the provider name for display
    fn name(&self) -> &'static str;
}
