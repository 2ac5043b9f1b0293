use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Endpoint request failed: {0}")]
    Request(String),

    #[error("Speech API error{}: {message}", status_code.map(|c| format!(" (HTTP {})", c)).unwrap_or_default())]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Received an invalid or missing audio URL")]
    InvalidAudioUrl,

    #[error("Audio download failed: {0}")]
    Download(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SpeechError>;
