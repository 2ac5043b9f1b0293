//! Shared speech synthesis client library for the bookvoice workspace
//!
//! Provides a unified interface over remote text-to-speech endpoints:
//! - Gradio-hosted TTS spaces (predict -> audio URL -> download)
//! - Mock provider for testing

pub mod error;
pub mod provider;
pub mod providers;

pub use error::{Result, SpeechError};
pub use provider::{SpeechProvider, SpeechRequest};
pub use providers::{GradioTtsProvider, MockProvider};
