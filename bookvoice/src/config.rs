//! bookvoice configuration: directories, speech endpoint, voice profiles.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Default Gradio space hosting the TTS model.
const DEFAULT_ENDPOINT: &str = "https://innoai-edge-tts-text-to-speech.hf.space";

const DEFAULT_VOICE_KEY: &str = "spanish_male";

/// A named voice profile for the speech endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceProfile {
    /// Voice identifier understood by the endpoint
    pub voice: String,
    /// Speaking rate adjustment
    #[serde(default = "default_rate")]
    pub rate: String,
    /// Pitch adjustment
    #[serde(default = "default_pitch")]
    pub pitch: String,
}

fn default_rate() -> String {
    "+0%".to_string()
}

fn default_pitch() -> String {
    "+0Hz".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookvoiceConfig {
    /// Directory scanned for PDF books
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Root directory for per-book txt/mp3 output
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Speech endpoint base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Voice profile key used when none is given on the command line
    #[serde(default = "default_voice_key")]
    pub default_voice: String,

    /// Named voice profiles
    #[serde(default = "default_voices")]
    pub voices: HashMap<String, VoiceProfile>,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("input")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_voice_key() -> String {
    DEFAULT_VOICE_KEY.to_string()
}

fn default_voices() -> HashMap<String, VoiceProfile> {
    let mut voices = HashMap::new();
    voices.insert(
        "spanish_male".to_string(),
        VoiceProfile {
            voice: "es-ES-AlvaroNeural".to_string(),
            rate: default_rate(),
            pitch: default_pitch(),
        },
    );
    voices.insert(
        "spanish_female".to_string(),
        VoiceProfile {
            voice: "es-ES-ElviraNeural".to_string(),
            rate: default_rate(),
            pitch: default_pitch(),
        },
    );
    voices.insert(
        "english_male".to_string(),
        VoiceProfile {
            voice: "en-US-GuyNeural".to_string(),
            rate: default_rate(),
            pitch: default_pitch(),
        },
    );
    voices
}

impl Default for BookvoiceConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            endpoint: default_endpoint(),
            default_voice: default_voice_key(),
            voices: default_voices(),
        }
    }
}

impl BookvoiceConfig {
    /// Get the config file path: ~/.config/bookvoice/config.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("bookvoice")
            .join("config.toml"))
    }

    /// Load config from file, returning defaults if the file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: BookvoiceConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Look up a voice profile by key
    pub fn voice_profile(&self, key: &str) -> Result<&VoiceProfile> {
        self.voices
            .get(key)
            .ok_or_else(|| anyhow::anyhow!("Voice profile \"{}\" not found", key))
    }
}
