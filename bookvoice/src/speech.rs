//! Audio generation: narrate each chapter text file through a speech
//! provider, one file at a time.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

use speech_client::{SpeechProvider, SpeechRequest};

use crate::config::VoiceProfile;
use crate::paths::BookPaths;

/// Generate one `.mp3` per `.txt` file in the book's text directory.
///
/// Returns the number of audio files written. Per-file failures are
/// logged and skipped; a missing or empty text directory is reported and
/// yields zero files.
pub async fn generate_all_audio(
    paths: &BookPaths,
    provider: &dyn SpeechProvider,
    profile: &VoiceProfile,
) -> Result<usize> {
    log::info!("Starting audio generation for \"{}\"", paths.slug);

    let files = list_txt_files(&paths.txt_dir)?;
    if files.is_empty() {
        log::error!("No .txt files found in {}", paths.txt_dir.display());
        return Ok(0);
    }

    fs::create_dir_all(&paths.mp3_dir)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut generated = 0;
    for (index, input) in files.iter().enumerate() {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(file_name.clone());

        log::info!("Processing ({}/{}): {}", index + 1, files.len(), file_name);

        let output = paths.mp3_dir.join(
            input
                .with_extension("mp3")
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_default(),
        );

        match convert_text_to_audio(input, &output, provider, profile).await {
            Ok(()) => {
                log::info!("Saved: {}", output.display());
                generated += 1;
            }
            Err(err) => {
                log::error!("Failed to process \"{}\": {}", file_name, err);
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();
    log::info!("Audio generation completed for {}", paths.slug);

    Ok(generated)
}

/// Narrate a single text file and write the audio bytes next to it.
async fn convert_text_to_audio(
    input: &Path,
    output: &Path,
    provider: &dyn SpeechProvider,
    profile: &VoiceProfile,
) -> Result<()> {
    let text = fs::read_to_string(input)?;

    let audio = provider
        .synthesize(SpeechRequest {
            text,
            voice: profile.voice.clone(),
            rate: profile.rate.clone(),
            pitch: profile.pitch.clone(),
        })
        .await?;

    fs::write(output, audio)?;
    Ok(())
}

/// `.txt` files in the directory, sorted by name so the `NN_` prefix
/// keeps chapters in reading order.
fn list_txt_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("txt"))
                .unwrap_or(false)
        })
        .collect();

    files.sort();
    Ok(files)
}
