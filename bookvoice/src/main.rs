//! bookvoice - Convert PDF books to chapter text and spoken audio

mod config;
mod extract;
mod outline;
mod paths;
mod pdf;
mod speech;
mod text;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{BookvoiceConfig, VoiceProfile};
use env_logger::Env;
use speech_client::GradioTtsProvider;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "bookvoice")]
#[command(about = "Convert PDF books to chapter text and spoken audio", long_about = None)]
#[command(version)]
struct Args {
    /// Directory containing PDF books (default: from config)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Root directory for per-book output (default: from config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Voice profile key (default: from config)
    #[arg(long)]
    voice: Option<String>,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract chapter text files from a single PDF
    Extract {
        /// Path to the PDF file
        pdf: PathBuf,
    },
    /// Generate audio for an already-extracted book
    Speak {
        /// Book name (the PDF filename without extension)
        book: String,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the speech endpoint base URL
    SetEndpoint {
        /// Gradio space URL
        url: String,
    },
    /// Set the default voice profile key
    SetVoice {
        /// Profile key (must exist in the voices table)
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = BookvoiceConfig::load().context("Failed to load configuration")?;
    if let Some(input) = &args.input {
        config.input_dir = input.clone();
    }
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }

    match &args.command {
        Some(Commands::Config { action }) => handle_config_command(action),
        Some(Commands::Extract { pdf }) => {
            if !pdf.exists() {
                anyhow::bail!("PDF file not found: {}", pdf.display());
            }
            let file_name = file_name_of(pdf)?;
            let paths = paths::book_output_paths(&config.output_dir, &file_name);
            let written = extract::extract_book(pdf, &paths)?;
            log::info!("Extracted {} chapter(s) from \"{}\"", written, paths.slug);
            Ok(())
        }
        Some(Commands::Speak { book }) => {
            let paths = paths::book_output_paths(&config.output_dir, book);
            let provider = GradioTtsProvider::new(&config.endpoint);
            let profile = voice_for(&config, &args)?;
            speech::generate_all_audio(&paths, &provider, profile).await?;
            Ok(())
        }
        None => process_all(&config, &args).await,
    }
}

/// Process every PDF in the input directory: extract chapters, then
/// narrate them. Failures are isolated per book.
async fn process_all(config: &BookvoiceConfig, args: &Args) -> Result<()> {
    let provider = GradioTtsProvider::new(&config.endpoint);
    let profile = voice_for(config, args)?;

    let pdf_files = list_pdf_files(&config.input_dir)
        .with_context(|| format!("Could not read input directory {}", config.input_dir.display()))?;

    if pdf_files.is_empty() {
        anyhow::bail!("No PDF files found in {}", config.input_dir.display());
    }

    for path in &pdf_files {
        let file_name = file_name_of(path)?;

        match std::fs::metadata(path) {
            Ok(stats) if !stats.is_file() => {
                log::error!("\"{}\" is not a regular file. Skipping.", file_name);
                continue;
            }
            Ok(stats) if stats.len() == 0 => {
                log::error!("\"{}\" is empty. Skipping.", file_name);
                continue;
            }
            Err(err) => {
                log::error!("Could not access \"{}\": {}", file_name, err);
                continue;
            }
            Ok(_) => {}
        }

        log::info!("Starting processing: \"{}\"", file_name);

        if let Err(err) = process_book(config, &provider, profile, path, &file_name).await {
            log::error!("Failed to process \"{}\": {}", file_name, err);
        }
    }

    log::info!("All books processed");
    Ok(())
}

/// Run the full pipeline for one book.
async fn process_book(
    config: &BookvoiceConfig,
    provider: &GradioTtsProvider,
    profile: &VoiceProfile,
    path: &Path,
    file_name: &str,
) -> Result<()> {
    let paths = paths::book_output_paths(&config.output_dir, file_name);

    extract::extract_book(path, &paths)?;
    speech::generate_all_audio(&paths, provider, profile).await?;

    Ok(())
}

/// Resolve the voice profile from the CLI override or the config default.
fn voice_for<'a>(config: &'a BookvoiceConfig, args: &Args) -> Result<&'a VoiceProfile> {
    let key = args.voice.as_deref().unwrap_or(&config.default_voice);
    config.voice_profile(key)
}

/// PDF files in the input directory, sorted by name.
fn list_pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();

    files.sort();
    Ok(files)
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow::anyhow!("Invalid path: {}", path.display()))
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = BookvoiceConfig::load()?;
            println!("Configuration file: {:?}", BookvoiceConfig::config_path()?);
            println!();
            println!("input_dir = \"{}\"", config.input_dir.display());
            println!("output_dir = \"{}\"", config.output_dir.display());
            println!("endpoint = \"{}\"", config.endpoint);
            println!("default_voice = \"{}\"", config.default_voice);
            let mut keys: Vec<&String> = config.voices.keys().collect();
            keys.sort();
            for key in keys {
                let profile = &config.voices[key];
                println!(
                    "voices.{} = {{ voice = \"{}\", rate = \"{}\", pitch = \"{}\" }}",
                    key, profile.voice, profile.rate, profile.pitch
                );
            }
        }
        ConfigAction::SetEndpoint { url } => {
            let mut config = BookvoiceConfig::load()?;
            config.endpoint = url.trim_end_matches('/').to_string();
            config.save()?;
            println!("Endpoint set to: {}", config.endpoint);
        }
        ConfigAction::SetVoice { key } => {
            let mut config = BookvoiceConfig::load()?;
            config.voice_profile(key)?;
            config.default_voice = key.clone();
            config.save()?;
            println!("Default voice set to: {}", key);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_pdf_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("a.PDF"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let files = list_pdf_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(
            file_name_of(Path::new("input/My Book.pdf")).unwrap(),
            "My Book.pdf"
        );
    }
}
