//! Per-book output directory layout.

use std::path::{Path, PathBuf};

/// Output locations for one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookPaths {
    /// Book identifier: the PDF filename without its extension
    pub slug: String,
    /// Directory for chapter text files
    pub txt_dir: PathBuf,
    /// Directory for chapter audio files
    pub mp3_dir: PathBuf,
}

/// Compute the output layout for a book: `<output>/<slug>/txt` and
/// `<output>/<slug>/mp3`.
pub fn book_output_paths(output_root: &Path, pdf_file_name: &str) -> BookPaths {
    let slug = Path::new(pdf_file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| pdf_file_name.to_string());

    let book_dir = output_root.join(&slug);

    BookPaths {
        txt_dir: book_dir.join("txt"),
        mp3_dir: book_dir.join("mp3"),
        slug,
    }
}
