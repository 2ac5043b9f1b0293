//! Chapter extraction: turn a PDF's outline into per-chapter text files.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::outline::{self, ChapterRange};
use crate::paths::BookPaths;
use crate::pdf::PdfBook;
use crate::text::{prepare_text, sanitize_title};

/// Extract all chapters of a book into `paths.txt_dir`.
///
/// Returns the number of chapter files written. A missing outline or an
/// outline with no resolvable chapters is reported in the log and yields
/// zero files; only a failure to read the PDF itself is an error.
pub fn extract_book(pdf_path: &Path, paths: &BookPaths) -> Result<usize> {
    let book = PdfBook::open(pdf_path)?;

    let tree = book.outline();
    if tree.is_empty() {
        log::error!("No outline found in \"{}\"", paths.slug);
        return Ok(0);
    }

    let entries = outline::flatten(&tree);
    let markers = outline::resolve_chapters(&book, &entries);
    if markers.is_empty() {
        log::warn!("No valid chapters found in \"{}\"", paths.slug);
        return Ok(0);
    }

    let ranges = outline::derive_ranges(&markers);

    fs::create_dir_all(&paths.txt_dir)?;

    let mut written = 0;
    for (index, range) in ranges.iter().enumerate() {
        match write_chapter(&book, paths, index, range) {
            Ok(out_file) => {
                log::info!("Saved: {}", out_file.display());
                written += 1;
            }
            Err(err) => {
                log::error!("Failed to extract chapter \"{}\": {}", range.title, err);
            }
        }
    }

    Ok(written)
}

/// Realize one chapter range into a text file, named by its 1-based
/// position: `NN_sanitized_title.txt`.
fn write_chapter(
    book: &PdfBook,
    paths: &BookPaths,
    index: usize,
    range: &ChapterRange,
) -> Result<PathBuf> {
    let content = chapter_text(book, range)?;

    let file_name = format!("{:02}_{}.txt", index + 1, sanitize_title(&range.title));
    let out_file = paths.txt_dir.join(file_name);
    fs::write(&out_file, content)?;

    Ok(out_file)
}

/// Concatenate the text of pages `start_page..end_page`, one blank line
/// between pages, normalized for narration. Pages past the document end
/// contribute nothing.
fn chapter_text(book: &PdfBook, range: &ChapterRange) -> Result<String> {
    let mut text = String::new();

    for page in range.start_page..range.end_page {
        if page > book.page_count() {
            break;
        }
        text.push_str(&book.page_text(page)?);
        text.push_str("\n\n");
    }

    Ok(prepare_text(&text))
}
