//! Text normalization for extracted chapters and title sanitization for
//! output filenames.

/// Typography that downstream TTS mispronounces, and its replacements.
const PROBLEMATIC_CHARS: &[(char, &str)] = &[
    ('\u{201c}', "\""), // Left double quote
    ('\u{201d}', "\""), // Right double quote
    ('\u{2018}', "'"),  // Left single quote
    ('\u{2019}', "'"),  // Right single quote
    ('\u{2014}', "-"),  // Em dash
    ('\u{2013}', "-"),  // En dash
    ('\u{2022}', "*"),  // Bullet
    ('\u{00b7}', "*"),  // Middle dot
    ('\u{25cf}', "*"),  // Black circle
    ('\u{202f}', " "),  // Narrow no-break space
    ('\u{00a0}', " "),  // No-break space
];

/// Prepare extracted page text for writing and narration.
///
/// Replaces problematic typography and normalizes line endings to CRLF,
/// which the speech endpoint treats as hard pauses.
pub fn prepare_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            // Fold CRLF and lone CR into a single newline below
            if chars.peek() == Some(&'\n') {
                continue;
            }
            result.push_str("\r\n");
            continue;
        }
        if c == '\n' {
            result.push_str("\r\n");
            continue;
        }

        let replacement = PROBLEMATIC_CHARS
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, r)| *r);

        match replacement {
            Some(r) => result.push_str(r),
            None => result.push(c),
        }
    }

    result
}

/// Sanitize a chapter title into a filename fragment: keep word
/// characters, collapse whitespace runs into underscores, lowercase.
pub fn sanitize_title(title: &str) -> String {
    let filtered: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else if c.is_whitespace() {
                ' '
            } else {
                '\u{0}'
            }
        })
        .filter(|c| *c != '\u{0}')
        .collect();

    filtered
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}
