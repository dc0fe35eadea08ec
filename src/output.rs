//! Output file naming and image saving for the CLI.
//!
//! The pipeline always yields PNG, so saving is a plain byte write.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::GenError;

/// Generate an output filename from a subject description.
///
/// Sanitizes the first 50 characters to kebab-case and appends a unix
/// timestamp.
#[must_use]
pub fn auto_filename(description: &str) -> String {
    let sanitized = sanitize_for_filename(description, 50);
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    format!("{sanitized}-{timestamp}.png")
}

/// Sanitize a string for use in a filename.
///
/// Converts to lowercase, replaces non-alphanumeric chars with hyphens,
/// collapses consecutive hyphens, and trims to max length.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut last_was_hyphen = true; // Prevents leading hyphen

    for ch in input.chars().take(max_len * 2) {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        "portrait".to_string()
    } else {
        result
    }
}

/// Save PNG bytes to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_image(data: &[u8], output_path: &Path) -> Result<(), GenError> {
    std::fs::write(output_path, data).map_err(GenError::Io)
}

/// Resolve the output path: use the explicit path or auto-generate.
#[must_use]
pub fn resolve_output_path(explicit: Option<&str>, description: &str) -> PathBuf {
    match explicit {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(auto_filename(description)),
    }
}
