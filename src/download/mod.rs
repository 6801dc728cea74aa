//! Download extraction: filename parsing from `Content-Disposition` headers
//! and user-triggered file saves with guaranteed staging cleanup.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Errors raised while materializing a triggered download.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Writing the payload to the staging area failed.
    #[error("failed to stage download payload: {0}")]
    Stage(#[source] io::Error),

    /// The save action itself failed. The staging resource is still released.
    #[error("failed to save {filename}: {source}")]
    Save {
        filename: String,
        #[source]
        source: io::Error,
    },
}

/// Extracts a filename from a `Content-Disposition` header value.
///
/// Precedence:
/// 1. RFC 5987 extended form (`filename*=UTF-8''<percent-encoded>`), with the
///    raw captured text kept when percent-decoding fails — never errors,
/// 2. plain `filename="name"` (quotes optional),
/// 3. the fallback, unchanged.
#[must_use]
pub fn extract_filename(content_disposition: Option<&str>, fallback: &str) -> String {
    content_disposition
        .and_then(parse_content_disposition)
        .unwrap_or_else(|| fallback.to_string())
}

fn parse_content_disposition(header: &str) -> Option<String> {
    // Try filename*= first (RFC 5987 encoded)
    if let Some(pos) = header.find("filename*=") {
        let value = header[pos + 10..].trim();
        // Format: charset'language'encoded_value
        if let Some(quote_pos) = value.find("''") {
            let encoded = &value[quote_pos + 2..];
            let end = encoded.find(';').unwrap_or(encoded.len());
            let encoded_name = encoded[..end].trim();
            if !encoded_name.is_empty() {
                return Some(match urlencoding::decode(encoded_name) {
                    Ok(decoded) => decoded.into_owned(),
                    // Malformed percent-encoding: keep the raw text.
                    Err(_) => encoded_name.to_string(),
                });
            }
        }
    }

    // Try regular filename=
    if let Some(pos) = header.find("filename=") {
        let value = header[pos + 9..].trim();

        if let Some(stripped) = value.strip_prefix('"') {
            if let Some(end) = stripped.find('"') {
                return Some(stripped[..end].to_string());
            }
        } else {
            // Unquoted - take until ; or end
            let end = value.find(';').unwrap_or(value.len());
            let filename = value[..end].trim();
            if !filename.is_empty() {
                return Some(filename.to_string());
            }
        }
    }

    None
}

/// Sanitizes a filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
#[must_use]
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim_matches('_').is_empty() || sanitized == "." || sanitized == ".." {
        return "download.bin".to_string();
    }
    sanitized
}

/// The injected save surface invoked once the payload is staged.
pub trait SaveTarget: Send + Sync {
    /// Persists the staged payload under `filename`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the save cannot be completed; the staging
    /// file is released by the caller regardless.
    fn save(&self, staged: &Path, filename: &str) -> io::Result<()>;
}

/// Default [`SaveTarget`]: copies downloads into a fixed directory under a
/// sanitized filename.
#[derive(Debug, Clone)]
pub struct DirectorySaveTarget {
    dir: PathBuf,
}

impl DirectorySaveTarget {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SaveTarget for DirectorySaveTarget {
    fn save(&self, staged: &Path, filename: &str) -> io::Result<()> {
        let safe_name = sanitize_filename(filename);
        std::fs::create_dir_all(&self.dir)?;
        std::fs::copy(staged, self.dir.join(safe_name))?;
        Ok(())
    }
}

/// Materializes the payload as a temporary staging file, invokes the save
/// action bound to `filename`, and releases the staging file on every path —
/// including when the save action itself fails.
///
/// # Errors
///
/// Returns [`DownloadError::Stage`] when staging fails and
/// [`DownloadError::Save`] when the save action fails.
pub fn trigger_download(
    payload: &[u8],
    filename: &str,
    target: &dyn SaveTarget,
) -> Result<(), DownloadError> {
    // NamedTempFile removes itself on drop, so the staging resource is
    // released on every exit path.
    let mut staged = NamedTempFile::new().map_err(DownloadError::Stage)?;
    staged.write_all(payload).map_err(DownloadError::Stage)?;
    staged.flush().map_err(DownloadError::Stage)?;

    debug!(filename, bytes = payload.len(), "download staged");
    target
        .save(staged.path(), filename)
        .map_err(|source| DownloadError::Save {
            filename: filename.to_string(),
            source,
        })?;
    Ok(())
}
