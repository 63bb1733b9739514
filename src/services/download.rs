//! Naming and saving of generated documents.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};

use crate::error::Result;

/// A generated document ready to be written to disk.
#[derive(Debug, Clone)]
pub struct Download {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Download {
    /// Name the body `<prefix>_<epoch-ms>.<ext>`, the scheme the page uses
    /// for its client-side downloads.
    pub fn timestamped(prefix: &str, ext: &str, bytes: Vec<u8>) -> Self {
        Self {
            filename: format!("{}_{}.{}", prefix, Utc::now().timestamp_millis(), ext),
            bytes,
        }
    }

    /// Write the document into `dir`, returning the full path. The body is
    /// sniffed first; a mismatch against the filename extension is worth a
    /// warning but never fails the save; the server owns the format.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        if let Some(expected) = self.filename.rsplit_once('.').map(|(_, e)| e) {
            match infer::get(&self.bytes) {
                Some(kind) if kind.extension() != expected => {
                    warn!(
                        filename = %self.filename,
                        detected = kind.extension(),
                        "downloaded body does not match its extension"
                    );
                }
                None => {
                    warn!(filename = %self.filename, "downloaded body has no recognizable type");
                }
                _ => {}
            }
        }

        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "saved download");
        Ok(path)
    }

    /// Same, but under an explicit path instead of the generated name.
    pub fn save_as(&self, path: &Path) -> Result<PathBuf> {
        std::fs::write(path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "saved download");
        Ok(path.to_path_buf())
    }
}
