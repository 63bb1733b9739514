//! In-memory selection stores, one per mode.
//!
//! Stores are process-local and tab-lifetime: they are mutated only by the
//! owning controller, fully reset by their mode's clear action, and carry no
//! persistence. Each store pairs with a pure render function in
//! [`crate::view`].

pub mod checklist;
pub mod cutter;
pub mod standard;
pub mod unidoc;

pub use checklist::ChecklistStore;
pub use cutter::{CutterPhase, MixCutter, SingleCutter};
pub use standard::StandardStore;
pub use unidoc::{DocMetadata, SlotFiles, UniDocStore};

use std::path::Path;

use serde::Serialize;

/// Extensions the combining service accepts. Selections outside this list
/// still upload; the service rejects them server-side, so the client only
/// warns.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "docx", "doc", "pptx", "ppt", "txt", "jpg", "jpeg", "png", "gif",
];

/// A user-selected file held in memory until submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileHandle {
    name: String,
    #[serde(skip)]
    bytes: Vec<u8>,
}

impl FileHandle {
    /// Wrap an in-memory selection.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk into a handle, keeping only the final path
    /// component as the display name.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Lower-cased extension, if any.
    pub fn extension(&self) -> Option<String> {
        self.name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())
    }

    /// Whether the service is known to accept this file type.
    pub fn is_allowed(&self) -> bool {
        self.extension()
            .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }
}
