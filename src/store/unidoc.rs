//! UniDoc builder store: a slot-keyed file map plus the course metadata
//! fields submitted alongside the documents.
//!
//! Slot keys come from the document checklist the builder page renders
//! (each list item carries a stable key); a slot holds one file or a list
//! depending on whether its control allows multiple selections.

use std::collections::BTreeMap;

use super::FileHandle;

/// Payload stored under a slot key.
#[derive(Debug, Clone)]
pub enum SlotFiles {
    Single(FileHandle),
    Many(Vec<FileHandle>),
}

impl SlotFiles {
    /// First file in the slot, used for preview.
    pub fn first(&self) -> Option<&FileHandle> {
        match self {
            SlotFiles::Single(file) => Some(file),
            SlotFiles::Many(files) => files.first(),
        }
    }

    pub fn count(&self) -> usize {
        match self {
            SlotFiles::Single(_) => 1,
            SlotFiles::Many(files) => files.len(),
        }
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &FileHandle> + '_> {
        match self {
            SlotFiles::Single(file) => Box::new(std::iter::once(file)),
            SlotFiles::Many(files) => Box::new(files.iter()),
        }
    }
}

/// The flat metadata fields posted with a UniDoc submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocMetadata {
    pub program: String,
    pub code: String,
    pub coordinator: String,
    pub name: String,
    pub faculty: String,
    pub ltpc: String,
}

impl DocMetadata {
    /// Field name / value pairs in wire order.
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("program", self.program.as_str()),
            ("code", self.code.as_str()),
            ("coordinator", self.coordinator.as_str()),
            ("name", self.name.as_str()),
            ("faculty", self.faculty.as_str()),
            ("ltpc", self.ltpc.as_str()),
        ]
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Slot-keyed selection store for the document builder.
#[derive(Debug, Default)]
pub struct UniDocStore {
    slots: BTreeMap<String, SlotFiles>,
    metadata: DocMetadata,
}

impl UniDocStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a selection under a slot key, overwriting any prior value.
    /// Controls that allow multiple selections keep the whole list; others
    /// keep only the first file. An empty selection clears the slot.
    pub fn select(&mut self, key: impl Into<String>, files: Vec<FileHandle>, allows_multiple: bool) {
        let key = key.into();
        if files.is_empty() {
            self.slots.remove(&key);
            return;
        }
        let payload = if allows_multiple {
            SlotFiles::Many(files)
        } else {
            SlotFiles::Single(files.into_iter().next().expect("non-empty selection"))
        };
        self.slots.insert(key, payload);
    }

    pub fn slot(&self, key: &str) -> Option<&SlotFiles> {
        self.slots.get(key)
    }

    /// Remove one slot's selection.
    pub fn clear_slot(&mut self, key: &str) {
        self.slots.remove(key);
    }

    /// Clear every slot; optionally reset the metadata text fields too.
    pub fn reset_all(&mut self, clear_metadata: bool) {
        self.slots.clear();
        if clear_metadata {
            self.metadata.clear();
        }
    }

    /// Every stored file, slots flattened in key order.
    pub fn flattened(&self) -> Vec<&FileHandle> {
        self.slots.values().flat_map(|slot| slot.iter()).collect()
    }

    pub fn slots(&self) -> impl Iterator<Item = (&str, &SlotFiles)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn metadata(&self) -> &DocMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut DocMetadata {
        &mut self.metadata
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
