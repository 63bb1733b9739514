//! Page-cutter state, single-file and mix variants.
//!
//! The single-file flow is an explicit state machine
//! (`Empty -> Loaded -> Extracting -> Empty|Loaded`) so extraction can be
//! rejected unless a file and a non-empty selection both exist. The mix
//! variant keeps one selection set per uploaded file, keyed `file_<index>`.

use std::collections::BTreeSet;

use serde_json::{json, Value};

use super::FileHandle;
use crate::api::types::PageMetadata;
use crate::error::{ClientError, Result};

/// Form-field key for a file's selection set in mix mode.
pub fn file_key(index: usize) -> String {
    format!("file_{}", index)
}

/// Phase of the single-file cutter flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutterPhase {
    Empty,
    Loaded,
    Extracting,
}

/// Single-file page cutter: one optional file, its server-reported page
/// metadata, and the set of pages marked for removal.
#[derive(Debug)]
pub struct SingleCutter {
    phase: CutterPhase,
    file: Option<FileHandle>,
    metadata: Option<PageMetadata>,
    selected: BTreeSet<u32>,
}

impl Default for SingleCutter {
    fn default() -> Self {
        Self {
            phase: CutterPhase::Empty,
            file: None,
            metadata: None,
            selected: BTreeSet::new(),
        }
    }
}

impl SingleCutter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> CutterPhase {
        self.phase
    }

    /// Install a file and its page metadata, replacing any prior state.
    /// Rejected while an extraction is in flight.
    pub fn load(&mut self, file: FileHandle, metadata: PageMetadata) -> Result<()> {
        if self.phase == CutterPhase::Extracting {
            return Err(ClientError::Validation(
                "extraction in progress, please wait".to_string(),
            ));
        }
        self.file = Some(file);
        self.metadata = Some(metadata);
        self.selected.clear();
        self.phase = CutterPhase::Loaded;
        Ok(())
    }

    /// Flip page `n` in or out of the removal set. Toggling twice with the
    /// same argument restores the set exactly. Ignored unless a file is
    /// loaded.
    pub fn toggle_page(&mut self, n: u32) {
        if self.phase != CutterPhase::Loaded {
            return;
        }
        if !self.selected.remove(&n) {
            self.selected.insert(n);
        }
    }

    pub fn selected_pages(&self) -> &BTreeSet<u32> {
        &self.selected
    }

    pub fn file(&self) -> Option<&FileHandle> {
        self.file.as_ref()
    }

    pub fn metadata(&self) -> Option<&PageMetadata> {
        self.metadata.as_ref()
    }

    /// Guarded transition into `Extracting`: requires a loaded file and a
    /// non-empty selection.
    pub fn begin_extract(&mut self) -> Result<()> {
        if self.phase != CutterPhase::Loaded || self.file.is_none() {
            return Err(ClientError::Validation(
                "please upload a file first".to_string(),
            ));
        }
        if self.selected.is_empty() {
            return Err(ClientError::Validation(
                "please select at least one page to remove".to_string(),
            ));
        }
        self.phase = CutterPhase::Extracting;
        Ok(())
    }

    /// Leave `Extracting`. A successful extraction clears the selection;
    /// a failed one keeps it so the user can retry. Either way the file
    /// stays loaded.
    pub fn finish_extract(&mut self, success: bool) {
        if self.phase != CutterPhase::Extracting {
            return;
        }
        if success {
            self.selected.clear();
        }
        self.phase = CutterPhase::Loaded;
    }

    /// Discard the file, the page metadata, and the selection set.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Selection as the comma-separated wire format, ascending.
    pub fn pages_csv(&self) -> String {
        self.selected
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Mix-mode page cutter: parallel file and metadata lists plus one
/// selection set per file.
#[derive(Debug, Default)]
pub struct MixCutter {
    files: Vec<FileHandle>,
    metadata: Vec<PageMetadata>,
    selections: Vec<BTreeSet<u32>>,
}

impl MixCutter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the uploaded files and their metadata records (one per file,
    /// in input order), initializing an empty selection set per file.
    pub fn load(&mut self, files: Vec<FileHandle>, metadata: Vec<PageMetadata>) -> Result<()> {
        if files.len() != metadata.len() {
            return Err(ClientError::Validation(format!(
                "page info mismatch: {} files but {} metadata records",
                files.len(),
                metadata.len()
            )));
        }
        self.selections = vec![BTreeSet::new(); files.len()];
        self.files = files;
        self.metadata = metadata;
        Ok(())
    }

    pub fn files(&self) -> &[FileHandle] {
        &self.files
    }

    pub fn metadata(&self) -> &[PageMetadata] {
        &self.metadata
    }

    pub fn selection(&self, file_index: usize) -> Option<&BTreeSet<u32>> {
        self.selections.get(file_index)
    }

    /// Flip one page in one file's removal set; other files are untouched.
    pub fn toggle_page(&mut self, file_index: usize, page: u32) {
        if let Some(set) = self.selections.get_mut(file_index) {
            if !set.remove(&page) {
                set.insert(page);
            }
        }
    }

    /// Replace a file's selection with every page number its metadata
    /// reports.
    pub fn select_all(&mut self, file_index: usize) {
        if let (Some(set), Some(meta)) = (
            self.selections.get_mut(file_index),
            self.metadata.get(file_index),
        ) {
            *set = (1..=meta.page_count).collect();
        }
    }

    /// Empty one file's selection set.
    pub fn clear_selection(&mut self, file_index: usize) {
        if let Some(set) = self.selections.get_mut(file_index) {
            set.clear();
        }
    }

    /// Whether any file has at least one page marked.
    pub fn has_any_selection(&self) -> bool {
        self.selections.iter().any(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The `removal_data` JSON object: each file key mapped to its pages
    /// to remove, ascending.
    pub fn removal_data(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (index, set) in self.selections.iter().enumerate() {
            let pages: Vec<u32> = set.iter().copied().collect();
            map.insert(file_key(index), json!(pages));
        }
        Value::Object(map)
    }

    /// Reset everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> FileHandle {
        FileHandle::new(name, vec![0u8; 8])
    }

    fn meta(name: &str, pages: u32) -> PageMetadata {
        PageMetadata {
            original_name: name.to_string(),
            page_count: pages,
            previews: Vec::new(),
        }
    }

    #[test]
    fn single_flow_guards_extract() {
        let mut cutter = SingleCutter::new();
        assert!(cutter.begin_extract().is_err()); // empty

        cutter.load(file("doc.pdf"), meta("doc.pdf", 4)).unwrap();
        assert!(cutter.begin_extract().is_err()); // no selection

        cutter.toggle_page(2);
        assert!(cutter.begin_extract().is_ok());
        assert_eq!(cutter.phase(), CutterPhase::Extracting);

        // loading mid-extraction is rejected
        assert!(cutter.load(file("other.pdf"), meta("other.pdf", 1)).is_err());

        cutter.finish_extract(true);
        assert_eq!(cutter.phase(), CutterPhase::Loaded);
        assert!(cutter.selected_pages().is_empty());
    }

    #[test]
    fn toggle_twice_restores_the_set() {
        let mut cutter = SingleCutter::new();
        cutter.load(file("doc.pdf"), meta("doc.pdf", 5)).unwrap();
        cutter.toggle_page(1);
        cutter.toggle_page(4);
        let before = cutter.selected_pages().clone();
        cutter.toggle_page(3);
        cutter.toggle_page(3);
        assert_eq!(*cutter.selected_pages(), before);
    }

    #[test]
    fn failed_extract_keeps_the_selection() {
        let mut cutter = SingleCutter::new();
        cutter.load(file("doc.pdf"), meta("doc.pdf", 3)).unwrap();
        cutter.toggle_page(1);
        cutter.begin_extract().unwrap();
        cutter.finish_extract(false);
        assert_eq!(cutter.pages_csv(), "1");
    }

    #[test]
    fn pages_csv_is_ascending() {
        let mut cutter = SingleCutter::new();
        cutter.load(file("doc.pdf"), meta("doc.pdf", 9)).unwrap();
        for n in [7, 2, 5] {
            cutter.toggle_page(n);
        }
        assert_eq!(cutter.pages_csv(), "2,5,7");
    }

    #[test]
    fn clear_returns_to_empty() {
        let mut cutter = SingleCutter::new();
        cutter.load(file("doc.pdf"), meta("doc.pdf", 2)).unwrap();
        cutter.toggle_page(1);
        cutter.clear();
        assert_eq!(cutter.phase(), CutterPhase::Empty);
        assert!(cutter.file().is_none());
        assert!(cutter.metadata().is_none());
        assert!(cutter.selected_pages().is_empty());
    }

    #[test]
    fn mix_load_requires_matching_lengths() {
        let mut mix = MixCutter::new();
        let err = mix.load(vec![file("a.pdf")], vec![]);
        assert!(err.is_err());
    }

    #[test]
    fn mix_selections_are_independent() {
        let mut mix = MixCutter::new();
        mix.load(
            vec![file("a.pdf"), file("b.pdf")],
            vec![meta("a.pdf", 3), meta("b.pdf", 2)],
        )
        .unwrap();

        mix.toggle_page(0, 1);
        mix.toggle_page(1, 2);
        assert_eq!(mix.selection(0).unwrap().len(), 1);
        assert_eq!(mix.selection(1).unwrap().len(), 1);

        mix.clear_selection(0);
        assert!(mix.selection(0).unwrap().is_empty());
        assert_eq!(mix.selection(1).unwrap().len(), 1);
    }

    #[test]
    fn select_all_matches_metadata_page_list() {
        let mut mix = MixCutter::new();
        mix.load(vec![file("a.pdf")], vec![meta("a.pdf", 4)]).unwrap();
        mix.select_all(0);
        let pages: Vec<u32> = mix.selection(0).unwrap().iter().copied().collect();
        assert_eq!(pages, [1, 2, 3, 4]);
    }

    #[test]
    fn removal_data_keys_every_file() {
        let mut mix = MixCutter::new();
        mix.load(
            vec![file("a.pdf"), file("b.pdf")],
            vec![meta("a.pdf", 3), meta("b.pdf", 2)],
        )
        .unwrap();
        mix.toggle_page(0, 1);
        mix.toggle_page(1, 2);
        assert_eq!(
            mix.removal_data(),
            serde_json::json!({"file_0": [1], "file_1": [2]})
        );
    }
}
