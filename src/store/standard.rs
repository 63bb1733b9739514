//! Standard-mode selection store.
//!
//! An ordered sequence of files; order is combination order in the output.
//! Duplicates are not rejected.

use super::FileHandle;

/// Ordered file selection for the standard combine mode.
#[derive(Debug, Default)]
pub struct StandardStore {
    files: Vec<FileHandle>,
}

impl StandardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append files to the end of the selection, preserving input order.
    pub fn add(&mut self, files: impl IntoIterator<Item = FileHandle>) {
        self.files.extend(files);
    }

    /// Remove the file at `index`. Out-of-range indices are a no-op; the
    /// relative order of the remaining files never changes.
    pub fn remove(&mut self, index: usize) -> Option<FileHandle> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    /// Empty the selection.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &[FileHandle] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> FileHandle {
        FileHandle::new(name, name.as_bytes().to_vec())
    }

    #[test]
    fn add_preserves_selection_order() {
        let mut store = StandardStore::new();
        store.add([file("a.pdf"), file("b.docx")]);
        store.add([file("c.txt")]);
        let names: Vec<_> = store.files().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["a.pdf", "b.docx", "c.txt"]);
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut store = StandardStore::new();
        store.add([file("a.pdf"), file("b.pdf"), file("c.pdf"), file("d.pdf")]);
        let removed = store.remove(1).unwrap();
        assert_eq!(removed.name(), "b.pdf");
        let names: Vec<_> = store.files().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["a.pdf", "c.pdf", "d.pdf"]);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut store = StandardStore::new();
        store.add([file("a.pdf")]);
        assert!(store.remove(5).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicates_are_accepted() {
        let mut store = StandardStore::new();
        store.add([file("a.pdf"), file("a.pdf")]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = StandardStore::new();
        store.add([file("a.pdf")]);
        store.clear();
        assert!(store.is_empty());
    }
}
