//! Checklist-mode store: named sections of files, each becoming one
//! divider-separated block in the combined output.

use super::FileHandle;

/// One named section of the checklist.
#[derive(Debug)]
pub struct Section {
    id: u64,
    name: String,
    files: Vec<FileHandle>,
}

impl Section {
    /// Locally generated id, unique and stable for the store's lifetime.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn files(&self) -> &[FileHandle] {
        &self.files
    }

    /// A section qualifies for submission once it holds at least one file.
    pub fn qualifies(&self) -> bool {
        !self.files.is_empty()
    }
}

/// Collection of checklist sections with a monotonic id counter. Ids are
/// never reused, and deleting a section does not renumber the rest.
#[derive(Debug, Default)]
pub struct ChecklistStore {
    sections: Vec<Section>,
    next_id: u64,
}

impl ChecklistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sections the deployed page seeds on first load.
    pub fn with_example_sections() -> Self {
        let mut store = Self::new();
        store.add_section(Some("Exam Files".to_string()));
        store.add_section(Some("Fees Files".to_string()));
        store.add_section(Some("Student ID Proofs".to_string()));
        store
    }

    /// Create a section with the given name, or `"Section N"` where N is
    /// the section count at creation time plus one. Returns the new id.
    pub fn add_section(&mut self, name: Option<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let name = match name {
            Some(n) if !n.is_empty() => n,
            _ => format!("Section {}", self.sections.len() + 1),
        };
        self.sections.push(Section {
            id,
            name,
            files: Vec::new(),
        });
        id
    }

    /// Rename a section. Unknown ids are a no-op.
    pub fn rename(&mut self, id: u64, name: impl Into<String>) {
        if let Some(section) = self.section_mut(id) {
            section.name = name.into();
        }
    }

    /// Remove a section by id without renumbering the remainder.
    pub fn delete(&mut self, id: u64) {
        self.sections.retain(|s| s.id != id);
    }

    /// Append files to a section. Unknown ids are a no-op.
    pub fn add_files(&mut self, id: u64, files: impl IntoIterator<Item = FileHandle>) {
        if let Some(section) = self.section_mut(id) {
            section.files.extend(files);
        }
    }

    /// Remove one file from a section by position.
    pub fn remove_file(&mut self, id: u64, index: usize) {
        if let Some(section) = self.section_mut(id) {
            if index < section.files.len() {
                section.files.remove(index);
            }
        }
    }

    /// Drop every section. The id counter is not reset, so ids stay unique
    /// across clear-and-rebuild cycles.
    pub fn clear(&mut self) {
        self.sections.clear();
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: u64) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    fn section_mut(&mut self, id: u64) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    /// Sections with at least one file, in stored order.
    pub fn qualifying(&self) -> Vec<&Section> {
        self.sections.iter().filter(|s| s.qualifies()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
