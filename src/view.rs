//! Pure rendering: stores in, view descriptions out.
//!
//! Nothing here touches a host UI. The CLI (or any other front end) is a
//! thin adapter that prints these descriptions; tests assert on them
//! directly.

use crate::store::{
    ChecklistStore, CutterPhase, FileHandle, MixCutter, SingleCutter, StandardStore, UniDocStore,
};

/// Icon class for a file row, derived from the extension. Unknown
/// extensions fall back to the pdf icon, as the page does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    Pptx,
    Txt,
    Image,
}

impl FileKind {
    pub fn from_name(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, e)| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "docx" | "doc" => FileKind::Docx,
            "pptx" | "ppt" => FileKind::Pptx,
            "txt" => FileKind::Txt,
            "jpg" | "jpeg" | "png" | "gif" => FileKind::Image,
            _ => FileKind::Pdf,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Docx => "docx",
            FileKind::Pptx => "pptx",
            FileKind::Txt => "txt",
            FileKind::Image => "img",
        }
    }
}

/// Human-readable size, 1024-based with two decimals ("1.5 MB").
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let i = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let i = i.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(i as i32);
    let rounded = (value * 100.0).round() / 100.0;
    // Trim trailing zeros the way JS number formatting does
    let mut text = format!("{:.2}", rounded);
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    format!("{} {}", text, UNITS[i])
}

/// One rendered file entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub name: String,
    pub size_label: String,
    pub kind: FileKind,
}

impl FileRow {
    fn from_handle(file: &FileHandle) -> Self {
        Self {
            name: file.name().to_string(),
            size_label: format_file_size(file.size()),
            kind: FileKind::from_name(file.name()),
        }
    }
}

fn render_rows(files: &[FileHandle]) -> Vec<FileRow> {
    files.iter().map(FileRow::from_handle).collect()
}

/// Standard-mode panel: the file list plus visibility of the list and
/// action bar, both hidden while the store is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardView {
    pub rows: Vec<FileRow>,
    pub count: usize,
    pub list_visible: bool,
    pub actions_visible: bool,
}

pub fn render_standard(store: &StandardStore) -> StandardView {
    let rows = render_rows(store.files());
    let visible = !rows.is_empty();
    StandardView {
        count: rows.len(),
        rows,
        list_visible: visible,
        actions_visible: visible,
    }
}

/// One rendered checklist section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub id: u64,
    pub name: String,
    pub rows: Vec<FileRow>,
}

/// Checklist-mode panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistView {
    pub sections: Vec<SectionView>,
    pub actions_visible: bool,
    /// Placeholder shown when no sections exist yet.
    pub empty_hint: Option<&'static str>,
}

pub fn render_checklists(store: &ChecklistStore) -> ChecklistView {
    let sections: Vec<SectionView> = store
        .sections()
        .iter()
        .map(|s| SectionView {
            id: s.id(),
            name: s.name().to_string(),
            rows: render_rows(s.files()),
        })
        .collect();
    ChecklistView {
        actions_visible: !sections.is_empty(),
        empty_hint: sections
            .is_empty()
            .then_some("No checklist sections yet. Add a section to get started."),
        sections,
    }
}

/// One UniDoc slot: key plus the filename label the control shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotView {
    pub key: String,
    pub label: String,
}

pub fn render_unidoc(store: &UniDocStore) -> Vec<SlotView> {
    store
        .slots()
        .map(|(key, slot)| {
            let label = match slot.count() {
                1 => slot
                    .first()
                    .map(|f| f.name().to_string())
                    .unwrap_or_default(),
                n => format!("{} files selected", n),
            };
            SlotView {
                key: key.to_string(),
                label,
            }
        })
        .collect()
}

/// One page tile in a cutter grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCell {
    pub page: u32,
    pub selected: bool,
    pub has_thumbnail: bool,
}

/// Single-file cutter panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutterSingleView {
    pub file_name: Option<String>,
    pub pages: Vec<PageCell>,
    pub extract_enabled: bool,
}

pub fn render_cutter_single(cutter: &SingleCutter) -> CutterSingleView {
    let pages = match cutter.metadata() {
        Some(meta) => (1..=meta.page_count)
            .map(|page| PageCell {
                page,
                selected: cutter.selected_pages().contains(&page),
                has_thumbnail: meta.previews.iter().any(|p| p.page == page),
            })
            .collect(),
        None => Vec::new(),
    };
    CutterSingleView {
        file_name: cutter.file().map(|f| f.name().to_string()),
        extract_enabled: cutter.phase() == CutterPhase::Loaded
            && !cutter.selected_pages().is_empty(),
        pages,
    }
}

/// One file's grid in the mix cutter panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixFileView {
    pub key: String,
    pub name: String,
    pub pages: Vec<PageCell>,
}

pub fn render_cutter_mix(cutter: &MixCutter) -> Vec<MixFileView> {
    cutter
        .files()
        .iter()
        .enumerate()
        .map(|(index, file)| {
            let meta = &cutter.metadata()[index];
            let selection = cutter.selection(index);
            MixFileView {
                key: crate::store::cutter::file_key(index),
                name: file.name().to_string(),
                pages: (1..=meta.page_count)
                    .map(|page| PageCell {
                        page,
                        selected: selection.map(|s| s.contains(&page)).unwrap_or(false),
                        has_thumbnail: meta.previews.iter().any(|p| p.page == page),
                    })
                    .collect(),
            }
        })
        .collect()
}
