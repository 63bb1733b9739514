//! The UI controller: one struct owning every selection store, the active
//! mode, the per-mode status areas, and the per-mode submission locks.
//!
//! All mutation goes through this owner on a single task, so no locking is
//! needed anywhere in the store layer.

use std::collections::{HashMap, HashSet};

use crate::mode::{CutterMode, Mode};
use crate::store::{ChecklistStore, MixCutter, SingleCutter, StandardStore, UniDocStore};

/// Category of a status message, driving its styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Processing,
    Success,
    Error,
}

/// One message in a mode's status area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub message: String,
}

/// Top-level application state.
pub struct App {
    mode: Mode,
    cutter_mode: CutterMode,
    pub standard: StandardStore,
    pub checklist: ChecklistStore,
    pub unidoc: UniDocStore,
    pub cutter_single: SingleCutter,
    pub cutter_mix: MixCutter,
    status: HashMap<Mode, StatusLine>,
    busy: HashSet<Mode>,
}

impl App {
    /// Fresh state, matching the page's first load: standard mode active
    /// and the example checklist sections seeded.
    pub fn new() -> Self {
        Self {
            mode: Mode::Standard,
            cutter_mode: CutterMode::default(),
            standard: StandardStore::new(),
            checklist: ChecklistStore::with_example_sections(),
            unidoc: UniDocStore::new(),
            cutter_single: SingleCutter::new(),
            cutter_mix: MixCutter::new(),
            status: HashMap::new(),
            busy: HashSet::new(),
        }
    }

    /// Same, but without the seeded checklist sections.
    pub fn empty() -> Self {
        Self {
            checklist: ChecklistStore::new(),
            ..Self::new()
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Presentational mode switch. Re-selecting the active mode is a
    /// no-op; stores are untouched either way.
    pub fn switch_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn cutter_mode(&self) -> CutterMode {
        self.cutter_mode
    }

    pub fn set_cutter_mode(&mut self, sub: CutterMode) {
        self.cutter_mode = sub;
    }

    /// Write a message into a mode's status area, replacing any prior one.
    pub fn report(&mut self, mode: Mode, kind: StatusKind, message: impl Into<String>) {
        self.status.insert(
            mode,
            StatusLine {
                kind,
                message: message.into(),
            },
        );
    }

    pub fn hide_status(&mut self, mode: Mode) {
        self.status.remove(&mode);
    }

    pub fn status(&self, mode: Mode) -> Option<&StatusLine> {
        self.status.get(&mode)
    }

    /// Take a mode's submission lock. Returns false when a submission from
    /// that mode is already in flight, preventing duplicate concurrent
    /// submissions from the same control.
    pub fn begin_submit(&mut self, mode: Mode) -> bool {
        self.busy.insert(mode)
    }

    /// Release the lock. Callers run this as a guaranteed cleanup step on
    /// every path out of a submission.
    pub fn finish_submit(&mut self, mode: Mode) {
        self.busy.remove(&mode);
    }

    pub fn is_busy(&self, mode: Mode) -> bool {
        self.busy.contains(&mode)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
