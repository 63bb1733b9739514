//! Submission workflows, one per mode.
//!
//! This layer contains the client's domain logic separated from UI
//! concerns: validate the selection, build the multipart payload, post it,
//! and hand back a named download. The CLI is just one caller.
//!
//! Every handler follows the same contract: an empty qualifying selection
//! reports a user-facing error and makes no network call; the mode's
//! submission lock is taken for the duration and released on every exit
//! path; failures land in the mode's status area and are never retried.

pub mod checklist;
pub mod cutter;
pub mod download;
pub mod standard;
pub mod unidoc;

pub use checklist::submit_checklist;
pub use cutter::{extract_mix, extract_single, load_mix, load_single};
pub use download::Download;
pub use standard::submit_standard;
pub use unidoc::{preview_slot, submit_unidoc};
