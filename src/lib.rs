//! Client for the File Combiner document-combining service.
//!
//! The crate mirrors the service's four modes (standard combination,
//! checklist combination with divider pages, the UniDoc builder, and the
//! page cutter) as in-memory selection stores ([`store`]), pure view
//! renderers ([`view`]), and per-mode submission services ([`services`])
//! over a typed API client ([`api`]). A versioned offline asset cache
//! ([`cache`]) mirrors the site's static shell for offline use. The
//! `fcomb` binary is a thin CLI adapter over all of it.

pub mod api;
pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod mode;
pub mod services;
pub mod store;
pub mod view;

pub use api::ApiClient;
pub use app::App;
pub use config::Settings;
pub use error::{ClientError, Result};
pub use mode::{CutterMode, Mode};
