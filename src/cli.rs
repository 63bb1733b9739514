//! Command-line front end over the submission services.
//!
//! Each subcommand is a thin adapter: it loads files into the matching
//! store, calls the mode's submission handler, prints the status line the
//! handler produced, and saves the returned download.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::types::OutputFormat;
use crate::api::ApiClient;
use crate::app::{App, StatusKind};
use crate::cache::{AssetCache, FetchSource, PRECACHE_MANIFEST};
use crate::config::{load_settings, Settings};
use crate::mode::Mode;
use crate::services::cutter::page_info_payload;
use crate::services::{
    extract_mix, extract_single, load_mix, load_single, preview_slot, submit_checklist,
    submit_standard, submit_unidoc, Download,
};
use crate::store::FileHandle;
use crate::view::format_file_size;

#[derive(Parser)]
#[command(
    name = "fcomb",
    version,
    about = "Combine, organize, and trim documents via the File Combiner service"
)]
pub struct Cli {
    /// Service base URL override.
    #[arg(long, global = true, env = "FILECOMBINE_API_BASE")]
    pub api_base: Option<String>,

    /// Data directory override (the cache lives under it).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory generated documents are written into.
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Combine files into one document, in the given order.
    Combine {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format: pdf, docx, or pptx.
        #[arg(long, default_value = "pdf")]
        format: OutputFormat,
    },

    /// Combine checklist sections into one PDF with divider pages.
    Checklist {
        /// Section spec `NAME=file,file,...`; repeatable, order kept.
        #[arg(long = "section", required = true, value_name = "NAME=FILES")]
        sections: Vec<String>,
    },

    /// Assemble a UniDoc from slot-keyed files plus course metadata.
    Unidoc {
        /// Slot spec `KEY=file[,file...]`; repeatable.
        #[arg(long = "slot", required = true, value_name = "KEY=FILES")]
        slots: Vec<String>,

        #[arg(long, default_value = "")]
        program: String,
        #[arg(long, default_value = "")]
        code: String,
        #[arg(long, default_value = "")]
        coordinator: String,
        /// Course name (the `name` form field).
        #[arg(long = "course-name", default_value = "")]
        course_name: String,
        #[arg(long, default_value = "")]
        faculty: String,
        #[arg(long, default_value = "")]
        ltpc: String,

        /// Open the first file of this slot in the system viewer instead
        /// of submitting.
        #[arg(long, value_name = "KEY")]
        preview: Option<String>,
    },

    /// Show page counts and preview availability for files.
    Pages {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Remove pages from one file.
    Cut {
        file: PathBuf,

        /// Pages to remove, comma-separated, 1-based.
        #[arg(long, value_name = "PAGES")]
        remove: String,
    },

    /// Remove pages across several files and combine the remainder.
    Cutmix {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Removal spec `INDEX=PAGES`, e.g. `0=1,3`; repeatable.
        #[arg(long = "remove", required = true, value_name = "INDEX=PAGES")]
        removals: Vec<String>,
    },

    /// Check service liveness.
    Health,

    /// Manage the offline asset cache.
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Precache the site's app shell from an origin.
    Install {
        #[arg(long)]
        origin: String,
    },
    /// Delete stale cache generations.
    Activate {
        #[arg(long)]
        origin: String,
    },
    /// Fetch one asset under the offline policy.
    Fetch {
        #[arg(long)]
        origin: String,
        path: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = resolve_settings(&cli).await?;
    let api = ApiClient::new(&settings);
    let mut app = App::empty();

    match cli.command {
        Command::Combine { files, format } => {
            app.standard.add(read_files(&files)?);
            let bar = spinner("Processing files...");
            let result = submit_standard(&mut app, &api, format).await;
            bar.finish_and_clear();
            print_status(&app, Mode::Standard);
            save(result?, &settings)?;
        }
        Command::Checklist { sections } => {
            for spec in &sections {
                let (name, paths) = parse_keyed_spec(spec, "section")?;
                let id = app.checklist.add_section(Some(name));
                app.checklist.add_files(id, read_files(&paths)?);
            }
            let bar = spinner("Generating PDF with dividers...");
            let result = submit_checklist(&mut app, &api).await;
            bar.finish_and_clear();
            print_status(&app, Mode::Checklist);
            save(result?, &settings)?;
        }
        Command::Unidoc {
            slots,
            program,
            code,
            coordinator,
            course_name,
            faculty,
            ltpc,
            preview,
        } => {
            for spec in &slots {
                let (key, paths) = parse_keyed_spec(spec, "slot")?;
                let files = read_files(&paths)?;
                let allows_multiple = files.len() > 1;
                app.unidoc.select(key, files, allows_multiple);
            }
            if let Some(key) = preview {
                let path = preview_slot(&app.unidoc, &key).await?;
                println!("{}", style(path.display()).bold());
                // keep the process alive until the preview copy is cleaned up
                tokio::time::sleep(crate::services::unidoc::PREVIEW_TTL).await;
                return Ok(());
            }
            let metadata = app.unidoc.metadata_mut();
            metadata.program = program;
            metadata.code = code;
            metadata.coordinator = coordinator;
            metadata.name = course_name;
            metadata.faculty = faculty;
            metadata.ltpc = ltpc;

            let bar = spinner("Merging Uni Docs into PDF...");
            let result = submit_unidoc(&mut app, &api).await;
            bar.finish_and_clear();
            print_status(&app, Mode::UniDoc);
            save(result?, &settings)?;
        }
        Command::Pages { files } => {
            let handles = read_files(&files)?;
            let multi = handles.len() > 1;
            let records = api.get_page_info(page_info_payload(&handles), multi).await?;
            for (record, handle) in records.iter().zip(&handles) {
                println!(
                    "{}  {} pages, {} previews ({})",
                    style(&record.original_name).bold(),
                    record.page_count,
                    record.previews.len(),
                    format_file_size(handle.size()),
                );
            }
        }
        Command::Cut { file, remove } => {
            let handle = read_file(&file)?;
            let bar = spinner("Loading page previews...");
            let load = load_single(&mut app, &api, handle).await;
            bar.finish_and_clear();
            load?;
            for page in parse_pages(&remove)? {
                app.cutter_single.toggle_page(page);
            }
            let bar = spinner("Removing selected pages...");
            let result = extract_single(&mut app, &api).await;
            bar.finish_and_clear();
            print_status(&app, Mode::Cutter);
            save(result?, &settings)?;
        }
        Command::Cutmix { files, removals } => {
            let handles = read_files(&files)?;
            let count = handles.len();
            let bar = spinner("Loading page previews...");
            let load = load_mix(&mut app, &api, handles).await;
            bar.finish_and_clear();
            load?;
            for spec in &removals {
                let (index, pages) = parse_removal_spec(spec, count)?;
                for page in pages {
                    app.cutter_mix.toggle_page(index, page);
                }
            }
            let bar = spinner("Removing selected pages...");
            let result = extract_mix(&mut app, &api).await;
            bar.finish_and_clear();
            print_status(&app, Mode::Cutter);
            save(result?, &settings)?;
        }
        Command::Health => {
            if api.health().await {
                println!("{} {}", style("ok").green().bold(), api.base());
            } else {
                println!("{} {}", style("unreachable").red().bold(), api.base());
                std::process::exit(1);
            }
        }
        Command::Cache { command } => run_cache(command, &settings).await?,
    }

    Ok(())
}

async fn run_cache(command: CacheCommand, settings: &Settings) -> anyhow::Result<()> {
    match command {
        CacheCommand::Install { origin } => {
            let cache = AssetCache::new(settings, &origin)?;
            let bar = spinner("Precaching app shell...");
            let result = cache.install().await;
            bar.finish_and_clear();
            result?;
            println!(
                "cached {} assets from {}",
                PRECACHE_MANIFEST.len(),
                style(&origin).bold()
            );
        }
        CacheCommand::Activate { origin } => {
            let cache = AssetCache::new(settings, &origin)?;
            cache.activate().await?;
            println!("stale cache generations purged");
        }
        CacheCommand::Fetch { origin, path } => {
            let cache = AssetCache::new(settings, &origin)?;
            let asset = cache.fetch(&path).await?;
            let source = match asset.source {
                FetchSource::Network => "network",
                FetchSource::Cache => "cache",
            };
            println!(
                "{} {} ({})",
                style(source).cyan(),
                path,
                format_file_size(asset.body.len() as u64)
            );
        }
    }
    Ok(())
}

async fn resolve_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = load_settings().await;
    if let Some(ref data_dir) = cli.data_dir {
        settings.cache_dir = data_dir.join("cache");
        settings.data_dir = data_dir.clone();
    }
    if let Some(ref api_base) = cli.api_base {
        settings.api_base = api_base.trim_end_matches('/').to_string();
    }
    if let Some(ref output_dir) = cli.output_dir {
        settings.download_dir = output_dir.clone();
    }
    settings.ensure_directories()?;
    Ok(settings)
}

fn read_file(path: &Path) -> anyhow::Result<FileHandle> {
    FileHandle::from_path(path).with_context(|| format!("reading {}", path.display()))
}

fn read_files(paths: &[PathBuf]) -> anyhow::Result<Vec<FileHandle>> {
    paths.iter().map(|p| read_file(p)).collect()
}

/// Parse `NAME=file,file,...` into the name and its paths.
fn parse_keyed_spec(spec: &str, what: &str) -> anyhow::Result<(String, Vec<PathBuf>)> {
    let (name, rest) = spec
        .split_once('=')
        .with_context(|| format!("{} spec `{}` is missing `=`", what, spec))?;
    if name.is_empty() {
        bail!("{} spec `{}` has an empty name", what, spec);
    }
    let paths = rest
        .split(',')
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect();
    Ok((name.to_string(), paths))
}

fn parse_pages(csv: &str) -> anyhow::Result<Vec<u32>> {
    csv.split(',')
        .map(|p| {
            p.trim()
                .parse::<u32>()
                .with_context(|| format!("invalid page number `{}`", p))
        })
        .collect()
}

/// Parse `INDEX=PAGES` against the number of uploaded files.
fn parse_removal_spec(spec: &str, file_count: usize) -> anyhow::Result<(usize, Vec<u32>)> {
    let (index, pages) = spec
        .split_once('=')
        .with_context(|| format!("removal spec `{}` is missing `=`", spec))?;
    let index: usize = index
        .parse()
        .with_context(|| format!("invalid file index `{}`", index))?;
    if index >= file_count {
        bail!("file index {} out of range ({} files)", index, file_count);
    }
    Ok((index, parse_pages(pages)?))
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message.to_string());
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn print_status(app: &App, mode: Mode) {
    if let Some(line) = app.status(mode) {
        let styled = match line.kind {
            StatusKind::Processing => style(line.message.as_str()).dim(),
            StatusKind::Success => style(line.message.as_str()).green(),
            StatusKind::Error => style(line.message.as_str()).red(),
        };
        eprintln!("{}", styled);
    }
}

fn save(download: Download, settings: &Settings) -> anyhow::Result<()> {
    let path = download.save(&settings.download_dir)?;
    println!("{}", style(path.display()).bold());
    Ok(())
}
