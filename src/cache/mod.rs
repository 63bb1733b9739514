//! Versioned offline cache for the site's static assets.
//!
//! Assets live under one generation directory per cache version, keyed by
//! a hash of the absolute URL. Bumping [`CACHE_VERSION`] starts a fresh
//! generation; [`AssetCache::activate`] then deletes every older one, so
//! stale assets cannot outlive an upgrade.

pub mod policy;

pub use policy::{classify, FetchPolicy};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use crate::api::{HttpTransport, Transport};
use crate::config::Settings;
use crate::error::{ClientError, Result};

/// Version tag of the current cache generation. Bump on any change to the
/// precached assets.
pub const CACHE_VERSION: &str = "v4.1.2";

const CACHE_PREFIX: &str = "file-combiner-";

/// Name of the current generation directory.
pub fn cache_name() -> String {
    format!("{}{}", CACHE_PREFIX, CACHE_VERSION)
}

/// The app shell: every path fetched and stored up front so the site
/// renders offline.
pub const PRECACHE_MANIFEST: &[&str] = &[
    "/",
    "/index.html",
    "/about.html",
    "/help.html",
    "/contact.html",
    "/privacy.html",
    "/style.css",
    "/script.js",
    "/logo.jpg",
    "/icon-192.png",
    "/manifest.json",
];

/// Where a fetched asset's bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Network,
    Cache,
}

/// A served asset.
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    pub body: Vec<u8>,
    pub source: FetchSource,
}

/// Asset cache bound to one site origin.
pub struct AssetCache {
    origin: Url,
    api_host: String,
    transport: Arc<dyn Transport>,
    root: PathBuf,
    timeout: Duration,
}

impl AssetCache {
    /// Build a cache over the real HTTP transport, mirroring `origin` into
    /// the configured cache directory.
    pub fn new(settings: &Settings, origin: &str) -> Result<Self> {
        Self::with_transport(settings, origin, Arc::new(HttpTransport::new()))
    }

    /// Build a cache over any transport. Tests pass a mock here.
    pub fn with_transport(
        settings: &Settings,
        origin: &str,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let origin = Url::parse(origin)
            .map_err(|err| ClientError::Validation(format!("invalid origin {}: {}", origin, err)))?;
        let api_host = Url::parse(&settings.api_base)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();
        Ok(Self {
            origin,
            api_host,
            transport,
            root: settings.cache_dir.clone(),
            timeout: Duration::from_secs(settings.request_timeout),
        })
    }

    fn generation_dir(&self) -> PathBuf {
        self.root.join(cache_name())
    }

    /// Resolve a manifest path or absolute URL against the origin.
    fn resolve(&self, target: &str) -> Result<Url> {
        if let Ok(absolute) = Url::parse(target) {
            return Ok(absolute);
        }
        self.origin
            .join(target)
            .map_err(|err| ClientError::Validation(format!("invalid asset path {}: {}", target, err)))
    }

    fn entry_path(&self, url: &Url) -> PathBuf {
        let digest = blake3::hash(url.as_str().as_bytes());
        self.generation_dir().join(hex::encode(digest.as_bytes()))
    }

    /// Stored copy of `url`, if any. An unreadable entry counts as a miss:
    /// the cache can only ever degrade to the network.
    async fn read_entry(&self, url: &Url) -> Option<Vec<u8>> {
        match tokio::fs::read(self.entry_path(url)).await {
            Ok(body) => Some(body),
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    debug!(url = %url, error = %err, "cache read failed");
                }
                None
            }
        }
    }

    async fn store_entry(&self, url: &Url, body: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(self.generation_dir()).await?;
        tokio::fs::write(self.entry_path(url), body).await?;
        debug!(url = %url, bytes = body.len(), "cached asset");
        Ok(())
    }

    async fn fetch_network(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self.transport.get(url.as_str(), self.timeout).await?;
        response.success_body()
    }

    /// Precache the app shell: fetch every manifest path concurrently and
    /// store the results in the current generation. Any failure aborts the
    /// install, matching an atomic `addAll`.
    pub async fn install(&self) -> Result<()> {
        let fetches = PRECACHE_MANIFEST.iter().map(|path| async move {
            let url = self.resolve(path)?;
            let body = self.fetch_network(&url).await?;
            self.store_entry(&url, &body).await
        });
        futures::future::try_join_all(fetches).await?;
        info!(assets = PRECACHE_MANIFEST.len(), generation = %cache_name(), "precache complete");
        Ok(())
    }

    /// Delete every cache generation except the current one.
    pub async fn activate(&self) -> Result<()> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        let current = cache_name();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(CACHE_PREFIX) && name != current {
                info!(generation = %name, "purging stale cache generation");
                tokio::fs::remove_dir_all(entry.path()).await?;
            }
        }
        Ok(())
    }

    /// Serve one request under its classified policy.
    pub async fn fetch(&self, target: &str) -> Result<FetchedAsset> {
        let url = self.resolve(target)?;
        match classify(&url, &self.api_host) {
            FetchPolicy::Bypass => {
                let body = self.fetch_network(&url).await?;
                Ok(FetchedAsset {
                    body,
                    source: FetchSource::Network,
                })
            }
            FetchPolicy::NetworkFirst => match self.fetch_network(&url).await {
                Ok(body) => {
                    // cache updates are opportunistic; the fresh body is
                    // served either way
                    if let Err(err) = self.store_entry(&url, &body).await {
                        warn!(url = %url, error = %err, "cache write failed");
                    }
                    Ok(FetchedAsset {
                        body,
                        source: FetchSource::Network,
                    })
                }
                Err(err) => {
                    warn!(url = %url, error = %err, "network fetch failed, trying cache");
                    match self.read_entry(&url).await {
                        Some(body) => Ok(FetchedAsset {
                            body,
                            source: FetchSource::Cache,
                        }),
                        None => Err(err),
                    }
                }
            },
            FetchPolicy::CacheFirst => {
                if let Some(body) = self.read_entry(&url).await {
                    return Ok(FetchedAsset {
                        body,
                        source: FetchSource::Cache,
                    });
                }
                let body = self.fetch_network(&url).await?;
                // only same-origin assets join the cache; third-party
                // responses are served but not retained, and a failed
                // write never costs the caller the body
                if url.origin() == self.origin.origin() {
                    if let Err(err) = self.store_entry(&url, &body).await {
                        warn!(url = %url, error = %err, "cache write failed");
                    }
                }
                Ok(FetchedAsset {
                    body,
                    source: FetchSource::Network,
                })
            }
        }
    }
}
