use super::{AssetSource, FetchResponse, parse_listing};
use crate::common::errors::SourceError;
use crate::model::DirectoryEntry;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Listing {
    Entries(Vec<DirectoryEntry>),
    Body(String),
    Status(u16),
    TransportError,
}

const LISTING_URL: &str = "memory://themes";

/// Scripted in-memory source.
///
/// Serves assets registered with [`with_asset`](Self::with_asset), can fake
/// listing failures, per-path statuses, transport errors and latency, and
/// records every request it sees.
#[derive(Debug)]
pub struct MemoryAssetSource {
    listing: Listing,
    assets: HashMap<String, String>,
    statuses: HashMap<String, u16>,
    broken: HashSet<String>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<String>>,
}

impl Default for MemoryAssetSource {
    fn default() -> Self {
        Self {
            listing: Listing::Entries(Vec::new()),
            assets: HashMap::new(),
            statuses: HashMap::new(),
            broken: HashSet::new(),
            delays: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, entries: Vec<DirectoryEntry>) -> Self {
        self.listing = Listing::Entries(entries);
        self
    }

    /// Lists one folder per name.
    pub fn with_theme_dirs(self, names: &[&str]) -> Self {
        self.with_listing(names.iter().map(|name| DirectoryEntry::dir(name)).collect())
    }

    /// Answers the listing with a raw body, parsed like an HTTP listing.
    pub fn with_listing_body(mut self, body: &str) -> Self {
        self.listing = Listing::Body(body.to_string());
        self
    }

    pub fn with_listing_status(mut self, status: u16) -> Self {
        self.listing = Listing::Status(status);
        self
    }

    pub fn with_listing_transport_error(mut self) -> Self {
        self.listing = Listing::TransportError;
        self
    }

    pub fn with_asset(mut self, path: &str, body: &str) -> Self {
        self.assets.insert(path.to_string(), body.to_string());
        self
    }

    /// Answers `path` with `status` and an empty body.
    pub fn with_status(mut self, path: &str, status: u16) -> Self {
        self.statuses.insert(path.to_string(), status);
        self
    }

    pub fn with_transport_error(mut self, path: &str) -> Self {
        self.broken.insert(path.to_string());
        self
    }

    pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    /// Requests seen so far, formatted as `"LIST"`, `"HEAD <path>"` or `"GET <path>"`.
    pub fn requests(&self) -> Vec<String> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn request_count(&self, request: &str) -> usize {
        self.requests().iter().filter(|r| *r == request).count()
    }

    fn record(&self, request: String) {
        match self.requests.lock() {
            Ok(mut requests) => requests.push(request),
            Err(poisoned) => poisoned.into_inner().push(request),
        }
    }

    async fn simulate_latency(&self, path: &str) {
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
    }

    fn respond(&self, path: &str) -> Result<FetchResponse, SourceError> {
        if self.broken.contains(path) {
            return Err(SourceError::Transport {
                url: path.to_string(),
                reason: "connection reset".to_string(),
            });
        }
        if let Some(status) = self.statuses.get(path) {
            return Ok(FetchResponse {
                status: *status,
                body: String::new(),
            });
        }
        Ok(self
            .assets
            .get(path)
            .map(FetchResponse::ok)
            .unwrap_or_else(FetchResponse::not_found))
    }
}

#[async_trait]
impl AssetSource for MemoryAssetSource {
    async fn list_theme_directories(&self) -> Result<Vec<DirectoryEntry>, SourceError> {
        self.record("LIST".to_string());
        match &self.listing {
            Listing::Entries(entries) => Ok(entries.clone()),
            Listing::Body(body) => parse_listing(LISTING_URL, body),
            Listing::Status(status) => Err(SourceError::Status {
                url: LISTING_URL.to_string(),
                status: *status,
            }),
            Listing::TransportError => Err(SourceError::Transport {
                url: LISTING_URL.to_string(),
                reason: "network unreachable".to_string(),
            }),
        }
    }

    async fn probe(&self, path: &str) -> bool {
        self.record(format!("HEAD {path}"));
        self.simulate_latency(path).await;
        self.respond(path)
            .map(|response| response.is_success())
            .unwrap_or(false)
    }

    async fn fetch(&self, path: &str) -> Result<FetchResponse, SourceError> {
        self.record(format!("GET {path}"));
        self.simulate_latency(path).await;
        self.respond(path)
    }
}
