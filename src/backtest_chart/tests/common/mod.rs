#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    io,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use backtest_chart::{
    config::ChartConfig,
    sources::{IoSnafu, SourceError, TextSource},
};
use snafu::IntoError;
use tokio::sync::Barrier;

/// Serves payloads from memory and records every requested path.
#[derive(Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
    fetched: Arc<Mutex<Vec<String>>>,
    stalled: HashSet<String>,
    gate: Option<(HashSet<String>, Barrier)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, text: &str) -> Self {
        self.files.insert(path.to_string(), text.to_string());
        self
    }

    /// Requests for `path` never complete.
    pub fn stalled(mut self, path: &str) -> Self {
        self.stalled.insert(path.to_string());
        self
    }

    /// Holds every request for one of `paths` until all of them are in
    /// flight at once.
    pub fn gated(mut self, paths: &[String]) -> Self {
        let paths: HashSet<String> = paths.iter().cloned().collect();
        let barrier = Barrier::new(paths.len());
        self.gate = Some((paths, barrier));
        self
    }

    /// Handle to the fetch log that stays valid after the source is boxed.
    pub fn fetch_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.fetched)
    }
}

#[async_trait]
impl TextSource for MemorySource {
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
        self.fetched.lock().unwrap().push(path.to_string());
        if self.stalled.contains(path) {
            std::future::pending::<()>().await;
        }
        if let Some((paths, barrier)) = &self.gate {
            if paths.contains(path) {
                barrier.wait().await;
            }
        }
        match self.files.get(path) {
            Some(text) => Ok(text.clone()),
            None => Err(IoSnafu { path }.into_error(io::Error::new(
                io::ErrorKind::NotFound,
                "no such payload",
            ))),
        }
    }
}

/// Default paths with no overlays configured.
pub fn bare_config() -> ChartConfig {
    ChartConfig {
        overlays: Vec::new(),
        ..ChartConfig::default()
    }
}

/// Title payloads for `BTCUSDT` with `1000.00` equity.
pub fn btc_source() -> MemorySource {
    MemorySource::new()
        .with("pairname.txt", "BTCUSDT\n")
        .with("equity.txt", " 1000.00\n")
}
