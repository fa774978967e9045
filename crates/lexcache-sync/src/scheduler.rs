//! Periodic refresh: fetch, decode, sanitize and store every tracked law.

use std::sync::Arc;
use std::time::{Duration, Instant};

use lexcache_core::{Config, DecodeError, DocumentSource, Sanitizer, decode_legacy};
use lexcache_store::{DuckStore, StoreError};
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::fetch::{Fetch, FetchError};

/// Why one document was skipped in a cycle.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("store failed: {0}")]
    Store(#[from] StoreError),
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Outcome of one pass over the source list, in source order.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Keys that got a new stored version.
    pub updated: Vec<String>,
    /// Keys that were skipped, with the error message.
    pub failed: Vec<(String, String)>,
}

impl CycleReport {
    pub fn all_failed(&self) -> bool {
        self.updated.is_empty() && !self.failed.is_empty()
    }
}

/// Runs the fetch → decode → sanitize → save pipeline over a fixed source list.
///
/// Documents are processed one at a time. A failure is logged and the cycle
/// moves on to the next document; nothing is retried.
pub struct Scheduler<F> {
    fetcher: F,
    store: Arc<DuckStore>,
    sanitizer: Sanitizer,
    sources: Vec<DocumentSource>,
    period: Duration,
}

impl<F: Fetch> Scheduler<F> {
    pub fn new(fetcher: F, store: Arc<DuckStore>, config: &Config) -> Self {
        Self {
            fetcher,
            store,
            sanitizer: Sanitizer::new(config.origin.clone()),
            sources: config.sources.clone(),
            period: config.refresh_interval,
        }
    }

    pub fn sources(&self) -> &[DocumentSource] {
        &self.sources
    }

    /// Refresh a single document. Returns the id of the stored version.
    pub async fn update(&self, source: &DocumentSource) -> Result<i64, UpdateError> {
        let bytes = self.fetcher.fetch(&source.url).await?;
        let text = decode_legacy(&bytes)?;
        // Parsing and the DuckDB insert both block; run them off the async workers.
        let sanitizer = self.sanitizer.clone();
        let store = Arc::clone(&self.store);
        let law_type = source.law_type.clone();
        let id = tokio::task::spawn_blocking(move || {
            let content = sanitizer.sanitize(&text);
            store.save(&law_type, &content)
        })
        .await??;
        Ok(id)
    }

    /// One pass over every source, sequentially and in order.
    pub async fn run_cycle(&self) -> CycleReport {
        let start = Instant::now();
        info!(sources = self.sources.len(), "update cycle started");

        let mut report = CycleReport::default();
        for source in &self.sources {
            match self.update(source).await {
                Ok(id) => {
                    info!(law_type = %source.law_type, id, "law updated");
                    report.updated.push(source.law_type.clone());
                }
                Err(e) => {
                    warn!(law_type = %source.law_type, url = %source.url, error = %e, "law update failed");
                    report.failed.push((source.law_type.clone(), e.to_string()));
                }
            }
        }

        info!(
            updated = report.updated.len(),
            failed = report.failed.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "update cycle finished"
        );
        report
    }

    /// Run a cycle now and then once per period, forever.
    ///
    /// Each cycle is awaited before the next tick is taken, so cycles never
    /// overlap; an overrunning cycle pushes the schedule back.
    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.run_cycle().await;
        }
    }
}
