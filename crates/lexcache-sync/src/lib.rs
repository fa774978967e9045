//! Sync layer: pulls the tracked pages through the content proxy and
//! refreshes the store on a fixed period.

pub mod fetch;
pub mod scheduler;

pub use fetch::{Fetch, FetchError, ProxyFetcher};
pub use scheduler::{CycleReport, Scheduler, UpdateError};
