//! Storage layer: append-only document history in a single DuckDB file.

mod duck;
mod error;

pub use duck::DuckStore;
pub use error::StoreError;
