use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no stored version for {0}")]
    NotFound(String),

    #[error("duckdb error: {0}")]
    DuckDb(#[from] ::duckdb::Error),

    #[error("store connection lock poisoned")]
    Poisoned,
}
