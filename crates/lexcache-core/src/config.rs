//! Process configuration shared by the scheduler and the HTTP server.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::sanitize::PLANALTO_ORIGIN;
use crate::source::{DocumentSource, catalogue};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE: &str = "laws.duckdb";
pub const DEFAULT_PROXY_BASE: &str = "https://api.allorigins.win/raw";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Everything the running service needs, built once at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// DuckDB file holding the `laws` table.
    pub database: PathBuf,
    /// Content-proxy endpoint; the target URL is passed as its `url` query parameter.
    pub proxy_base: String,
    /// Prefix for root-relative stylesheet links.
    pub origin: String,
    pub refresh_interval: Duration,
    pub sources: Vec<DocumentSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            database: PathBuf::from(DEFAULT_DATABASE),
            proxy_base: DEFAULT_PROXY_BASE.to_string(),
            origin: PLANALTO_ORIGIN.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            sources: catalogue(),
        }
    }
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
