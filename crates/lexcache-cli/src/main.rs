mod display;

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use lexcache_core::config::{DEFAULT_DATABASE, DEFAULT_PORT, DEFAULT_PROXY_BASE};
use lexcache_core::{Config, PLANALTO_ORIGIN, load_sources};
use lexcache_store::{DuckStore, StoreError};
use lexcache_sync::{ProxyFetcher, Scheduler};
use tracing::info;

const MAX_INTERVAL_HOURS: u64 = 24 * 366;

#[derive(Parser)]
#[command(name = "lexcache", version, about = "Scrapes and caches Brazilian federal legal texts")]
struct Cli {
    /// DuckDB file holding the law history.
    #[arg(long, env = "LEXCACHE_DATABASE", default_value = DEFAULT_DATABASE, global = true)]
    database: PathBuf,

    /// JSON file replacing the built-in source list: `[{"type": "...", "url": "..."}]`.
    #[arg(long, global = true)]
    sources: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh on a schedule and serve `GET /laws/:law_type`.
    Serve {
        #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,
        /// Content proxy endpoint; the page URL is passed as `?url=`.
        #[arg(long, default_value = DEFAULT_PROXY_BASE)]
        proxy: String,
        /// Prefix for root-relative stylesheet links.
        #[arg(long, default_value = PLANALTO_ORIGIN)]
        origin: String,
        /// Hours between refresh cycles, at most one year.
        #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_HOURS))]
        interval_hours: u64,
    },
    /// Run a single update cycle and exit.
    Refresh {
        #[arg(long, default_value = DEFAULT_PROXY_BASE)]
        proxy: String,
        #[arg(long, default_value = PLANALTO_ORIGIN)]
        origin: String,
    },
    /// Print the latest cached version of a law.
    Show { law_type: String },
    /// List stored versions of a law, newest first.
    History { law_type: String },
    /// List the tracked sources.
    Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `show` output can be piped.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = Config {
        database: cli.database,
        ..Config::default()
    };
    if let Some(path) = &cli.sources {
        config.sources = load_sources(path)?;
    }

    match cli.command {
        Command::Serve {
            port,
            host,
            proxy,
            origin,
            interval_hours,
        } => {
            config.port = port;
            config.host = host;
            config.proxy_base = proxy;
            config.origin = origin;
            config.refresh_interval = Duration::from_secs(interval_hours * 60 * 60);
            serve(config).await
        }
        Command::Refresh { proxy, origin } => {
            config.proxy_base = proxy;
            config.origin = origin;
            refresh(config).await
        }
        Command::Show { law_type } => {
            let store = open_store(&config)?;
            match store.latest(&law_type) {
                Ok(content) => {
                    println!("{}", html_escape::decode_html_entities(&content));
                    Ok(())
                }
                Err(StoreError::NotFound(_)) => bail!("document not found: {law_type}"),
                Err(e) => Err(e.into()),
            }
        }
        Command::History { law_type } => {
            let store = open_store(&config)?;
            let versions = store.history(&law_type)?;
            print!("{}", display::history_table(&law_type, &versions));
            Ok(())
        }
        Command::Sources => {
            print!("{}", display::sources_table(&config.sources));
            Ok(())
        }
    }
}

fn open_store(config: &Config) -> anyhow::Result<DuckStore> {
    DuckStore::open_persistent(&config.database)
        .with_context(|| format!("opening {}", config.database.display()))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!("lexcache v{}", env!("CARGO_PKG_VERSION"));
    let store = Arc::new(open_store(&config)?);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    let scheduler = Scheduler::new(
        ProxyFetcher::new(config.proxy_base.clone()),
        Arc::clone(&store),
        &config,
    );
    info!(
        sources = scheduler.sources().len(),
        interval_secs = config.refresh_interval.as_secs(),
        "scheduler started"
    );
    tokio::spawn(async move { scheduler.run().await });

    lexcache_api::serve(listener, store).await?;
    Ok(())
}

async fn refresh(config: Config) -> anyhow::Result<()> {
    let store = Arc::new(open_store(&config)?);
    let scheduler = Scheduler::new(
        ProxyFetcher::new(config.proxy_base.clone()),
        store,
        &config,
    );
    let report = scheduler.run_cycle().await;
    print!("{}", display::cycle_summary(&report));
    if report.all_failed() {
        bail!("every source failed to update");
    }
    Ok(())
}
