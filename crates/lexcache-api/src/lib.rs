//! Read-only HTTP API over the law store.
//!
//! `GET /laws/:law_type` answers with the current stored version as
//! `text/html`, after one pass of HTML entity decoding. Unknown keys get a
//! 404 with `{"error": "document not found"}`.

mod error;

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::Method;
use axum::response::Html;
use axum::routing::get;
use lexcache_store::DuckStore;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

pub use error::ApiError;

#[derive(Clone)]
struct AppState {
    store: Arc<DuckStore>,
}

/// Build the API router over a shared store handle.
pub fn router(store: Arc<DuckStore>) -> Router {
    Router::new()
        .route("/laws/:law_type", get(latest_law))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET])
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store })
}

/// Serve the API on an already-bound listener until the process exits.
pub async fn serve(listener: TcpListener, store: Arc<DuckStore>) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "API server listening");
    axum::serve(listener, router(store)).await
}

async fn latest_law(
    State(state): State<AppState>,
    Path(law_type): Path<String>,
) -> Result<Html<String>, ApiError> {
    // DuckDB calls block; keep them off the async workers.
    let store = Arc::clone(&state.store);
    let key = law_type.clone();
    let content = tokio::task::spawn_blocking(move || store.latest(&key)).await??;
    debug!(law_type = %law_type, bytes = content.len(), "serving law");
    Ok(Html(html_escape::decode_html_entities(&content).into_owned()))
}
