//! Key-value HTTP service: one SQLite table of JSON blobs behind
//! `/api/data/{key}`.

pub mod handlers;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::logging::init_logging;
use crate::core::settings::load_settings;
use crate::shared::paths::get_log_dir;
use crate::storage::Database;

/// Shared handler state. The database is set once, after which every
/// request sees it; before that, data routes answer 503.
#[derive(Clone, Default)]
pub struct KvState {
    store: Arc<OnceCell<Database>>,
}

impl KvState {
    pub fn uninitialized() -> Self {
        Self::default()
    }

    pub fn with_database(db: Database) -> Self {
        let state = Self::default();
        // A fresh cell is always empty.
        let _ = state.store.set(db);
        state
    }

    /// Installs the database. Returns `false` if one was already installed.
    pub fn initialize(&self, db: Database) -> bool {
        self.store.set(db).is_ok()
    }

    pub fn database(&self) -> Option<&Database> {
        self.store.get()
    }
}

/// Build the HTTP router for the key-value service.
pub fn build_router(state: KvState, body_limit: usize) -> Router {
    Router::new()
        .route(
            "/api/data/{key}",
            get(handlers::get_value)
                .post(handlers::save_value)
                .delete(handlers::delete_value),
        )
        .route("/health", get(handlers::health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(target: "server", "Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!(target: "server", "Shutdown signal received");
}

/// Binary entry point: load settings, start logging, serve until Ctrl-C.
///
/// The listener comes up before the database; requests arriving in
/// between get 503. A database that cannot be opened stops the process.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let _logging_guards = init_logging(&get_log_dir())?;
    let settings = load_settings();

    let state = KvState::uninitialized();
    let app = build_router(state.clone(), settings.body_limit_bytes);

    let listener = tokio::net::TcpListener::bind(&settings.bind_address).await?;
    tracing::info!(target: "server", "Backend server listening on {}", settings.bind_address);

    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    let db_path = settings.database_path();
    let db = tokio::task::spawn_blocking(move || Database::open(&db_path)).await?;
    match db {
        Ok(db) => {
            state.initialize(db);
        }
        Err(e) => {
            tracing::error!(target: "server", "Database initialization error: {}", e);
            server.abort();
            return Err(e.into());
        }
    }

    server.await??;
    tracing::info!(target: "server", "Server stopped");
    Ok(())
}
