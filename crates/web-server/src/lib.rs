use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use configuration::ServerSettings;
use database::DbRepository;
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
}

/// Builds the router with every route, the request trace layer, and the body limit.
pub fn build_router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(|| async { "OK" }))
        .route("/clicked", post(handlers::clicked))
        .route("/todos", get(handlers::list_todos).post(handlers::create_todo))
        .route("/todos/toggle/:id", post(handlers::toggle_todo))
        .route("/todos/:id", delete(handlers::delete_todo))
        .with_state(Arc::new(state))
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit_bytes))
}

/// Serves the application until `shutdown` resolves.
///
/// The caller owns the repository and closes it once this returns.
pub async fn run_server(
    settings: &ServerSettings,
    db_repo: DbRepository,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr = settings.socket_addr();
    let app = build_router(AppState { db_repo }, settings.body_limit_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Web server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
