pub mod error;
pub mod routes;
pub mod state;

use std::path::Path;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use plantcare_core::config::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with all routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let timeout = Duration::from_secs(app_state.config.request_timeout_secs.max(1));

    Router::new()
        // Slack
        .route("/slack/interact", post(routes::slack::interact))
        .route("/slack/commands", post(routes::slack::command))
        // Schedule
        .route("/api/schedule", post(routes::schedule::run_schedule))
        .route("/api/schedule", get(routes::schedule::get_schedule))
        // Tasks
        .route("/api/tasks", get(routes::tasks::list_tasks))
        .route(
            "/api/tasks/{id}/complete",
            post(routes::tasks::complete_task),
        )
        .route(
            "/api/tasks/{id}/delegate",
            post(routes::tasks::delegate_task),
        )
        // Scoreboard
        .route("/api/scoreboard", get(routes::scoreboard::get_scoreboard))
        .route("/api/employees", get(routes::scoreboard::list_employees))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the plantcare server for the workspace at `root`.
pub async fn serve(root: &Path, config: Config, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    serve_on(root, config, listener).await
}

/// Start the server on a pre-bound listener (port 0 lets the OS choose).
pub async fn serve_on(
    root: &Path,
    config: Config,
    listener: tokio::net::TcpListener,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(AppState::open(root, config)?);

    tracing::info!("plantcare server listening on http://localhost:{actual_port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
