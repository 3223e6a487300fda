use axum::extract::State;
use axum::http::StatusCode;
use axum::{Form, Json};

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct InteractForm {
    pub payload: String,
}

#[derive(serde::Deserialize)]
pub struct CommandForm {
    pub command: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// POST /slack/interact: button clicks and form submissions.
///
/// Slack only needs an empty 200; user feedback goes out as ephemeral
/// messages.
pub async fn interact(
    State(app): State<AppState>,
    Form(form): Form<InteractForm>,
) -> Result<StatusCode, AppError> {
    let outcome = tokio::task::spawn_blocking(move || {
        let interaction = plantcare_core::interact::parse_interaction(&form.payload)?;
        plantcare_core::interact::handle_interaction(
            &app.store,
            app.notifier.as_ref(),
            &interaction,
            plantcare_core::duty::utc_today(),
        )
    })
    .await
    .map_err(AppError::join)??;

    tracing::debug!(?outcome, "interaction handled");
    Ok(StatusCode::OK)
}

/// POST /slack/commands: slash commands. Only `/scoreboard` is known.
pub async fn command(
    State(app): State<AppState>,
    Form(form): Form<CommandForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    if form.command != "/scoreboard" {
        tracing::debug!(command = %form.command, "unknown slash command");
        return Ok(Json(serde_json::json!({
            "response_type": "ephemeral",
            "text": format!("Unknown command {}", form.command),
        })));
    }

    tracing::info!(user = ?form.user_id, "scoreboard requested");
    tokio::task::spawn_blocking(move || {
        let entries = plantcare_core::scoreboard::scoreboard(&app.store)?;
        app.notifier.post_scoreboard(&entries)?;
        Ok::<_, plantcare_core::PlantError>(())
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(serde_json::json!({
        "response_type": "ephemeral",
        "text": "Posting the scoreboard…",
    })))
}
