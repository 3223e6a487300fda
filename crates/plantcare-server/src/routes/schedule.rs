use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// POST /api/schedule: run the schedule generator for today.
pub async fn run_schedule(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let result = tokio::task::spawn_blocking(move || {
        let report = plantcare_core::schedule::create_schedule(
            &app.store,
            app.notifier.as_ref(),
            plantcare_core::duty::utc_today(),
        )?;
        Ok::<_, plantcare_core::PlantError>(serde_json::to_value(report)?)
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}

/// GET /api/schedule: every pending task.
pub async fn get_schedule(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let result = tokio::task::spawn_blocking(move || {
        let tasks = plantcare_core::schedule::get_schedule(&app.store)?;
        Ok::<_, plantcare_core::PlantError>(serde_json::json!({ "tasks": tasks }))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}
