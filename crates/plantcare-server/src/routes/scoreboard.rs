use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/scoreboard: resolved-task counts per employee.
pub async fn get_scoreboard(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = tokio::task::spawn_blocking(move || {
        let entries = plantcare_core::scoreboard::scoreboard(&app.store)?;
        Ok::<_, plantcare_core::PlantError>(serde_json::json!({ "scoreboard": entries }))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}

/// GET /api/employees: everyone on any zone roster.
pub async fn list_employees(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = tokio::task::spawn_blocking(move || {
        let names = plantcare_core::scoreboard::employee_names(&app.store)?;
        Ok::<_, plantcare_core::PlantError>(serde_json::json!({ "employees": names }))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}
