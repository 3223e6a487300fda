use axum::extract::{Path, Query, State};
use axum::Json;
use plantcare_core::notify::TaskNotice;
use plantcare_core::store::Page;
use plantcare_core::types::Plant;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct CompleteBody {
    #[serde(default)]
    pub additional_info: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct DelegateBody {
    pub employee_name: String,
}

/// GET /api/tasks?page_size&start_key: one page of tasks.
pub async fn list_tasks(
    State(app): State<AppState>,
    Query(page): Query<Page>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = tokio::task::spawn_blocking(move || {
        let page = plantcare_core::schedule::list_tasks(&app.store, &page)?;
        Ok::<_, plantcare_core::PlantError>(serde_json::to_value(page)?)
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}

/// POST /api/tasks/:id/complete: resolve a task.
///
/// A task that was already resolved answers 200 with
/// `"status": "task_already_completed"`.
pub async fn complete_task(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CompleteBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = tokio::task::spawn_blocking(move || {
        let completion = plantcare_core::lifecycle::complete_task(
            &app.store,
            &id,
            body.additional_info,
            plantcare_core::duty::utc_today(),
        )?;
        Ok::<_, plantcare_core::PlantError>(serde_json::to_value(completion)?)
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}

/// POST /api/tasks/:id/delegate: reassign a pending task and announce it.
pub async fn delegate_task(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<DelegateBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = tokio::task::spawn_blocking(move || {
        let task = plantcare_core::lifecycle::delegate_task(&app.store, &id, &body.employee_name)?;
        if let Some(plant) = app.store.get::<Plant>(&task.plant_uuid)? {
            app.notifier.post_task(&TaskNotice::new(&task, &plant.value))?;
        }
        Ok::<_, plantcare_core::PlantError>(serde_json::to_value(task)?)
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}
