//! Slack interactivity: button clicks on task messages and the completion form.
//!
//! ```text
//! block_actions  complete-task  ─▶ assignee? ─▶ open completion form
//!                                          └──▶ ephemeral warning
//! view_submission complete-task-modal ─▶ complete_task ─▶ ephemeral result
//! block_actions  delegate-task  ─▶ already assignee? ─▶ ephemeral
//!                                └─▶ delegate_task ─▶ retract + repost
//! ```
//!
//! Payloads are decoded before anything is read or written.

use chrono::NaiveDate;
use serde::Serialize;
use slack_client::{BlockActions, Interaction, ViewSubmission};

use crate::error::{PlantError, Result};
use crate::lifecycle::{complete_task, delegate_task, Completion};
use crate::notify::{MessageRef, Notifier, TaskNotice};
use crate::payload::{
    ActionPayload, ModalMetadata, COMPLETE_ACTION_ID, COMPLETE_MODAL_CALLBACK_ID,
    DELEGATE_ACTION_ID, NOTE_ACTION_ID, NOTE_BLOCK_ID,
};
use crate::store::Store;
use crate::types::{Plant, Task};

pub const COMPLETED_TEXT: &str = "✅ Task completed successfully!";
pub const ALREADY_COMPLETED_TEXT: &str = "🎉 Good news! This task has already been completed";
pub const ALREADY_ASSIGNED_TEXT: &str = "You are already assigned to this task!";

/// What an interaction ended up doing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InteractionOutcome {
    FormOpened,
    NotAssignee,
    Completed,
    AlreadyCompleted,
    AlreadyAssigned,
    Delegated { task: Task },
    Ignored,
}

/// Decode the `payload` form field of an interactivity request.
pub fn parse_interaction(raw: &str) -> Result<Interaction> {
    serde_json::from_str(raw).map_err(|e| PlantError::InvalidPayload(format!("interaction: {e}")))
}

pub fn handle_interaction(
    store: &Store,
    notifier: &dyn Notifier,
    interaction: &Interaction,
    today: NaiveDate,
) -> Result<InteractionOutcome> {
    match interaction {
        Interaction::BlockActions(actions) => {
            let Some(action) = actions.actions.first() else {
                return Ok(InteractionOutcome::Ignored);
            };
            match action.action_id.as_str() {
                COMPLETE_ACTION_ID => {
                    let payload = button_payload(action.value.as_deref())?;
                    open_completion(store, notifier, actions, &payload)
                }
                DELEGATE_ACTION_ID => {
                    let payload = button_payload(action.value.as_deref())?;
                    delegate_to_presser(store, notifier, actions, &payload)
                }
                other => {
                    tracing::debug!(action_id = other, "ignoring unknown action");
                    Ok(InteractionOutcome::Ignored)
                }
            }
        }
        Interaction::ViewSubmission(submission)
            if submission.view.callback_id == COMPLETE_MODAL_CALLBACK_ID =>
        {
            submit_completion(store, notifier, submission, today)
        }
        Interaction::ViewSubmission(submission) => {
            tracing::debug!(callback_id = %submission.view.callback_id, "ignoring unknown view");
            Ok(InteractionOutcome::Ignored)
        }
        Interaction::Unsupported => Ok(InteractionOutcome::Ignored),
    }
}

fn button_payload(value: Option<&str>) -> Result<ActionPayload> {
    let raw = value.ok_or_else(|| PlantError::InvalidPayload("button has no value".into()))?;
    ActionPayload::decode(raw)
}

fn channel_and_ts(actions: &BlockActions) -> Result<(String, String)> {
    let channel = actions
        .channel
        .as_ref()
        .map(|c| c.id.clone())
        .ok_or_else(|| PlantError::InvalidPayload("missing channel".into()))?;
    let ts = actions
        .message
        .as_ref()
        .map(|m| m.ts.clone())
        .ok_or_else(|| PlantError::InvalidPayload("missing message".into()))?;
    Ok((channel, ts))
}

/// The stored task behind a button. The assignee in the button value may be
/// stale, so ownership is always decided from this copy. A resolved task is
/// answered with [`ALREADY_COMPLETED_TEXT`] and yields `None`.
fn pending_task(
    store: &Store,
    notifier: &dyn Notifier,
    channel_id: &str,
    user_id: &str,
    payload: &ActionPayload,
) -> Result<Option<Task>> {
    let task = store
        .get::<Task>(&payload.task_id)?
        .map(|v| v.value)
        .ok_or_else(|| PlantError::TaskNotFound(payload.task_id.to_string()))?;
    if task.resolved {
        notifier.notify_user(channel_id, user_id, ALREADY_COMPLETED_TEXT)?;
        return Ok(None);
    }
    Ok(Some(task))
}

// ---------------------------------------------------------------------------
// Complete
// ---------------------------------------------------------------------------

fn open_completion(
    store: &Store,
    notifier: &dyn Notifier,
    actions: &BlockActions,
    payload: &ActionPayload,
) -> Result<InteractionOutcome> {
    let (channel_id, message_ts) = channel_and_ts(actions)?;
    let presser = actions.user.display_name();
    let Some(task) = pending_task(store, notifier, &channel_id, &actions.user.id, payload)? else {
        return Ok(InteractionOutcome::AlreadyCompleted);
    };

    if task.employee_name != presser {
        notifier.notify_user(
            &channel_id,
            &actions.user.id,
            &format!(
                "⚠️ This task is assigned to *{}*. Only they can complete it.\n\nYou are logged in as *{}*.",
                task.employee_name, presser
            ),
        )?;
        return Ok(InteractionOutcome::NotAssignee);
    }

    let trigger_id = actions
        .trigger_id
        .as_deref()
        .ok_or_else(|| PlantError::InvalidPayload("missing trigger_id".into()))?;
    let metadata = ModalMetadata {
        task_id: task.uuid,
        channel_id,
        message_ts,
        user_id: actions.user.id.clone(),
    };
    notifier.open_completion_form(trigger_id, &metadata)?;
    Ok(InteractionOutcome::FormOpened)
}

fn submit_completion(
    store: &Store,
    notifier: &dyn Notifier,
    submission: &ViewSubmission,
    today: NaiveDate,
) -> Result<InteractionOutcome> {
    let metadata = ModalMetadata::decode(&submission.view.private_metadata)?;
    let note = submission
        .view
        .state
        .input(NOTE_BLOCK_ID, NOTE_ACTION_ID)
        .map(str::to_string);

    let outcome = match complete_task(store, &metadata.task_id, note, today)? {
        Completion::Completed { .. } => {
            notifier.notify_user(&metadata.channel_id, &submission.user.id, COMPLETED_TEXT)?;
            InteractionOutcome::Completed
        }
        Completion::AlreadyCompleted { .. } => {
            notifier.notify_user(
                &metadata.channel_id,
                &submission.user.id,
                ALREADY_COMPLETED_TEXT,
            )?;
            InteractionOutcome::AlreadyCompleted
        }
    };
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Delegate
// ---------------------------------------------------------------------------

fn delegate_to_presser(
    store: &Store,
    notifier: &dyn Notifier,
    actions: &BlockActions,
    payload: &ActionPayload,
) -> Result<InteractionOutcome> {
    let (channel_id, message_ts) = channel_and_ts(actions)?;
    let presser = actions.user.display_name();
    let Some(current) = pending_task(store, notifier, &channel_id, &actions.user.id, payload)?
    else {
        return Ok(InteractionOutcome::AlreadyCompleted);
    };

    if current.employee_name == presser {
        notifier.notify_user(&channel_id, &actions.user.id, ALREADY_ASSIGNED_TEXT)?;
        return Ok(InteractionOutcome::AlreadyAssigned);
    }

    let task = delegate_task(store, &current.uuid, presser)?;
    notifier.retract(&MessageRef {
        channel: channel_id,
        ts: message_ts,
    })?;

    let notice = match store.get::<Plant>(&task.plant_uuid)? {
        Some(plant) => TaskNotice::new(&task, &plant.value),
        None => TaskNotice {
            task_uuid: task.uuid,
            plant_name: payload.plant_name.clone(),
            employee_name: task.employee_name.clone(),
            is_water: task.is_water,
            is_sun: task.is_sun,
            note: None,
        },
    };
    notifier.post_task(&notice)?;
    Ok(InteractionOutcome::Delegated { task })
}
