//! Notification composer and the seam to the messaging client.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use slack_client::{
    Block, ButtonStyle, Element, ModalView, PostMessage, RetryPolicy, SlackClient, Text,
};
use uuid::Uuid;

use crate::config::Config;
use crate::duty::DutyCheck;
use crate::error::{PlantError, Result};
use crate::payload::{
    ActionPayload, ModalMetadata, COMPLETE_ACTION_ID, COMPLETE_MODAL_CALLBACK_ID,
    DELEGATE_ACTION_ID, NOTE_ACTION_ID, NOTE_BLOCK_ID,
};
use crate::scoreboard::ScoreEntry;
use crate::types::{Plant, Task};

// ---------------------------------------------------------------------------
// TaskNotice / MessageRef
// ---------------------------------------------------------------------------

/// Everything a task notification shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskNotice {
    pub task_uuid: Uuid,
    pub plant_name: String,
    pub employee_name: String,
    pub is_water: bool,
    pub is_sun: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TaskNotice {
    pub fn new(task: &Task, plant: &Plant) -> Self {
        Self {
            task_uuid: task.uuid,
            plant_name: plant.name.clone(),
            employee_name: task.employee_name.clone(),
            is_water: task.is_water,
            is_sun: task.is_sun,
            note: plant.additional_info.clone(),
        }
    }

    fn duties(&self) -> DutyCheck {
        DutyCheck {
            water: self.is_water,
            sun: self.is_sun,
        }
    }

    fn action_payload(&self) -> ActionPayload {
        ActionPayload {
            task_id: self.task_uuid,
            employee_name: self.employee_name.clone(),
            plant_name: self.plant_name.clone(),
        }
    }
}

/// Where a posted notification lives, so it can be retracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel: String,
    pub ts: String,
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

pub fn compose_task_message(notice: &TaskNotice, channel: &str) -> Result<PostMessage> {
    let value = notice.action_payload().encode()?;
    let duties = notice.duties().label();

    let mut fields = vec![
        Text::mrkdwn(format!("*Plant:*\n{}", notice.plant_name)),
        Text::mrkdwn(format!("*Employee:*\n{}", notice.employee_name)),
        Text::mrkdwn(format!("*Actions:*\n{duties}")),
    ];
    if let Some(note) = &notice.note {
        fields.push(Text::mrkdwn(format!("*Notes:*\n{note}")));
    }

    Ok(PostMessage {
        channel: channel.to_string(),
        text: format!(
            "{}: {} for {}",
            notice.employee_name, duties, notice.plant_name
        ),
        blocks: vec![
            Block::Header {
                text: Text::plain("🪴 Plant care task"),
            },
            Block::Section { text: None, fields },
            Block::Actions {
                block_id: Some(format!("task-{}", notice.task_uuid)),
                elements: vec![
                    Element::Button {
                        text: Text::plain("Complete"),
                        action_id: COMPLETE_ACTION_ID.to_string(),
                        value: value.clone(),
                        style: Some(ButtonStyle::Primary),
                    },
                    Element::Button {
                        text: Text::plain("Delegate to self"),
                        action_id: DELEGATE_ACTION_ID.to_string(),
                        value,
                        style: None,
                    },
                ],
            },
        ],
    })
}

/// The completion form: one optional free-text note.
pub fn compose_completion_form(metadata: &ModalMetadata) -> Result<ModalView> {
    let mut view = ModalView::new(COMPLETE_MODAL_CALLBACK_ID, "Complete task");
    view.private_metadata = metadata.encode()?;
    view.submit = Some(Text::plain("Submit"));
    view.close = Some(Text::plain("Cancel"));
    view.blocks = vec![
        Block::Section {
            text: Some(Text::mrkdwn("Do you want to add additional info?")),
            fields: vec![],
        },
        Block::Input {
            block_id: NOTE_BLOCK_ID.to_string(),
            label: Text::plain("Additional Info"),
            element: Element::PlainTextInput {
                action_id: NOTE_ACTION_ID.to_string(),
                multiline: true,
                placeholder: Some(Text::plain(
                    "Enter any additional information about completing this task...or don't",
                )),
            },
            optional: true,
        },
    ];
    Ok(view)
}

pub fn compose_scoreboard(entries: &[ScoreEntry], channel: &str) -> PostMessage {
    let body = if entries.is_empty() {
        "No tasks completed yet.".to_string()
    } else {
        entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. *{}*: {}", i + 1, e.employee_name, e.completed))
            .collect::<Vec<_>>()
            .join("\n")
    };
    PostMessage {
        channel: channel.to_string(),
        text: "Plant care scoreboard".to_string(),
        blocks: vec![
            Block::Header {
                text: Text::plain("🏆 Scoreboard"),
            },
            Block::Section {
                text: Some(Text::mrkdwn(body)),
                fields: vec![],
            },
        ],
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Outbound side of the messaging channel.
pub trait Notifier: Send + Sync {
    fn post_task(&self, notice: &TaskNotice) -> Result<MessageRef>;

    fn retract(&self, message: &MessageRef) -> Result<()>;

    /// A message only `user_id` sees, in `channel_id`.
    fn notify_user(&self, channel_id: &str, user_id: &str, text: &str) -> Result<()>;

    fn open_completion_form(&self, trigger_id: &str, metadata: &ModalMetadata) -> Result<()>;

    fn post_scoreboard(&self, entries: &[ScoreEntry]) -> Result<MessageRef>;
}

/// [`Notifier`] backed by the Slack Web API.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: SlackClient,
    channel_id: String,
}

impl SlackNotifier {
    pub fn new(client: SlackClient, channel_id: impl Into<String>) -> Self {
        Self {
            client,
            channel_id: channel_id.into(),
        }
    }

    /// Build from config; `None` when the token or channel is missing.
    pub fn from_config(config: &Config) -> Option<Self> {
        let token = config.slack.bot_token.as_deref().filter(|t| !t.is_empty())?;
        let channel = config.slack.channel_id.as_deref().filter(|c| !c.is_empty())?;
        let client = SlackClient::with_base(token, &config.slack.api_base)
            .with_retry(RetryPolicy::with_attempts(config.retry_attempts));
        Some(Self::new(client, channel))
    }
}

impl Notifier for SlackNotifier {
    fn post_task(&self, notice: &TaskNotice) -> Result<MessageRef> {
        let message = compose_task_message(notice, &self.channel_id)?;
        let posted = self.client.post_message(&message)?;
        Ok(MessageRef {
            channel: posted.channel,
            ts: posted.ts,
        })
    }

    fn retract(&self, message: &MessageRef) -> Result<()> {
        Ok(self.client.delete_message(&message.channel, &message.ts)?)
    }

    fn notify_user(&self, channel_id: &str, user_id: &str, text: &str) -> Result<()> {
        Ok(self.client.post_ephemeral(channel_id, user_id, text)?)
    }

    fn open_completion_form(&self, trigger_id: &str, metadata: &ModalMetadata) -> Result<()> {
        let view = compose_completion_form(metadata)?;
        Ok(self.client.open_view(trigger_id, &view)?)
    }

    fn post_scoreboard(&self, entries: &[ScoreEntry]) -> Result<MessageRef> {
        let posted = self
            .client
            .post_message(&compose_scoreboard(entries, &self.channel_id))?;
        Ok(MessageRef {
            channel: posted.channel,
            ts: posted.ts,
        })
    }
}

/// Slack when it is configured, the log otherwise.
pub fn notifier_from_config(config: &Config) -> Arc<dyn Notifier> {
    match SlackNotifier::from_config(config) {
        Some(slack) => Arc::new(slack),
        None => {
            tracing::warn!("Slack is not configured; notifications go to the log");
            Arc::new(LogNotifier)
        }
    }
}

/// [`Notifier`] used when Slack is not configured: every notification is
/// written to the log instead.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn post_task(&self, notice: &TaskNotice) -> Result<MessageRef> {
        tracing::info!(
            task = %notice.task_uuid,
            plant = %notice.plant_name,
            employee = %notice.employee_name,
            duties = %notice.duties().label(),
            "task notification"
        );
        Ok(MessageRef {
            channel: "log".to_string(),
            ts: notice.task_uuid.to_string(),
        })
    }

    fn retract(&self, message: &MessageRef) -> Result<()> {
        tracing::info!(ts = %message.ts, "retract notification");
        Ok(())
    }

    fn notify_user(&self, _channel_id: &str, user_id: &str, text: &str) -> Result<()> {
        tracing::info!(user = user_id, "{text}");
        Ok(())
    }

    fn open_completion_form(&self, _trigger_id: &str, metadata: &ModalMetadata) -> Result<()> {
        Err(PlantError::InvalidConfig(format!(
            "cannot open a completion form for task {} without Slack",
            metadata.task_id
        )))
    }

    fn post_scoreboard(&self, entries: &[ScoreEntry]) -> Result<MessageRef> {
        for e in entries {
            tracing::info!(employee = %e.employee_name, completed = e.completed, "scoreboard");
        }
        Ok(MessageRef {
            channel: "log".to_string(),
            ts: "scoreboard".to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// RecordingNotifier
// ---------------------------------------------------------------------------

/// One call received by a [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Task(TaskNotice),
    Retract(MessageRef),
    Ephemeral {
        channel_id: String,
        user_id: String,
        text: String,
    },
    CompletionForm {
        trigger_id: String,
        metadata: ModalMetadata,
    },
    Scoreboard(Vec<ScoreEntry>),
}

/// Keeps every notification in memory. Used by tests across the workspace.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Sent>>,
    fail_posts: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose `post_task` always fails.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_posts: true,
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn posted_tasks(&self) -> Vec<TaskNotice> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Task(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn ephemerals(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Ephemeral { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, sent: Sent) {
        if let Ok(mut guard) = self.sent.lock() {
            guard.push(sent);
        }
    }
}

impl Notifier for RecordingNotifier {
    fn post_task(&self, notice: &TaskNotice) -> Result<MessageRef> {
        if self.fail_posts {
            return Err(PlantError::Slack(slack_client::SlackError::Api {
                method: "chat.postMessage".into(),
                error: "channel_not_found".into(),
            }));
        }
        self.record(Sent::Task(notice.clone()));
        Ok(MessageRef {
            channel: "C-TEST".to_string(),
            ts: notice.task_uuid.to_string(),
        })
    }

    fn retract(&self, message: &MessageRef) -> Result<()> {
        self.record(Sent::Retract(message.clone()));
        Ok(())
    }

    fn notify_user(&self, channel_id: &str, user_id: &str, text: &str) -> Result<()> {
        self.record(Sent::Ephemeral {
            channel_id: channel_id.to_string(),
            user_id: user_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    fn open_completion_form(&self, trigger_id: &str, metadata: &ModalMetadata) -> Result<()> {
        self.record(Sent::CompletionForm {
            trigger_id: trigger_id.to_string(),
            metadata: metadata.clone(),
        });
        Ok(())
    }

    fn post_scoreboard(&self, entries: &[ScoreEntry]) -> Result<MessageRef> {
        self.record(Sent::Scoreboard(entries.to_vec()));
        Ok(MessageRef {
            channel: "C-TEST".to_string(),
            ts: "scoreboard".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice() -> TaskNotice {
        TaskNotice {
            task_uuid: Uuid::new_v4(),
            plant_name: "Fern".into(),
            employee_name: "Alice".into(),
            is_water: true,
            is_sun: true,
            note: None,
        }
    }

    #[test]
    fn task_message_has_header_section_and_buttons() {
        let n = notice();
        let msg = compose_task_message(&n, "C1").unwrap();
        assert_eq!(msg.channel, "C1");
        assert_eq!(msg.blocks.len(), 3);
        assert!(matches!(msg.blocks[0], Block::Header { .. }));

        let Block::Section { fields, .. } = &msg.blocks[1] else {
            panic!("expected section")
        };
        let texts: Vec<&str> = fields.iter().map(Text::as_str).collect();
        assert!(texts[0].contains("Fern"));
        assert!(texts[1].contains("Alice"));
        assert!(texts[2].contains("💧 Water & ☀️ Move to sun"));

        let Block::Actions { elements, .. } = &msg.blocks[2] else {
            panic!("expected actions")
        };
        let ids: Vec<&str> = elements
            .iter()
            .map(|e| match e {
                Element::Button { action_id, .. } => action_id.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(ids, [COMPLETE_ACTION_ID, DELEGATE_ACTION_ID]);
    }

    #[test]
    fn button_value_decodes_to_action_payload() {
        let n = notice();
        let msg = compose_task_message(&n, "C1").unwrap();
        let Block::Actions { elements, .. } = &msg.blocks[2] else {
            panic!("expected actions")
        };
        let Element::Button { value, .. } = &elements[1] else {
            panic!("expected button")
        };
        let payload = ActionPayload::decode(value).unwrap();
        assert_eq!(payload.task_id, n.task_uuid);
        assert_eq!(payload.employee_name, "Alice");
        assert_eq!(payload.plant_name, "Fern");
    }

    #[test]
    fn note_adds_a_field() {
        let mut n = notice();
        n.note = Some("north window".into());
        let msg = compose_task_message(&n, "C1").unwrap();
        let Block::Section { fields, .. } = &msg.blocks[1] else {
            panic!("expected section")
        };
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn completion_form_carries_metadata() {
        let meta = ModalMetadata {
            task_id: Uuid::new_v4(),
            channel_id: "C1".into(),
            message_ts: "1.2".into(),
            user_id: "U1".into(),
        };
        let view = compose_completion_form(&meta).unwrap();
        assert_eq!(view.callback_id, COMPLETE_MODAL_CALLBACK_ID);
        assert_eq!(ModalMetadata::decode(&view.private_metadata).unwrap(), meta);
        assert!(matches!(view.blocks[1], Block::Input { optional: true, .. }));
    }

    #[test]
    fn scoreboard_lists_ranked_entries() {
        let msg = compose_scoreboard(
            &[
                ScoreEntry {
                    employee_name: "Alice".into(),
                    completed: 3,
                },
                ScoreEntry {
                    employee_name: "Bob".into(),
                    completed: 1,
                },
            ],
            "C1",
        );
        let Block::Section {
            text: Some(text), ..
        } = &msg.blocks[1]
        else {
            panic!("expected section with text")
        };
        assert_eq!(text.as_str(), "1. *Alice*: 3\n2. *Bob*: 1");
        assert!(compose_scoreboard(&[], "C1").blocks.len() == 2);
    }

    #[test]
    fn slack_notifier_posts_to_configured_channel() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/chat.postMessage")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"channel":"C42"}"#.to_string(),
            ))
            .with_body(r#"{"ok":true,"channel":"C42","ts":"1.0"}"#)
            .create();

        let mut config = Config::default();
        config.slack.bot_token = Some("xoxb-test".into());
        config.slack.channel_id = Some("C42".into());
        config.slack.api_base = server.url();
        let notifier = SlackNotifier::from_config(&config).unwrap();

        let posted = notifier.post_task(&notice()).unwrap();
        mock.assert();
        assert_eq!(
            posted,
            MessageRef {
                channel: "C42".into(),
                ts: "1.0".into()
            }
        );
    }

    #[test]
    fn slack_notifier_needs_token_and_channel() {
        let mut config = Config::default();
        assert!(SlackNotifier::from_config(&config).is_none());
        config.slack.bot_token = Some("xoxb".into());
        assert!(SlackNotifier::from_config(&config).is_none());
    }

    #[test]
    fn log_notifier_cannot_open_forms() {
        let metadata = ModalMetadata {
            task_id: Uuid::new_v4(),
            channel_id: "C1".into(),
            message_ts: "1.0".into(),
            user_id: "U1".into(),
        };
        let err = LogNotifier
            .open_completion_form("trig", &metadata)
            .unwrap_err();
        assert!(matches!(err, PlantError::InvalidConfig(_)));
    }
}
