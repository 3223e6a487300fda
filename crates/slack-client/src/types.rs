use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─── Text objects ─────────────────────────────────────────────────────────

/// Block Kit text object. Discriminated by the JSON `"type"` field.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    PlainText {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        emoji: Option<bool>,
    },
    Mrkdwn { text: String },
}

impl Text {
    pub fn plain(text: impl Into<String>) -> Self {
        Text::PlainText {
            text: text.into(),
            emoji: Some(true),
        }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Text::Mrkdwn { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Text::PlainText { text, .. } | Text::Mrkdwn { text } => text,
        }
    }
}

// ─── Elements ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button {
        text: Text,
        action_id: String,
        /// Opaque string Slack hands back unchanged in the interaction payload.
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<ButtonStyle>,
    },
    PlainTextInput {
        action_id: String,
        #[serde(default)]
        multiline: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<Text>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
}

// ─── Blocks ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: Text,
    },
    Section {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<Text>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        fields: Vec<Text>,
    },
    Actions {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
        elements: Vec<Element>,
    },
    Input {
        block_id: String,
        label: Text,
        element: Element,
        #[serde(default)]
        optional: bool,
    },
}

// ─── Outgoing requests ────────────────────────────────────────────────────

/// Body of `chat.postMessage`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PostMessage {
    pub channel: String,
    /// Notification fallback text shown where blocks can't be rendered.
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
}

/// A modal view for `views.open`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModalView {
    #[serde(rename = "type")]
    pub kind: String,
    pub callback_id: String,
    pub title: Text,
    pub private_metadata: String,
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<Text>,
}

impl ModalView {
    pub fn new(callback_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind: "modal".to_string(),
            callback_id: callback_id.into(),
            title: Text::plain(title),
            private_metadata: String::new(),
            blocks: Vec::new(),
            submit: None,
            close: None,
        }
    }
}

// ─── Responses ────────────────────────────────────────────────────────────

/// Common envelope of every Web API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
}

/// Location of a posted message, needed to delete it later.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostedMessage {
    pub channel: String,
    pub ts: String,
}

// ─── Incoming interaction payloads ────────────────────────────────────────

/// The `payload` field of an interactivity request. Discriminated by `"type"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interaction {
    BlockActions(BlockActions),
    ViewSubmission(ViewSubmission),
    /// Shortcuts, view closings and other types this app never registers for.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockActions {
    #[serde(default)]
    pub trigger_id: Option<String>,
    pub user: InteractionUser,
    #[serde(default)]
    pub channel: Option<ChannelRef>,
    #[serde(default)]
    pub message: Option<MessageRef>,
    pub actions: Vec<ActionEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewSubmission {
    pub user: InteractionUser,
    pub view: SubmittedView,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionUser {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl InteractionUser {
    /// Display name used for roster matching; falls back to the user id.
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageRef {
    pub ts: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionEvent {
    pub action_id: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedView {
    pub callback_id: String,
    #[serde(default)]
    pub private_metadata: String,
    #[serde(default)]
    pub state: ViewState,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewState {
    /// `block_id -> action_id -> input`
    #[serde(default)]
    pub values: HashMap<String, HashMap<String, InputValue>>,
}

impl ViewState {
    pub fn input(&self, block_id: &str, action_id: &str) -> Option<&str> {
        self.values
            .get(block_id)?
            .get(action_id)?
            .value
            .as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputValue {
    #[serde(default)]
    pub value: Option<String>,
}
