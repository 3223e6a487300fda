//! Envelopes that round-trip through Slack: button values and modal metadata.
//!
//! Both are decoded strictly. Anything malformed is rejected as
//! [`PlantError::InvalidPayload`] before the caller touches the store.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PlantError, Result};

pub const COMPLETE_ACTION_ID: &str = "complete-task";
pub const DELEGATE_ACTION_ID: &str = "delegate-task";
pub const COMPLETE_MODAL_CALLBACK_ID: &str = "complete-task-modal";
pub const NOTE_BLOCK_ID: &str = "additional-info-block";
pub const NOTE_ACTION_ID: &str = "additional-info-input";

/// Value carried by the task message buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionPayload {
    pub task_id: Uuid,
    pub employee_name: String,
    pub plant_name: String,
}

/// `private_metadata` of the completion form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModalMetadata {
    pub task_id: Uuid,
    pub channel_id: String,
    /// Timestamp of the task message the form was opened from.
    pub message_ts: String,
    pub user_id: String,
}

impl ActionPayload {
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(raw: &str) -> Result<Self> {
        decode_strict(raw, "action payload")
    }
}

impl ModalMetadata {
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(raw: &str) -> Result<Self> {
        decode_strict(raw, "modal metadata")
    }
}

fn decode_strict<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| PlantError::InvalidPayload(format!("{what}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_payload_decodes_what_it_encodes() {
        let payload = ActionPayload {
            task_id: Uuid::new_v4(),
            employee_name: "Alice".into(),
            plant_name: "Fern".into(),
        };
        let raw = payload.encode().unwrap();
        assert_eq!(ActionPayload::decode(&raw).unwrap(), payload);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = format!(
            r#"{{"task_id":"{}","employee_name":"A","plant_name":"P","admin":true}}"#,
            Uuid::new_v4()
        );
        let err = ActionPayload::decode(&raw).unwrap_err();
        assert!(matches!(err, PlantError::InvalidPayload(_)));
    }

    #[test]
    fn malformed_uuid_is_rejected() {
        let raw = r#"{"task_id":"nope","channel_id":"C","message_ts":"1.2","user_id":"U"}"#;
        assert!(matches!(
            ModalMetadata::decode(raw).unwrap_err(),
            PlantError::InvalidPayload(_)
        ));
    }

    #[test]
    fn missing_field_is_rejected() {
        let raw = format!(r#"{{"task_id":"{}","channel_id":"C"}}"#, Uuid::new_v4());
        assert!(ModalMetadata::decode(&raw).is_err());
        assert!(ActionPayload::decode("").is_err());
    }
}
