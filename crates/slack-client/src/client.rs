use std::time::Duration;

use serde::Serialize;

use crate::retry::RetryPolicy;
use crate::types::{ApiResponse, ModalView, PostMessage, PostedMessage};
use crate::{Result, SlackError};

pub const DEFAULT_API_BASE: &str = "https://slack.com/api";

// ─── SlackClient ──────────────────────────────────────────────────────────

/// Blocking client for the handful of Web API methods the app uses.
///
/// Every call goes through the configured [`RetryPolicy`]; a response with
/// `"ok": false` is surfaced as [`SlackError::Api`].
#[derive(Clone)]
pub struct SlackClient {
    agent: ureq::Agent,
    token: String,
    api_base: String,
    retry: RetryPolicy,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("api_base", &self.api_base)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl SlackClient {
    /// Point the client at another API root (tests use a mock server).
    pub fn with_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();
        Self {
            agent,
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// `chat.postMessage`: returns where the message landed.
    pub fn post_message(&self, message: &PostMessage) -> Result<PostedMessage> {
        let resp = self.call("chat.postMessage", message)?;
        Ok(PostedMessage {
            channel: resp.channel.unwrap_or_else(|| message.channel.clone()),
            ts: resp.ts.unwrap_or_default(),
        })
    }

    /// `chat.delete`
    pub fn delete_message(&self, channel: &str, ts: &str) -> Result<()> {
        self.call(
            "chat.delete",
            &serde_json::json!({ "channel": channel, "ts": ts }),
        )?;
        Ok(())
    }

    /// `chat.postEphemeral`: a message only `user` can see.
    pub fn post_ephemeral(&self, channel: &str, user: &str, text: &str) -> Result<()> {
        self.call(
            "chat.postEphemeral",
            &serde_json::json!({ "channel": channel, "user": user, "text": text }),
        )?;
        Ok(())
    }

    /// `views.open`
    pub fn open_view(&self, trigger_id: &str, view: &ModalView) -> Result<()> {
        self.call(
            "views.open",
            &serde_json::json!({ "trigger_id": trigger_id, "view": view }),
        )?;
        Ok(())
    }

    fn call<B: Serialize>(&self, method: &str, body: &B) -> Result<ApiResponse> {
        let body = serde_json::to_value(body)?;
        self.retry.run(method, || self.call_once(method, &body))
    }

    fn call_once(&self, method: &str, body: &serde_json::Value) -> Result<ApiResponse> {
        let url = format!("{}/{}", self.api_base, method);
        tracing::debug!(method, "calling Slack");
        let response = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .send_json(body);

        let response = match response {
            Ok(r) => r,
            Err(ureq::Error::Status(status, r)) => {
                return Err(SlackError::Http {
                    method: method.to_string(),
                    status,
                    body: r.into_string().unwrap_or_default(),
                })
            }
            Err(ureq::Error::Transport(t)) => {
                return Err(SlackError::Transport {
                    method: method.to_string(),
                    message: t.to_string(),
                })
            }
        };

        let parsed: ApiResponse = response.into_json().map_err(|source| SlackError::Decode {
            method: method.to_string(),
            source,
        })?;
        if !parsed.ok {
            return Err(SlackError::Api {
                method: method.to_string(),
                error: parsed.error.unwrap_or_else(|| "unknown_error".to_string()),
            });
        }
        Ok(parsed)
    }
}
