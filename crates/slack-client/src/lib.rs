//! `slack-client`: the slice of the Slack Web API the plant care app needs.
//!
//! # Architecture
//!
//! ```text
//! PostMessage / ModalView      (Block Kit types, types.rs)
//!     │
//!     ▼
//! SlackClient                  ← blocking ureq agent, bearer token
//!     │                          chat.postMessage / chat.delete /
//!     │                          chat.postEphemeral / views.open
//!     ▼
//! RetryPolicy                  ← bounded backoff + jitter on transient errors
//! ```
//!
//! Incoming interactivity payloads (`block_actions`, `view_submission`) are
//! modelled by [`Interaction`].

pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use client::{SlackClient, DEFAULT_API_BASE};
pub use error::SlackError;
pub use retry::RetryPolicy;
pub use types::{
    ActionEvent, Block, BlockActions, ButtonStyle, Element, Interaction, InteractionUser,
    ModalView, PostMessage, PostedMessage, Text, ViewSubmission,
};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, SlackError>;
