//! Entry point for funnels embedded in another page, e.g. an iframe that
//! signals its parent through `postMessage`.

use serde::{Deserialize, Serialize};

/// Messages understood from an embedding frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EmbedMessage {
    /// `{ "type": "funnel_started" }`
    FunnelStarted,
}

impl EmbedMessage {
    /// Parses a message payload. Anything unrecognised yields `None`.
    pub fn parse(payload: &str) -> Option<Self> {
        serde_json::from_str(payload).ok()
    }

    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        Self::deserialize(value).ok()
    }
}

/// The page side of the embedding: shows the funnel modal once an embedded
/// funnel reports that it started.
#[derive(Debug, Clone, Default)]
pub struct EmbedHost {
    modal_open: bool,
}

impl EmbedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles a raw `postMessage` payload. Returns `true` when it opened the modal.
    pub fn handle_message(&mut self, payload: &str) -> bool {
        match EmbedMessage::parse(payload) {
            Some(EmbedMessage::FunnelStarted) => {
                let opened = !self.modal_open;
                self.modal_open = true;
                if opened {
                    tracing::debug!("embedded funnel started, opening modal");
                }
                opened
            }
            None => false,
        }
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn close(&mut self) {
        self.modal_open = false;
    }
}
