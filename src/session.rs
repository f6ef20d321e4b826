use crate::error::SinkError;
use crate::recorder::Response;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use uuid::Uuid;

/// Field name -> value, as typed into a lead-capture form.
pub type LeadData = BTreeMap<String, String>;

/// Identifies one visitor's pass through a funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything a visitor left behind, handed to the lead-capture collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    pub session_id: SessionId,
    pub funnel_name: String,
    pub responses: Vec<Response>,
    pub lead_data: Option<LeadData>,
    /// Id of the end node reached, `None` for a submission taken mid-funnel.
    pub end_node_id: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Receives submissions and persists or forwards them.
pub trait LeadSink {
    fn submit(&mut self, submission: &LeadSubmission) -> Result<(), SinkError>;
}

/// Writes each submission as a single line of JSON.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LeadSink for JsonLinesSink<W> {
    fn submit(&mut self, submission: &LeadSubmission) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, submission)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        tracing::info!(
            session = %submission.session_id,
            responses = submission.responses.len(),
            "lead submission written"
        );
        Ok(())
    }
}
