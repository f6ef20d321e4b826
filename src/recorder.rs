use crate::graph::FunnelGraph;
use crate::resolver::NodeResolver;
use crate::routing::{Answer, AnswerType, routing_key};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded answer of a visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub node_id: String,
    pub answer: Answer,
    pub answer_type: AnswerType,
    /// Serialized as an RFC 3339 string.
    pub timestamp: DateTime<Utc>,
}

/// Append-only trail of a visitor's answers, in visit order.
#[derive(Debug, Clone, Default)]
pub struct ResponseRecorder {
    responses: Vec<Response>,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the answer given on `node_id` and resolves where it leads.
    ///
    /// The response is appended even when no next node exists.
    pub fn record_and_route(
        &mut self,
        graph: &FunnelGraph,
        node_id: &str,
        answer: Answer,
        answer_type: AnswerType,
    ) -> Option<String> {
        let key = routing_key(&answer, answer_type);
        tracing::debug!(node = node_id, %answer, %answer_type, key = %key, "recording answer");

        self.responses.push(Response {
            node_id: node_id.to_string(),
            answer,
            answer_type,
            timestamp: Utc::now(),
        });

        NodeResolver::new(graph).resolve_next(node_id, &key)
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}
