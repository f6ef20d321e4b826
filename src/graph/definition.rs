use crate::routing::AnswerType;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// The complete, canonical definition of a funnel, ready to be indexed into a `FunnelGraph`.
/// This is the target structure for any custom data model conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunnelData {
    pub name: String,
    pub nodes: Vec<FunnelNode>,
    pub edges: Vec<FunnelEdge>,
    /// Fallback linear ordering, consulted only when a node has no route and no edge.
    pub node_order: Vec<String>,
}

/// A single step of the funnel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelNode {
    pub id: String,
    pub kind: NodeKind,
    /// Routing key -> target node id. Highest-precedence edge.
    #[serde(default)]
    pub next_nodes: AHashMap<String, String>,
}

/// Node type with the configuration relevant to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Start,
    Video(VideoNode),
    LeadCapture(LeadCaptureNode),
    End(EndNode),
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::Video(_) => "video",
            NodeKind::LeadCapture(_) => "leadCapture",
            NodeKind::End(_) => "end",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoNode {
    pub video_url: Option<String>,
    pub overlay_text: Option<String>,
    pub answer_type: AnswerType,
    pub answers: Vec<AnswerOption>,
    pub button_text: Option<String>,
    pub button_style: Option<ButtonStyle>,
    /// Playback position in seconds at which the controls are revealed.
    pub reveal_delay: Option<f64>,
}

impl VideoNode {
    /// Whether the node advances on its own when the video ends.
    ///
    /// A multiple-choice node without options has nothing to pick from and is
    /// treated like a plain video.
    pub fn needs_interaction(&self) -> bool {
        match self.answer_type {
            AnswerType::None => false,
            AnswerType::MultipleChoice => !self.answers.is_empty(),
            _ => true,
        }
    }
}

/// One selectable option of a multiple-choice node. Routing uses its position, not its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonStyle {
    pub background: Option<String>,
    pub color: Option<String>,
    pub variant: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadCaptureNode {
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<LeadField>,
    pub submit_text: Option<String>,
}

/// A form field collected by a lead-capture node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadField {
    pub name: String,
    pub label: String,
    /// Native input type (`text`, `email`, `tel`, ...).
    pub input_type: String,
    pub required: bool,
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndNode {
    pub title: Option<String>,
    pub message: Option<String>,
}

/// A default, unconditional connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Inert metadata, `"custom"` in authored graphs.
    pub edge_type: String,
}

impl FunnelEdge {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            id: format!("e-{}-{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
            edge_type: "custom".to_string(),
        }
    }
}
