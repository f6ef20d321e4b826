//! The JSON funnel format as authored for the site.
//!
//! Nodes carry a loosely typed `data` bag whose fields depend on the node
//! `type`. Conversion into `FunnelData` turns each bag into the matching
//! `NodeKind` variant and drops the fields that do not apply.

use super::conversion::IntoFunnel;
use super::definition::*;
use crate::error::FunnelConversionError;
use crate::routing::AnswerType;
use ahash::AHashMap;
use serde::Deserialize;
use std::collections::HashMap;

/// Complete funnel document.
#[derive(Debug, Deserialize)]
pub struct WireFunnel {
    #[serde(default)]
    pub name: String,
    pub nodes: Vec<WireNode>,
    #[serde(default)]
    pub edges: Vec<WireEdge>,
    #[serde(default, alias = "nodeOrder", alias = "NODE_ORDER")]
    pub node_order: Vec<String>,
}

/// Node with its type tag and configuration bag.
#[derive(Debug, Deserialize)]
pub struct WireNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub data: WireNodeData,
}

/// Presentation and interaction configuration. Unused fields are absent.
#[derive(Debug, Default, Deserialize)]
pub struct WireNodeData {
    #[serde(alias = "videoUrl")]
    pub video_url: Option<String>,
    #[serde(alias = "overlayText", alias = "text")]
    pub overlay_text: Option<String>,
    #[serde(alias = "answerType")]
    pub answer_type: Option<String>,
    pub answers: Option<Vec<WireAnswer>>,
    #[serde(alias = "buttonText")]
    pub button_text: Option<String>,
    #[serde(alias = "buttonStyle")]
    pub button_style: Option<WireButtonStyle>,
    #[serde(alias = "delaySeconds")]
    pub delay_seconds: Option<f64>,
    #[serde(alias = "delayBeforeButtons")]
    pub delay_before_buttons: Option<f64>,
    #[serde(alias = "nextNodes")]
    pub next_nodes: Option<HashMap<String, String>>,
    pub fields: Option<Vec<WireField>>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub message: Option<String>,
    #[serde(alias = "submitText")]
    pub submit_text: Option<String>,
}

/// A multiple-choice option, either a bare label or an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireAnswer {
    Label(String),
    Option {
        #[serde(alias = "text")]
        label: String,
        value: Option<serde_json::Value>,
    },
}

#[derive(Debug, Deserialize)]
pub struct WireButtonStyle {
    #[serde(alias = "backgroundColor")]
    pub background: Option<String>,
    #[serde(alias = "textColor")]
    pub color: Option<String>,
    pub variant: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireField {
    pub name: String,
    pub label: Option<String>,
    #[serde(rename = "type", default = "default_input_type")]
    pub input_type: String,
    #[serde(default)]
    pub required: bool,
    pub placeholder: Option<String>,
}

fn default_input_type() -> String {
    "text".to_string()
}

#[derive(Debug, Deserialize)]
pub struct WireEdge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default)]
    pub edge_type: Option<String>,
}

impl WireFunnel {
    pub fn from_json(json: &str) -> Result<Self, FunnelConversionError> {
        serde_json::from_str(json).map_err(|e| FunnelConversionError::JsonParseError(e.to_string()))
    }
}

impl FunnelData {
    /// Parses and converts a funnel JSON document in one step.
    pub fn from_json(json: &str) -> Result<Self, FunnelConversionError> {
        WireFunnel::from_json(json)?.into_funnel()
    }
}

impl IntoFunnel for WireFunnel {
    fn into_funnel(self) -> Result<FunnelData, FunnelConversionError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(convert_node)
            .collect::<Result<Vec<_>, _>>()?;

        let edges = self
            .edges
            .into_iter()
            .map(|edge| FunnelEdge {
                id: if edge.id.is_empty() {
                    format!("e-{}-{}", edge.source, edge.target)
                } else {
                    edge.id
                },
                source: edge.source,
                target: edge.target,
                edge_type: edge.edge_type.unwrap_or_else(|| "custom".to_string()),
            })
            .collect();

        Ok(FunnelData {
            name: self.name,
            nodes,
            edges,
            node_order: self.node_order,
        })
    }
}

fn convert_node(node: WireNode) -> Result<FunnelNode, FunnelConversionError> {
    let data = node.data;
    let kind = match node.node_type.as_str() {
        "start" => NodeKind::Start,
        "video" => {
            let answer_type = match data.answer_type.as_deref() {
                None => AnswerType::None,
                Some(name) => AnswerType::from_wire(name).ok_or_else(|| {
                    FunnelConversionError::InvalidAnswerType {
                        node_id: node.id.clone(),
                        answer_type: name.to_string(),
                    }
                })?,
            };
            NodeKind::Video(VideoNode {
                video_url: data.video_url,
                overlay_text: data.overlay_text,
                answer_type,
                answers: data
                    .answers
                    .unwrap_or_default()
                    .into_iter()
                    .map(convert_answer)
                    .collect(),
                button_text: data.button_text,
                button_style: data.button_style.map(|style| ButtonStyle {
                    background: style.background,
                    color: style.color,
                    variant: style.variant,
                }),
                reveal_delay: data.delay_seconds.or(data.delay_before_buttons),
            })
        }
        "leadCapture" | "lead_capture" => NodeKind::LeadCapture(LeadCaptureNode {
            title: data.title,
            description: data.description.or(data.overlay_text),
            fields: data
                .fields
                .unwrap_or_default()
                .into_iter()
                .map(|field| LeadField {
                    label: field.label.unwrap_or_else(|| field.name.clone()),
                    name: field.name,
                    input_type: field.input_type,
                    required: field.required,
                    placeholder: field.placeholder,
                })
                .collect(),
            submit_text: data.submit_text.or(data.button_text),
        }),
        "end" => NodeKind::End(EndNode {
            title: data.title,
            message: data.message.or(data.overlay_text),
        }),
        other => {
            return Err(FunnelConversionError::InvalidNodeType {
                node_id: node.id,
                type_name: other.to_string(),
            });
        }
    };

    Ok(FunnelNode {
        id: node.id,
        kind,
        next_nodes: data
            .next_nodes
            .map(|routes| routes.into_iter().collect::<AHashMap<_, _>>())
            .unwrap_or_default(),
    })
}

fn convert_answer(answer: WireAnswer) -> AnswerOption {
    match answer {
        WireAnswer::Label(label) => AnswerOption { label, value: None },
        WireAnswer::Option { label, value } => AnswerOption {
            label,
            value: value.map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
        },
    }
}
