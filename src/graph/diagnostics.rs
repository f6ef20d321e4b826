use super::definition::NodeKind;
use super::index::FunnelGraph;
use crate::resolver::{NodeResolver, Route};
use crate::routing::DEFAULT_KEY;
use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
}

/// An authoring gap or inconsistency found in a funnel graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub node_id: Option<String>,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    DuplicateNodeId,
    DanglingEdge { edge_id: String, missing: String },
    UnknownRouteTarget { key: String, target: String },
    UnknownOrderEntry,
    NoExit,
    /// An answer the node accepts leads nowhere, while other answers do.
    UnroutedKey { key: String },
    /// The node only continues through the fallback order.
    OrderFallbackOnly { target: String },
    /// The first outgoing edge and the fallback order name different successors.
    OrderDisagreesWithEdge { edge_target: String, order_target: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node_id.as_deref().unwrap_or("-");
        match &self.kind {
            DiagnosticKind::DuplicateNodeId => write!(f, "node id '{}' is used more than once", node),
            DiagnosticKind::DanglingEdge { edge_id, missing } => write!(
                f,
                "edge '{}' references missing node '{}'",
                edge_id, missing
            ),
            DiagnosticKind::UnknownRouteTarget { key, target } => write!(
                f,
                "node '{}' routes key '{}' to missing node '{}'",
                node, key, target
            ),
            DiagnosticKind::UnknownOrderEntry => {
                write!(f, "node order lists '{}' which is not a node", node)
            }
            DiagnosticKind::NoExit => write!(f, "node '{}' has no way forward", node),
            DiagnosticKind::UnroutedKey { key } => {
                write!(f, "node '{}' has no way forward for key '{}'", node, key)
            }
            DiagnosticKind::OrderFallbackOnly { target } => write!(
                f,
                "node '{}' only continues to '{}' through the fallback order",
                node, target
            ),
            DiagnosticKind::OrderDisagreesWithEdge {
                edge_target,
                order_target,
            } => write!(
                f,
                "node '{}' continues to '{}' by edge but '{}' by node order",
                node, edge_target, order_target
            ),
        }
    }
}

pub(super) fn inspect(graph: &FunnelGraph) -> Vec<Diagnostic> {
    let mut found = Vec::new();
    let warn = |node_id: Option<&str>, kind| Diagnostic {
        severity: Severity::Warning,
        node_id: node_id.map(str::to_string),
        kind,
    };

    for id in graph.nodes().iter().map(|n| n.id.as_str()).duplicates() {
        found.push(warn(Some(id), DiagnosticKind::DuplicateNodeId));
    }

    for edge in graph.edges() {
        for end in [&edge.source, &edge.target] {
            if !graph.contains(end) {
                found.push(warn(
                    None,
                    DiagnosticKind::DanglingEdge {
                        edge_id: edge.id.clone(),
                        missing: end.clone(),
                    },
                ));
            }
        }
    }

    for id in graph.node_order().iter().unique() {
        if !graph.contains(id) {
            found.push(warn(Some(id.as_str()), DiagnosticKind::UnknownOrderEntry));
        }
    }

    let resolver = NodeResolver::new(graph);
    for node in graph.nodes().iter().unique_by(|n| n.id.clone()) {
        for (key, target) in node.next_nodes.iter().sorted() {
            if !graph.contains(target) {
                found.push(warn(
                    Some(node.id.as_str()),
                    DiagnosticKind::UnknownRouteTarget {
                        key: key.clone(),
                        target: target.clone(),
                    },
                ));
            }
        }

        if matches!(node.kind, NodeKind::End(_)) {
            continue;
        }

        let keys = match &node.kind {
            NodeKind::Video(video) => video.answer_type.routing_keys(video.answers.len()),
            _ => vec![DEFAULT_KEY.to_string()],
        };
        let unrouted = keys
            .iter()
            .filter(|key| resolver.resolve(&node.id, key).is_none())
            .collect_vec();
        if unrouted.len() == keys.len() {
            found.push(warn(Some(node.id.as_str()), DiagnosticKind::NoExit));
        } else {
            for key in unrouted {
                found.push(warn(
                    Some(node.id.as_str()),
                    DiagnosticKind::UnroutedKey { key: key.clone() },
                ));
            }
        }

        match resolver.resolve(&node.id, DEFAULT_KEY) {
            Some(resolution) if resolution.via == Route::NodeOrder => found.push(Diagnostic {
                severity: Severity::Info,
                node_id: Some(node.id.clone()),
                kind: DiagnosticKind::OrderFallbackOnly {
                    target: resolution.target,
                },
            }),
            _ => {}
        }

        if let (Some(edge), Some(position)) = (
            graph.outgoing_edge(&node.id),
            graph.order_position(&node.id),
        ) {
            if let Some(order_target) = graph.node_order().get(position + 1) {
                if *order_target != edge.target {
                    found.push(Diagnostic {
                        severity: Severity::Info,
                        node_id: Some(node.id.clone()),
                        kind: DiagnosticKind::OrderDisagreesWithEdge {
                            edge_target: edge.target.clone(),
                            order_target: order_target.clone(),
                        },
                    });
                }
            }
        }
    }

    found
}
