use super::definition::{FunnelData, FunnelEdge, FunnelNode, NodeKind};
use super::diagnostics::{self, Diagnostic, Severity};
use ahash::AHashMap;

/// Id of the synthetic entry node when a funnel does not declare a `start` node.
pub const START_ID: &str = "start";

/// An indexed, immutable funnel graph.
///
/// Built once from a `FunnelData` and shared (behind an `Arc`) by every visitor
/// session. Node ids are the sole identity key; when ids repeat, lookups see the
/// first occurrence.
#[derive(Debug, Clone)]
pub struct FunnelGraph {
    data: FunnelData,
    node_index: AHashMap<String, usize>,
    order_index: AHashMap<String, usize>,
    start_id: String,
}

impl FunnelGraph {
    pub fn new(data: FunnelData) -> Self {
        let mut node_index = AHashMap::with_capacity(data.nodes.len());
        for (position, node) in data.nodes.iter().enumerate() {
            node_index.entry(node.id.clone()).or_insert(position);
        }

        let mut order_index = AHashMap::with_capacity(data.node_order.len());
        for (position, id) in data.node_order.iter().enumerate() {
            order_index.entry(id.clone()).or_insert(position);
        }

        let start_id = data
            .nodes
            .iter()
            .find(|n| matches!(n.kind, NodeKind::Start))
            .map(|n| n.id.clone())
            .unwrap_or_else(|| START_ID.to_string());

        let graph = Self {
            data,
            node_index,
            order_index,
            start_id,
        };

        for diagnostic in graph.diagnostics() {
            match diagnostic.severity {
                Severity::Warning => tracing::warn!(funnel = %graph.data.name, "{}", diagnostic),
                Severity::Info => tracing::debug!(funnel = %graph.data.name, "{}", diagnostic),
            }
        }
        graph
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn data(&self) -> &FunnelData {
        &self.data
    }

    pub fn nodes(&self) -> &[FunnelNode] {
        &self.data.nodes
    }

    pub fn edges(&self) -> &[FunnelEdge] {
        &self.data.edges
    }

    pub fn node_order(&self) -> &[String] {
        &self.data.node_order
    }

    /// Id of the entry node the funnel is started from.
    pub fn start_id(&self) -> &str {
        &self.start_id
    }

    pub fn node(&self, id: &str) -> Option<&FunnelNode> {
        self.node_index.get(id).map(|&i| &self.data.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// First edge leaving `id`, in authoring order.
    pub fn outgoing_edge(&self, id: &str) -> Option<&FunnelEdge> {
        self.data.edges.iter().find(|e| e.source == id)
    }

    /// Position of `id` in the fallback order.
    pub fn order_position(&self, id: &str) -> Option<usize> {
        self.order_index.get(id).copied()
    }

    /// Lists authoring gaps and inconsistencies. Never fails.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        diagnostics::inspect(self)
    }
}
