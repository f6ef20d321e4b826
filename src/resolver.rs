use crate::graph::{FunnelGraph, NodeKind};
use crate::routing::DEFAULT_KEY;
use std::fmt;

/// The rule that produced a resolution, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Exact routing-key entry in the node's `next_nodes`.
    NextNodes,
    /// The node's `"default"` entry, used when a typed key had no entry.
    DefaultRoute,
    /// First edge leaving the node.
    Edge,
    /// Next id in the fallback node order.
    NodeOrder,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Route::NextNodes => "nextNodes",
            Route::DefaultRoute => "default route",
            Route::Edge => "edge",
            Route::NodeOrder => "node order",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub target: String,
    pub via: Route,
}

/// Determines the node that follows another one.
#[derive(Debug, Clone, Copy)]
pub struct NodeResolver<'a> {
    graph: &'a FunnelGraph,
}

impl<'a> NodeResolver<'a> {
    pub fn new(graph: &'a FunnelGraph) -> Self {
        Self { graph }
    }

    /// Resolves the successor of `current` for `routing_key`.
    ///
    /// Tiers are tried in order and the first match wins:
    /// 1. `next_nodes[routing_key]`
    /// 2. `next_nodes["default"]` when `routing_key` is not already `"default"`
    /// 3. the first edge whose source is `current`
    /// 4. the id after `current` in the fallback node order
    ///
    /// `None` means there is nothing further, which is only expected for end nodes.
    pub fn resolve(&self, current: &str, routing_key: &str) -> Option<Resolution> {
        if let Some(node) = self.graph.node(current) {
            if let Some(target) = node.next_nodes.get(routing_key) {
                return Some(Resolution {
                    target: target.clone(),
                    via: Route::NextNodes,
                });
            }
            if routing_key != DEFAULT_KEY {
                if let Some(target) = node.next_nodes.get(DEFAULT_KEY) {
                    return Some(Resolution {
                        target: target.clone(),
                        via: Route::DefaultRoute,
                    });
                }
            }
        }

        if let Some(edge) = self.graph.outgoing_edge(current) {
            return Some(Resolution {
                target: edge.target.clone(),
                via: Route::Edge,
            });
        }

        let position = self.graph.order_position(current)?;
        self.graph
            .node_order()
            .get(position + 1)
            .map(|target| Resolution {
                target: target.clone(),
                via: Route::NodeOrder,
            })
    }

    /// Same as [`resolve`](Self::resolve), returning only the target id and
    /// logging authoring gaps along the way.
    pub fn resolve_next(&self, current: &str, routing_key: &str) -> Option<String> {
        match self.resolve(current, routing_key) {
            Some(resolution) => {
                if resolution.via == Route::NodeOrder {
                    tracing::warn!(
                        node = current,
                        target = %resolution.target,
                        "no route or edge, continuing through the fallback node order"
                    );
                } else {
                    tracing::debug!(
                        node = current,
                        key = routing_key,
                        target = %resolution.target,
                        via = %resolution.via,
                        "resolved next node"
                    );
                }
                Some(resolution.target)
            }
            None => {
                let terminal = self
                    .graph
                    .node(current)
                    .is_some_and(|n| matches!(n.kind, NodeKind::End(_)));
                if !terminal {
                    tracing::warn!(node = current, key = routing_key, "dead end reached");
                }
                None
            }
        }
    }
}
