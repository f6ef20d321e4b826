//! Common test utilities for building funnel graphs.
use michi::prelude::*;
use std::sync::Arc;

#[allow(dead_code)]
pub const SAMPLE_FUNNEL_JSON: &str = include_str!("../data/funnel.json");

#[allow(dead_code)]
pub fn start() -> FunnelNode {
    FunnelNode {
        id: "start".to_string(),
        kind: NodeKind::Start,
        next_nodes: Default::default(),
    }
}

/// A video node with a source and controls revealed right away.
#[allow(dead_code)]
pub fn video(id: &str, answer_type: AnswerType) -> FunnelNode {
    FunnelNode {
        id: id.to_string(),
        kind: NodeKind::Video(VideoNode {
            video_url: Some(format!("https://cdn.example.com/{}.mp4", id)),
            answer_type,
            ..Default::default()
        }),
        next_nodes: Default::default(),
    }
}

#[allow(dead_code)]
pub fn choice(id: &str, options: &[&str]) -> FunnelNode {
    let mut node = video(id, AnswerType::MultipleChoice);
    if let NodeKind::Video(video) = &mut node.kind {
        video.answers = options
            .iter()
            .map(|label| AnswerOption {
                label: label.to_string(),
                value: None,
            })
            .collect();
    }
    node
}

#[allow(dead_code)]
pub fn with_delay(mut node: FunnelNode, seconds: f64) -> FunnelNode {
    if let NodeKind::Video(video) = &mut node.kind {
        video.reveal_delay = Some(seconds);
    }
    node
}

#[allow(dead_code)]
pub fn lead(id: &str, required: &[&str]) -> FunnelNode {
    FunnelNode {
        id: id.to_string(),
        kind: NodeKind::LeadCapture(LeadCaptureNode {
            title: Some("Apply".to_string()),
            fields: required
                .iter()
                .map(|name| LeadField {
                    name: name.to_string(),
                    label: name.to_string(),
                    input_type: if *name == "email" { "email" } else { "text" }.to_string(),
                    required: true,
                    placeholder: None,
                })
                .collect(),
            ..Default::default()
        }),
        next_nodes: Default::default(),
    }
}

#[allow(dead_code)]
pub fn end(id: &str) -> FunnelNode {
    FunnelNode {
        id: id.to_string(),
        kind: NodeKind::End(EndNode {
            title: Some("Done".to_string()),
            message: Some("Thanks!".to_string()),
        }),
        next_nodes: Default::default(),
    }
}

/// Adds `nextNodes` routes to a node.
#[allow(dead_code)]
pub fn routes(mut node: FunnelNode, routes: &[(&str, &str)]) -> FunnelNode {
    for (key, target) in routes {
        node.next_nodes.insert(key.to_string(), target.to_string());
    }
    node
}

#[allow(dead_code)]
pub fn funnel(nodes: Vec<FunnelNode>, edges: &[(&str, &str)], order: &[&str]) -> FunnelData {
    FunnelData {
        name: "test funnel".to_string(),
        nodes,
        edges: edges.iter().map(|(s, t)| FunnelEdge::new(s, t)).collect(),
        node_order: order.iter().map(|id| id.to_string()).collect(),
    }
}

#[allow(dead_code)]
pub fn graph(nodes: Vec<FunnelNode>, edges: &[(&str, &str)], order: &[&str]) -> Arc<FunnelGraph> {
    Arc::new(FunnelGraph::new(funnel(nodes, edges, order)))
}

/// `A(video, none) -> B(video, button) -> C(end)`
#[allow(dead_code)]
pub fn linear_chain() -> Arc<FunnelGraph> {
    graph(
        vec![
            start(),
            video("A", AnswerType::None),
            video("B", AnswerType::Button),
            end("C"),
        ],
        &[("start", "A"), ("A", "B"), ("B", "C")],
        &[],
    )
}

/// Starts a player and lands it on the first node.
#[allow(dead_code)]
pub fn started(graph: &Arc<FunnelGraph>) -> FunnelPlayer {
    let mut player = FunnelPlayer::new(Arc::clone(graph));
    player.start();
    player
}

#[allow(dead_code)]
pub fn lead_data(pairs: &[(&str, &str)]) -> LeadData {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
