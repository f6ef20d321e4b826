//! # Michi - Funnel Player Engine
//!
//! **Michi** walks a visitor through a funnel: a directed graph of video,
//! lead-capture and end nodes. The visitor's answers pick the branch, every
//! answer is recorded, and the trail is handed to whoever persists leads once
//! the funnel ends.
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Funnel**: Parse the funnel JSON with `FunnelData::from_json`, or implement
//!     `IntoFunnel` for your own format. Wrap the result in a `FunnelGraph` and share it
//!     behind an `Arc`; it never changes.
//! 2.  **Create a Player**: Use `FunnelPlayer::builder` for each visitor. The player owns the
//!     visitor's state: current node, mute, revealed controls, progress, responses, lead data.
//! 3.  **Feed Events**: Call `start` from the visitor's click, forward media callbacks with
//!     `on_media`, advance the clock with `advance_clock`, and submit answers.
//! 4.  **Hand Off**: Once the player is completed, take its `submission` and pass it to a `LeadSink`.
//!
//! ## Routing
//!
//! The next node is resolved in strict order: the node's `nextNodes` entry for the
//! answer's routing key, its `"default"` entry, its first outgoing edge, and finally
//! the fallback node order. Routing keys come from the answer type: the option index
//! for multiple choice, `yes`/`no`, `low`/`medium`/`high` for ratings, `default` otherwise.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use michi::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let json = std::fs::read_to_string("data/funnel.json")?;
//!     let graph = Arc::new(FunnelGraph::new(FunnelData::from_json(&json)?));
//!
//!     let mut player = FunnelPlayer::builder(Arc::clone(&graph)).build();
//!     player.start();
//!
//!     // The first video played to the end
//!     if let Some(node_id) = player.current_node_id().map(str::to_string) {
//!         player.on_media(MediaEvent::ended(&node_id));
//!     }
//!     player.advance_clock(Duration::from_millis(300));
//!
//!     println!("{}", ViewFormatter::format_view(&player.view()));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod data;
pub mod embed;
pub mod error;
pub mod graph;
pub mod player;
pub mod prelude;
pub mod presentation;
pub mod recorder;
pub mod resolver;
pub mod routing;
pub mod session;
