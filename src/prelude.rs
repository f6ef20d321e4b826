//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the michi crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use michi::prelude::*;
//! use std::sync::Arc;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/funnel.json")?;
//! let graph = Arc::new(FunnelGraph::new(FunnelData::from_json(&json)?));
//!
//! let mut player = FunnelPlayer::new(graph);
//! player.start();
//! println!("{}", ViewFormatter::format_view(&player.view()));
//! # Ok(())
//! # }
//! ```

// Graph data
pub use crate::graph::{
    AnswerOption, Diagnostic, EndNode, FunnelBundle, FunnelData, FunnelEdge, FunnelGraph,
    FunnelNode, IntoFunnel, LeadCaptureNode, LeadField, NodeKind, VideoNode,
};

// Routing and recording
pub use crate::recorder::{Response, ResponseRecorder};
pub use crate::resolver::{NodeResolver, Resolution, Route};
pub use crate::routing::{Answer, AnswerType, routing_key};

// Playback
pub use crate::config::PlayerConfig;
pub use crate::player::{
    FunnelPlayer, MediaDriver, MediaEvent, MediaEventKind, Mode, NullMedia, Step,
};
pub use crate::presentation::{Controls, View, ViewFormatter};

// Hand-off and embedding
pub use crate::embed::{EmbedHost, EmbedMessage};
pub use crate::session::{JsonLinesSink, LeadData, LeadSink, LeadSubmission, SessionId};

// Error types
pub use crate::error::{BundleError, FunnelConversionError, MediaError, SinkError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
