use std::time::Duration;

/// Where a player is in the funnel. Exactly one node is current at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Waiting for the visitor's start gesture.
    NotStarted,
    /// A content node is fully visible.
    Presenting(Presenting),
    /// Crossfading from one node to the next; nothing is rendered.
    Transitioning(Transition),
    /// An end node was reached. Terminal.
    Completed { node_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Presenting {
    pub node_id: String,
    pub stage: Stage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Video(VideoState),
    LeadCapture,
}

/// Per-node state of a video node. Dropped when the node is left.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VideoState {
    /// Playback position as a percentage of the duration, 0 to 100.
    pub progress: f64,
    /// Once set, stays set for the node.
    pub controls_visible: bool,
    pub playback: Playback,
    pub selected_rating: Option<u8>,
    pub text_input: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Playback {
    /// The node has no video source.
    #[default]
    NoSource,
    Playing,
    /// Both the audible and the muted attempt were rejected; the visitor has to press play.
    Blocked,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub elapsed: Duration,
}

/// What a player operation did.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Not applicable in the current state; nothing changed.
    Ignored,
    /// Per-node interaction state changed (selection, text input, mute).
    Updated,
    /// Playback progress moved.
    Progress(f64),
    /// The node's controls were revealed.
    ControlsRevealed,
    /// An answer or event was handled but no next node exists; the node stays current.
    Stayed,
    /// A crossfade towards `to` began.
    Transitioning { from: String, to: String },
    /// A transition is still running.
    Waiting,
    /// A content node became current.
    Entered(String),
    /// An end node became current.
    Completed(String),
}
