use crate::error::LoadError;
use crate::player::{FunnelPlayer, MediaDriver, MediaEvent, Step};
use crate::session::LeadData;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Length assumed for a video when a script does not say how long to watch.
pub const DEFAULT_WATCH_SECONDS: f64 = 10.0;

/// Upper bound of time updates sent for one watched video.
pub const MAX_WATCH_UPDATES: usize = 100;

/// A simulated visitor action.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum VisitorAction {
    Start,
    /// Watches the current video to its end, one time update per second.
    Watch { seconds: Option<f64> },
    /// Lets the playback clock run.
    Wait { ms: u64 },
    Button,
    YesNo { yes: bool },
    Choose { index: usize },
    Rate { rating: u8 },
    Text { value: String },
    Lead { fields: LeadData },
    ToggleMute,
}

/// A visitor's actions in order, matching the JSON format used by the CLI.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VisitorScript {
    pub actions: Vec<VisitorAction>,
}

/// What one action did.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    pub action: VisitorAction,
    pub step: Step,
    /// Current node after the action.
    pub node_id: Option<String>,
}

impl VisitorScript {
    /// Load a visitor script from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| LoadError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// A visitor who starts and then watches whatever comes up.
    pub fn passive(videos: usize) -> Self {
        let mut actions = vec![VisitorAction::Start];
        actions.extend((0..videos).map(|_| VisitorAction::Watch { seconds: None }));
        Self { actions }
    }

    /// Plays the script against a player. Transitions are waited out after each action.
    pub fn play_on<M: MediaDriver>(&self, player: &mut FunnelPlayer<M>) -> Vec<ScriptStep> {
        self.actions
            .iter()
            .map(|action| {
                let step = apply(player, action);
                if player.is_transitioning() {
                    player.finish_transition();
                }
                ScriptStep {
                    action: action.clone(),
                    step,
                    node_id: player.current_node_id().map(str::to_string),
                }
            })
            .collect()
    }
}

/// Applies a single action and returns the most significant step it produced.
pub fn apply<M: MediaDriver>(player: &mut FunnelPlayer<M>, action: &VisitorAction) -> Step {
    match action {
        VisitorAction::Start => player.start(),
        VisitorAction::Watch { seconds } => watch(player, seconds.unwrap_or(DEFAULT_WATCH_SECONDS)),
        VisitorAction::Wait { ms } => player.advance_clock(Duration::from_millis(*ms)),
        VisitorAction::Button => player.press_button(),
        VisitorAction::YesNo { yes } => player.answer_yes_no(*yes),
        VisitorAction::Choose { index } => player.choose(*index),
        VisitorAction::Rate { rating } => match player.select_rating(*rating) {
            Step::Updated => player.submit_rating(),
            other => other,
        },
        VisitorAction::Text { value } => match player.set_text_input(value) {
            Step::Updated => player.submit_text(),
            other => other,
        },
        VisitorAction::Lead { fields } => player.submit_lead(fields.clone()),
        VisitorAction::ToggleMute => player.toggle_mute(),
    }
}

fn watch<M: MediaDriver>(player: &mut FunnelPlayer<M>, seconds: f64) -> Step {
    if !seconds.is_finite() || seconds < 0.0 {
        tracing::debug!(seconds, "watch ignored, not a playable duration");
        return Step::Ignored;
    }
    let Some(node_id) = player
        .video_state()
        .and(player.current_node_id())
        .map(str::to_string)
    else {
        return Step::Ignored;
    };

    // One update per second, spread out for long videos
    let tick = (seconds / MAX_WATCH_UPDATES as f64).max(1.0);
    let updates = (seconds / tick).ceil() as usize;
    let mut last = Step::Ignored;
    for update in 1..=updates {
        let position = (update as f64 * tick).min(seconds);
        match player.on_media(MediaEvent::time_update(&node_id, position, seconds)) {
            Step::Progress(_) if last == Step::ControlsRevealed => {}
            step => last = step,
        }
    }
    match player.on_media(MediaEvent::ended(&node_id)) {
        Step::Progress(_) => last,
        step => step,
    }
}
