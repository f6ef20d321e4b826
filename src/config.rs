use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Tunables of a `FunnelPlayer`. Missing fields take their defaults when loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    /// Length of the crossfade between two nodes, in milliseconds.
    pub transition_ms: u64,
    /// Reveal delay for video nodes that configure none, in seconds.
    pub default_reveal_delay: f64,
    /// Retry muted when playback with sound is rejected.
    pub muted_fallback: bool,
    /// Reveal the controls when a video ends before its reveal delay.
    pub reveal_on_end: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            transition_ms: 300,
            default_reveal_delay: 0.0,
            muted_fallback: true,
            reveal_on_end: true,
        }
    }
}

impl PlayerConfig {
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Load a configuration from a JSON file.
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
}
