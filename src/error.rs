use thiserror::Error;

/// Errors that can occur when converting a wire-format or custom funnel into a `FunnelData`.
#[derive(Error, Debug, Clone)]
pub enum FunnelConversionError {
    #[error("Failed to parse funnel JSON: {0}")]
    JsonParseError(String),

    #[error("Node '{node_id}' has an unknown node type: '{type_name}'")]
    InvalidNodeType { node_id: String, type_name: String },

    #[error("Node '{node_id}' has an unknown answer type: '{answer_type}'")]
    InvalidAnswerType {
        node_id: String,
        answer_type: String,
    },

    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}

/// Errors raised while saving or loading a bundled funnel.
#[derive(Error, Debug, Clone)]
pub enum BundleError {
    #[error("Bundle I/O failed for '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Bundle encoding failed: {0}")]
    Encode(String),

    #[error("Bundle decoding failed: {0}")]
    Decode(String),
}

/// Reasons a media element may refuse to start playback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("Playback with sound was blocked by the autoplay policy")]
    Autoplay,

    #[error("Media could not be loaded: {0}")]
    Network(String),

    #[error("Media source is not supported: {0}")]
    Unsupported(String),
}

/// Errors reported by a `LeadSink` while handing off a completed funnel.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to serialize submission: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write submission: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised when loading a player configuration or visitor script from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
