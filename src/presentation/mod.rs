//! Maps player state to what should be on screen.

use crate::graph::{AnswerOption, ButtonStyle, LeadField, NodeKind};
use crate::player::{FunnelPlayer, MediaDriver, Mode, Playback, Stage};
use crate::routing::AnswerType;

mod formatter;

pub use formatter::ViewFormatter;

/// One of the visual modes of the funnel.
#[derive(Debug, Clone, PartialEq)]
pub enum View<'a> {
    /// Before the visitor's start gesture.
    Start { funnel: &'a str },
    /// Between two nodes.
    Blank,
    Video {
        node_id: &'a str,
        url: Option<&'a str>,
        overlay: Option<&'a str>,
        muted: bool,
        progress: f64,
        /// Playback was rejected; a manual play control has to be offered.
        needs_manual_play: bool,
        /// `None` until revealed, or when the node takes no answer.
        controls: Option<Controls<'a>>,
    },
    LeadCapture {
        node_id: &'a str,
        title: Option<&'a str>,
        description: Option<&'a str>,
        fields: &'a [LeadField],
        submit_text: &'a str,
    },
    End {
        node_id: &'a str,
        title: Option<&'a str>,
        message: Option<&'a str>,
    },
}

/// The interactive control of a video node.
#[derive(Debug, Clone, PartialEq)]
pub enum Controls<'a> {
    Button {
        label: &'a str,
        style: Option<&'a ButtonStyle>,
    },
    YesNo,
    Text { value: &'a str, can_submit: bool },
    Email { value: &'a str, can_submit: bool },
    Rating { selected: Option<u8> },
    MultipleChoice { options: &'a [AnswerOption] },
}

impl<M: MediaDriver> FunnelPlayer<M> {
    /// The view for the current state.
    pub fn view(&self) -> View<'_> {
        render(self)
    }
}

/// Renders the player's state. A node id that does not resolve to a node renders blank.
pub fn render<M: MediaDriver>(player: &FunnelPlayer<M>) -> View<'_> {
    let (node_id, video_state) = match player.mode() {
        Mode::NotStarted => {
            return View::Start {
                funnel: player.graph().name(),
            };
        }
        Mode::Transitioning(_) => return View::Blank,
        Mode::Completed { node_id } => (node_id.as_str(), None),
        Mode::Presenting(presenting) => match &presenting.stage {
            Stage::Video(video) => (presenting.node_id.as_str(), Some(video)),
            Stage::LeadCapture => (presenting.node_id.as_str(), None),
        },
    };
    let Some(node) = player.graph().node(node_id) else {
        return View::Blank;
    };

    match (&node.kind, video_state) {
        (NodeKind::Video(video), Some(state)) => {
            let controls = if state.controls_visible {
                match video.answer_type {
                    AnswerType::None => None,
                    AnswerType::Button => Some(Controls::Button {
                        label: video.button_text.as_deref().unwrap_or("Continue"),
                        style: video.button_style.as_ref(),
                    }),
                    AnswerType::YesNo => Some(Controls::YesNo),
                    AnswerType::Text => Some(Controls::Text {
                        value: &state.text_input,
                        can_submit: player.can_submit_text(),
                    }),
                    AnswerType::Email => Some(Controls::Email {
                        value: &state.text_input,
                        can_submit: player.can_submit_text(),
                    }),
                    AnswerType::Rating => Some(Controls::Rating {
                        selected: state.selected_rating,
                    }),
                    AnswerType::MultipleChoice if video.answers.is_empty() => None,
                    AnswerType::MultipleChoice => Some(Controls::MultipleChoice {
                        options: &video.answers,
                    }),
                }
            } else {
                None
            };
            View::Video {
                node_id: &node.id,
                url: video.video_url.as_deref(),
                overlay: video.overlay_text.as_deref(),
                muted: player.is_muted(),
                progress: state.progress,
                needs_manual_play: state.playback == Playback::Blocked,
                controls,
            }
        }
        (NodeKind::LeadCapture(form), _) => View::LeadCapture {
            node_id: &node.id,
            title: form.title.as_deref(),
            description: form.description.as_deref(),
            fields: &form.fields,
            submit_text: form.submit_text.as_deref().unwrap_or("Submit"),
        },
        (NodeKind::End(end), _) => View::End {
            node_id: &node.id,
            title: end.title.as_deref(),
            message: end.message.as_deref(),
        },
        _ => View::Blank,
    }
}
