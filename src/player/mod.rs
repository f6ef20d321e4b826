use crate::config::PlayerConfig;
use crate::graph::{FunnelGraph, FunnelNode, NodeKind, VideoNode};
use crate::recorder::{Response, ResponseRecorder};
use crate::resolver::NodeResolver;
use crate::routing::{Answer, AnswerType, DEFAULT_KEY};
use crate::session::{LeadData, LeadSubmission, SessionId};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::span::EnteredSpan;

pub mod media;
mod mode;

pub use media::{MediaDriver, NullMedia, PlayRequest, ScriptedMedia};
pub use mode::*;

/// A media callback, scoped to the node whose video emitted it.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEvent {
    pub node_id: String,
    pub kind: MediaEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEventKind {
    /// Playback position and total duration, in seconds.
    TimeUpdate { position: f64, duration: f64 },
    Ended,
}

impl MediaEvent {
    pub fn time_update(node_id: &str, position: f64, duration: f64) -> Self {
        Self {
            node_id: node_id.to_string(),
            kind: MediaEventKind::TimeUpdate { position, duration },
        }
    }

    pub fn ended(node_id: &str) -> Self {
        Self {
            node_id: node_id.to_string(),
            kind: MediaEventKind::Ended,
        }
    }
}

/// Builds a `FunnelPlayer`.
pub struct PlayerBuilder<M: MediaDriver> {
    graph: Arc<FunnelGraph>,
    config: PlayerConfig,
    session_id: Option<SessionId>,
    media: M,
}

impl PlayerBuilder<NullMedia> {
    pub fn new(graph: Arc<FunnelGraph>) -> Self {
        Self {
            graph,
            config: PlayerConfig::default(),
            session_id: None,
            media: NullMedia,
        }
    }
}

impl<M: MediaDriver> PlayerBuilder<M> {
    pub fn config(mut self, config: PlayerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn session_id(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn media<N: MediaDriver>(self, media: N) -> PlayerBuilder<N> {
        PlayerBuilder {
            graph: self.graph,
            config: self.config,
            session_id: self.session_id,
            media,
        }
    }

    pub fn build(self) -> FunnelPlayer<M> {
        FunnelPlayer {
            graph: self.graph,
            config: self.config,
            session_id: self.session_id.unwrap_or_else(SessionId::generate),
            media: self.media,
            mode: Mode::NotStarted,
            is_muted: true,
            recorder: ResponseRecorder::new(),
            lead_data: None,
        }
    }
}

/// Walks one visitor through a funnel graph.
///
/// The player owns all per-visitor state and never fails: operations that do
/// not apply to the current state return `Step::Ignored`, dead ends return
/// `Step::Stayed`. Time only moves through [`advance_clock`](Self::advance_clock)
/// and media events, so the player can be driven headless.
pub struct FunnelPlayer<M: MediaDriver = NullMedia> {
    graph: Arc<FunnelGraph>,
    config: PlayerConfig,
    session_id: SessionId,
    media: M,
    mode: Mode,
    is_muted: bool,
    recorder: ResponseRecorder,
    lead_data: Option<LeadData>,
}

impl FunnelPlayer<NullMedia> {
    pub fn builder(graph: Arc<FunnelGraph>) -> PlayerBuilder<NullMedia> {
        PlayerBuilder::new(graph)
    }

    pub fn new(graph: Arc<FunnelGraph>) -> Self {
        PlayerBuilder::new(graph).build()
    }
}

impl<M: MediaDriver> FunnelPlayer<M> {
    // --- Accessors ---

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn graph(&self) -> &FunnelGraph {
        &self.graph
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    /// The current node. While transitioning this is still the node being left.
    pub fn current_node_id(&self) -> Option<&str> {
        match &self.mode {
            Mode::NotStarted => None,
            Mode::Presenting(p) => Some(p.node_id.as_str()),
            Mode::Transitioning(t) => Some(t.from.as_str()),
            Mode::Completed { node_id } => Some(node_id.as_str()),
        }
    }

    pub fn current_node(&self) -> Option<&FunnelNode> {
        self.current_node_id().and_then(|id| self.graph.node(id))
    }

    pub fn is_started(&self) -> bool {
        !matches!(self.mode, Mode::NotStarted)
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.mode, Mode::Transitioning(_))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.mode, Mode::Completed { .. })
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn video_state(&self) -> Option<&VideoState> {
        match &self.mode {
            Mode::Presenting(Presenting {
                stage: Stage::Video(video),
                ..
            }) => Some(video),
            _ => None,
        }
    }

    pub fn buttons_visible(&self) -> bool {
        self.video_state().is_some_and(|v| v.controls_visible)
    }

    pub fn progress(&self) -> f64 {
        self.video_state().map_or(0.0, |v| v.progress)
    }

    pub fn selected_rating(&self) -> Option<u8> {
        self.video_state().and_then(|v| v.selected_rating)
    }

    pub fn text_input(&self) -> &str {
        self.video_state().map_or("", |v| v.text_input.as_str())
    }

    pub fn responses(&self) -> &[Response] {
        self.recorder.responses()
    }

    pub fn lead_data(&self) -> Option<&LeadData> {
        self.lead_data.as_ref()
    }

    /// The visitor's trail, available once an end node was reached or lead data was captured.
    pub fn submission(&self) -> Option<LeadSubmission> {
        let end_node_id = match &self.mode {
            Mode::Completed { node_id } => Some(node_id.clone()),
            _ => None,
        };
        if end_node_id.is_none() && self.lead_data.is_none() {
            return None;
        }
        Some(LeadSubmission {
            session_id: self.session_id,
            funnel_name: self.graph.name().to_string(),
            responses: self.recorder.responses().to_vec(),
            lead_data: self.lead_data.clone(),
            end_node_id,
            submitted_at: Utc::now(),
        })
    }

    // --- Visitor actions ---

    /// Starts the funnel. Must be called from the visitor's click: sound is
    /// unmuted right here, before the first video is asked to play.
    pub fn start(&mut self) -> Step {
        let _span = self.span();
        if self.is_started() {
            return Step::Ignored;
        }
        self.is_muted = false;

        let start_id = self.graph.start_id().to_string();
        match self.settle(&start_id) {
            Some(first) => {
                tracing::info!(funnel = %self.graph.name(), first = %first, "funnel started");
                self.enter(first)
            }
            None => {
                tracing::warn!(funnel = %self.graph.name(), "funnel has no first node");
                Step::Stayed
            }
        }
    }

    /// Flips the mute state and applies it to the playing video, if any.
    pub fn toggle_mute(&mut self) -> Step {
        self.is_muted = !self.is_muted;
        if self.video_state().is_some() {
            self.media.set_muted(self.is_muted);
        }
        Step::Updated
    }

    /// Submits an answer for the current video node.
    ///
    /// The response is recorded and routed by the node's answer type. Without a
    /// next node the player stays where it is.
    pub fn handle_answer(&mut self, answer: Answer) -> Step {
        let _span = self.span();
        let graph = Arc::clone(&self.graph);
        let Some((node_id, video)) = self.interactive_video(&graph) else {
            tracing::debug!(%answer, "answer ignored, no interactive node is presented");
            return Step::Ignored;
        };
        if video.answer_type == AnswerType::None {
            return Step::Ignored;
        }

        let node_id = node_id.to_string();
        match self
            .recorder
            .record_and_route(&graph, &node_id, answer, video.answer_type)
        {
            Some(next) => self.begin_transition(node_id, next),
            None => Step::Stayed,
        }
    }

    pub fn press_button(&mut self) -> Step {
        let label = match self.presented_video() {
            Some(video) if video.answer_type == AnswerType::Button => video
                .button_text
                .clone()
                .unwrap_or_else(|| "continue".to_string()),
            _ => return Step::Ignored,
        };
        self.handle_answer(Answer::Text(label))
    }

    pub fn answer_yes_no(&mut self, yes: bool) -> Step {
        match self.presented_video() {
            Some(video) if video.answer_type == AnswerType::YesNo => {
                self.handle_answer(Answer::Bool(yes))
            }
            _ => Step::Ignored,
        }
    }

    /// Picks the option at `index` of a multiple-choice node.
    pub fn choose(&mut self, index: usize) -> Step {
        match self.presented_video() {
            Some(video)
                if video.answer_type == AnswerType::MultipleChoice
                    && index < video.answers.len() =>
            {
                self.handle_answer(Answer::from(index))
            }
            _ => Step::Ignored,
        }
    }

    pub fn select_rating(&mut self, rating: u8) -> Step {
        if !(1..=5).contains(&rating) || !self.presents_answer_type(&[AnswerType::Rating]) {
            return Step::Ignored;
        }
        match self.video_state_mut() {
            Some(video) if video.controls_visible => {
                video.selected_rating = Some(rating);
                Step::Updated
            }
            _ => Step::Ignored,
        }
    }

    /// Submits the selected rating. Ignored until a rating is selected.
    pub fn submit_rating(&mut self) -> Step {
        if !self.presents_answer_type(&[AnswerType::Rating]) {
            return Step::Ignored;
        }
        match self.selected_rating() {
            Some(rating) => self.handle_answer(Answer::from(rating)),
            None => Step::Ignored,
        }
    }

    pub fn set_text_input(&mut self, text: &str) -> Step {
        if !self.presents_answer_type(&[AnswerType::Text, AnswerType::Email]) {
            return Step::Ignored;
        }
        match self.video_state_mut() {
            Some(video) if video.controls_visible => {
                video.text_input = text.to_string();
                Step::Updated
            }
            _ => Step::Ignored,
        }
    }

    /// Whether the text/email input currently holds a submittable value.
    pub fn can_submit_text(&self) -> bool {
        let Some(video) = self.presented_video() else {
            return false;
        };
        let input = self.text_input().trim();
        match video.answer_type {
            AnswerType::Text => !input.is_empty(),
            AnswerType::Email => looks_like_email(input),
            _ => false,
        }
    }

    /// Submits the text input. Ignored while the input is empty (or not an email address).
    pub fn submit_text(&mut self) -> Step {
        if !self.can_submit_text() {
            return Step::Ignored;
        }
        let text = self.text_input().trim().to_string();
        self.handle_answer(Answer::Text(text))
    }

    /// Submits the lead-capture form of the current node.
    ///
    /// Values are stored as given. Required fields must be non-empty, otherwise
    /// the form is not submittable and the call is ignored.
    pub fn submit_lead(&mut self, fields: LeadData) -> Step {
        let _span = self.span();
        let graph = Arc::clone(&self.graph);
        let node = match &self.mode {
            Mode::Presenting(Presenting {
                node_id,
                stage: Stage::LeadCapture,
            }) => graph.node(node_id),
            _ => None,
        };
        let Some(node) = node else {
            return Step::Ignored;
        };
        let NodeKind::LeadCapture(form) = &node.kind else {
            return Step::Ignored;
        };

        let missing = form
            .fields
            .iter()
            .filter(|f| f.required)
            .find(|f| fields.get(&f.name).is_none_or(|v| v.trim().is_empty()));
        if let Some(field) = missing {
            tracing::debug!(node = %node.id, field = %field.name, "lead form incomplete");
            return Step::Ignored;
        }

        tracing::info!(node = %node.id, fields = fields.len(), "lead captured");
        self.lead_data = Some(fields);

        match NodeResolver::new(&graph).resolve_next(&node.id, DEFAULT_KEY) {
            Some(next) => self.begin_transition(node.id.clone(), next),
            None => Step::Stayed,
        }
    }

    // --- Media and clock ---

    /// Feeds a media callback. Events for any node but the presented one are dropped.
    pub fn on_media(&mut self, event: MediaEvent) -> Step {
        let _span = self.span();
        let graph = Arc::clone(&self.graph);
        let Some((node_id, video_node)) = self.interactive_video(&graph) else {
            return Step::Ignored;
        };
        if node_id != event.node_id {
            tracing::debug!(event_node = %event.node_id, current = node_id, "stale media event dropped");
            return Step::Ignored;
        }
        let node_id = node_id.to_string();
        let reveal_delay = video_node
            .reveal_delay
            .unwrap_or(self.config.default_reveal_delay);
        let reveal_on_end = self.config.reveal_on_end;

        match event.kind {
            MediaEventKind::TimeUpdate { position, duration } => {
                let Some(video) = self.video_state_mut() else {
                    return Step::Ignored;
                };
                if duration > 0.0 {
                    video.progress = (position / duration * 100.0).clamp(0.0, 100.0);
                }
                if !video.controls_visible && position >= reveal_delay {
                    video.controls_visible = true;
                    tracing::debug!(node = %node_id, position, "controls revealed");
                    return Step::ControlsRevealed;
                }
                Step::Progress(video.progress)
            }
            MediaEventKind::Ended => {
                if !video_node.needs_interaction() {
                    if let Some(video) = self.video_state_mut() {
                        video.progress = 100.0;
                    }
                    return match NodeResolver::new(&graph).resolve_next(&node_id, DEFAULT_KEY) {
                        Some(next) => self.begin_transition(node_id, next),
                        None => Step::Stayed,
                    };
                }
                let Some(video) = self.video_state_mut() else {
                    return Step::Ignored;
                };
                video.progress = 100.0;
                if reveal_on_end && !video.controls_visible {
                    video.controls_visible = true;
                    return Step::ControlsRevealed;
                }
                Step::Progress(video.progress)
            }
        }
    }

    /// Advances the playback clock. Completes a running transition once its duration elapsed.
    pub fn advance_clock(&mut self, elapsed: Duration) -> Step {
        let duration = self.config.transition_duration();
        let done = match &mut self.mode {
            Mode::Transitioning(transition) => {
                transition.elapsed += elapsed;
                transition.elapsed >= duration
            }
            _ => return Step::Ignored,
        };
        if done {
            self.finish_transition()
        } else {
            Step::Waiting
        }
    }

    /// Completes a running transition immediately.
    pub fn finish_transition(&mut self) -> Step {
        let _span = self.span();
        let to = match &self.mode {
            Mode::Transitioning(transition) => transition.to.clone(),
            _ => return Step::Ignored,
        };
        self.enter(to)
    }

    // --- Internals ---

    fn span(&self) -> EnteredSpan {
        tracing::debug_span!("funnel", session = %self.session_id).entered()
    }

    /// The presented video node and its id, when one is presented and not transitioning.
    fn interactive_video<'g>(&self, graph: &'g FunnelGraph) -> Option<(&'g str, &'g VideoNode)> {
        let Mode::Presenting(Presenting {
            node_id,
            stage: Stage::Video(_),
        }) = &self.mode
        else {
            return None;
        };
        let node = graph.node(node_id)?;
        match &node.kind {
            NodeKind::Video(video) => Some((node.id.as_str(), video)),
            _ => None,
        }
    }

    /// The presented video node, if its controls are revealed.
    fn presented_video(&self) -> Option<&VideoNode> {
        if !self.buttons_visible() {
            return None;
        }
        self.interactive_video(&self.graph).map(|(_, video)| video)
    }

    fn presents_answer_type(&self, types: &[AnswerType]) -> bool {
        self.interactive_video(&self.graph)
            .is_some_and(|(_, video)| types.contains(&video.answer_type))
    }

    fn video_state_mut(&mut self) -> Option<&mut VideoState> {
        match &mut self.mode {
            Mode::Presenting(Presenting {
                stage: Stage::Video(video),
                ..
            }) => Some(video),
            _ => None,
        }
    }

    /// Follows `id` past start nodes to the first node that can be presented.
    fn settle(&self, id: &str) -> Option<String> {
        let resolver = NodeResolver::new(&self.graph);
        let mut current = resolver.resolve_next(id, DEFAULT_KEY)?;
        for _ in 0..self.graph.nodes().len() {
            match self.graph.node(&current) {
                Some(node) if matches!(node.kind, NodeKind::Start) => {
                    current = resolver.resolve_next(&current, DEFAULT_KEY)?;
                }
                Some(_) => return Some(current),
                None => {
                    tracing::warn!(target_node = %current, "route leads to a missing node");
                    return None;
                }
            }
        }
        tracing::warn!(node = id, "start nodes form a cycle");
        None
    }

    fn begin_transition(&mut self, from: String, to: String) -> Step {
        let to = match self.graph.node(&to) {
            Some(node) if matches!(node.kind, NodeKind::Start) => match self.settle(&to) {
                Some(settled) => settled,
                None => return Step::Stayed,
            },
            Some(_) => to,
            None => {
                tracing::warn!(node = %from, target_node = %to, "route leads to a missing node");
                return Step::Stayed;
            }
        };

        if self.video_state().is_some() {
            self.media.stop();
        }
        tracing::debug!(from = %from, to = %to, "transition started");
        self.mode = Mode::Transitioning(Transition {
            from: from.clone(),
            to: to.clone(),
            elapsed: Duration::ZERO,
        });

        if self.config.transition_ms == 0 {
            return self.enter(to);
        }
        Step::Transitioning { from, to }
    }

    /// Makes `id` the current node, resetting all per-node state.
    fn enter(&mut self, id: String) -> Step {
        let graph = Arc::clone(&self.graph);
        let Some(node) = graph.node(&id) else {
            tracing::warn!(target_node = %id, "cannot enter a missing node");
            return Step::Stayed;
        };

        match &node.kind {
            NodeKind::Video(video) => {
                let delay = video.reveal_delay.unwrap_or(self.config.default_reveal_delay);
                let playback = match &video.video_url {
                    Some(url) => self.play(url),
                    None => Playback::NoSource,
                };
                self.mode = Mode::Presenting(Presenting {
                    node_id: id.clone(),
                    stage: Stage::Video(VideoState {
                        controls_visible: delay <= 0.0,
                        playback,
                        ..VideoState::default()
                    }),
                });
                tracing::debug!(node = %id, "presenting video");
                Step::Entered(id)
            }
            NodeKind::LeadCapture(_) => {
                self.mode = Mode::Presenting(Presenting {
                    node_id: id.clone(),
                    stage: Stage::LeadCapture,
                });
                tracing::debug!(node = %id, "presenting lead capture");
                Step::Entered(id)
            }
            NodeKind::End(_) => {
                tracing::info!(node = %id, responses = self.recorder.len(), "funnel completed");
                self.mode = Mode::Completed {
                    node_id: id.clone(),
                };
                Step::Completed(id)
            }
            NodeKind::Start => {
                // Start nodes are skipped by `settle` before entering.
                tracing::warn!(node = %id, "start node cannot be presented");
                Step::Stayed
            }
        }
    }

    /// Requests playback, retrying muted when sound is rejected.
    fn play(&mut self, url: &str) -> Playback {
        let first = self.media.play(url, self.is_muted);
        let Err(error) = first else {
            return Playback::Playing;
        };

        if self.is_muted || !self.config.muted_fallback {
            tracing::error!(url, %error, "playback failed");
            return Playback::Blocked;
        }

        tracing::warn!(url, %error, "playback with sound rejected, retrying muted");
        self.is_muted = true;
        match self.media.play(url, true) {
            Ok(()) => Playback::Playing,
            Err(error) => {
                tracing::error!(url, %error, "muted playback failed");
                Playback::Blocked
            }
        }
    }
}

fn looks_like_email(input: &str) -> bool {
    match input.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}
