use crate::error::MediaError;
use std::collections::VecDeque;

/// Drives the media element of the presentation layer.
///
/// Implementations wrap whatever actually plays the video (a browser element,
/// a native player, or nothing at all when running headless).
///
/// # Example
///
/// ```rust
/// use michi::error::MediaError;
/// use michi::player::MediaDriver;
///
/// /// Plays mp4 sources only.
/// struct Mp4Only {
///     muted: bool,
/// }
///
/// impl MediaDriver for Mp4Only {
///     fn play(&mut self, url: &str, muted: bool) -> Result<(), MediaError> {
///         if !url.ends_with(".mp4") {
///             return Err(MediaError::Unsupported(url.to_string()));
///         }
///         self.muted = muted;
///         Ok(())
///     }
///
///     fn stop(&mut self) {}
///
///     fn set_muted(&mut self, muted: bool) {
///         self.muted = muted;
///     }
/// }
///
/// let mut driver = Mp4Only { muted: true };
/// assert!(driver.play("intro.webm", false).is_err());
/// assert!(driver.play("intro.mp4", false).is_ok());
/// ```
pub trait MediaDriver {
    /// Starts playback of `url`. May be rejected, e.g. by an autoplay policy when not muted.
    fn play(&mut self, url: &str, muted: bool) -> Result<(), MediaError>;

    /// Stops whatever is playing. Called when leaving a video node.
    fn stop(&mut self);

    /// Mutes or unmutes the element that is currently playing.
    fn set_muted(&mut self, muted: bool);
}

/// A media driver that accepts every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMedia;

impl MediaDriver for NullMedia {
    fn play(&mut self, _url: &str, _muted: bool) -> Result<(), MediaError> {
        Ok(())
    }

    fn stop(&mut self) {}

    fn set_muted(&mut self, _muted: bool) {}
}

/// A media driver that answers play requests from a queue of prepared outcomes
/// and remembers every request it saw. Accepts once the queue is empty.
#[derive(Debug, Default, Clone)]
pub struct ScriptedMedia {
    outcomes: VecDeque<Result<(), MediaError>>,
    pub requests: Vec<PlayRequest>,
    pub stops: usize,
    /// Every `set_muted` call, in order.
    pub mute_changes: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRequest {
    pub url: String,
    pub muted: bool,
}

impl ScriptedMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, outcome: Result<(), MediaError>) -> Self {
        self.outcomes.push_back(outcome);
        self
    }
}

impl MediaDriver for ScriptedMedia {
    fn play(&mut self, url: &str, muted: bool) -> Result<(), MediaError> {
        self.requests.push(PlayRequest {
            url: url.to_string(),
            muted,
        });
        self.outcomes.pop_front().unwrap_or(Ok(()))
    }

    fn stop(&mut self) {
        self.stops += 1;
    }

    fn set_muted(&mut self, muted: bool) {
        self.mute_changes.push(muted);
    }
}

impl<M: MediaDriver + ?Sized> MediaDriver for Box<M> {
    fn play(&mut self, url: &str, muted: bool) -> Result<(), MediaError> {
        (**self).play(url, muted)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn set_muted(&mut self, muted: bool) {
        (**self).set_muted(muted)
    }
}
