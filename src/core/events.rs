use crate::models::{Direction, Match, ProfileId};
use std::time::Duration;
use tokio::sync::mpsc;

/// Signals the engine hands to the view layer
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Animate the card off screen. Emitted before the remote call resolves.
    SwipeOut {
        profile_id: ProfileId,
        direction: Direction,
        duration: Duration,
    },
    /// Drag ended below the threshold; snap the card back
    SpringBack,
    /// One-shot celebration for a new mutual match
    Celebrate(Match),
    /// User-visible failure
    Error { profile_id: Option<ProfileId>, message: String },
    /// The feed has no more candidates
    Exhausted,
}

/// Sending half of the event channel
///
/// A dropped receiver means the screen was torn down; emitting then is a no-op.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<FeedEvent>,
}

impl EventSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<FeedEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: FeedEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Feed event dropped, no receiver");
        }
    }
}
