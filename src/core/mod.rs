// Core engine exports
pub mod coordinator;
pub mod events;
pub mod gesture;
pub mod likes;
pub mod matches;
pub mod prefetch;
pub mod queue;

pub use coordinator::{ActionCoordinator, ActionLedger, SharedLedger};
pub use events::{EventSink, FeedEvent};
pub use gesture::{Feedback, GestureEvent, GestureInterpreter, GestureOutput, GestureState};
pub use likes::{LikedMeList, SharedLikedMe};
pub use matches::MatchDetector;
pub use prefetch::{Backoff, PrefetchOutcome, PrefetchScheduler, SkipReason};
pub use queue::{ProfileQueue, SharedQueue};
