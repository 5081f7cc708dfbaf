//! Campus Match - swipeable candidate-feed engine for the campus dating mini-app
//!
//! This library holds the engine behind the matching screen: a buffered
//! profile queue with prefetching, a drag-gesture interpreter, an optimistic
//! like/dislike coordinator and match detection. Rendering is left to the host.

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod session;

// Re-export commonly used types
pub use crate::config::{AcceptFailurePolicy, Settings};
pub use crate::core::{FeedEvent, GestureInterpreter, MatchDetector, PrefetchScheduler, ProfileQueue};
pub use error::{FeedError, FeedResult};
pub use models::{AcceptOutcome, Decision, Direction, Match, Profile, ProfileId};
pub use services::{ApiError, DatingApi, HttpDatingApi};
pub use session::{FeedSession, SwipeResult};
