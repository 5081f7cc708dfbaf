// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AcceptOutcome, ActionRecord, ActionStatus, Decision, DecisionSource, Direction, Match, Photo, Profile,
    ProfileId, PromptAnswer,
};
pub use requests::PageQuery;
pub use responses::{DislikeResponse, LikeResponse, StatsResponse};
