use crate::models::ProfileId;
use crate::services::ApiError;
use thiserror::Error;

/// Errors surfaced by feed operations
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Remote call failed: {0}")]
    Remote(#[from] ApiError),

    #[error("No profile on screen")]
    NoCurrentProfile,

    #[error("Decision already pending for profile {0}")]
    AlreadyPending(ProfileId),

    #[error("Profile {0} is not in the likes list")]
    NotInLikesList(ProfileId),
}

pub type FeedResult<T> = Result<T, FeedError>;
