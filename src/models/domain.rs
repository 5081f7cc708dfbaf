use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Server-assigned profile identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub i64);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProfileId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Candidate profile as served by the feed
///
/// Immutable once fetched. A profile lives in exactly one container at a
/// time (the queue, the liked-me list or a match).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub institute: Option<String>,
    #[serde(default)]
    pub course: Option<u8>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub prompt: Option<PromptAnswer>,
}

impl Profile {
    /// Minimal profile with only identity and name set
    pub fn new(id: impl Into<ProfileId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age: None,
            bio: None,
            university: None,
            institute: None,
            course: None,
            photos: Vec::new(),
            interests: Vec::new(),
            goals: Vec::new(),
            prompt: None,
        }
    }

    /// First photo url, used as the card cover
    pub fn cover_url(&self) -> Option<&str> {
        self.photos.first().map(|p| p.url.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub url: String,
    #[serde(default)]
    pub w: Option<u32>,
    #[serde(default)]
    pub h: Option<u32>,
}

/// Optional question/answer pair shown on the card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptAnswer {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Accept,
    Reject,
}

impl Direction {
    /// Direction implied by the sign of a horizontal drag
    pub fn from_delta(delta_x: f64) -> Self {
        if delta_x > 0.0 {
            Direction::Accept
        } else {
            Direction::Reject
        }
    }
}

/// Where a decision came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionSource {
    Swipe,
    Control,
}

/// Discrete accept/reject outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub direction: Direction,
    pub source: DecisionSource,
}

impl Decision {
    pub fn swipe(direction: Direction) -> Self {
        Self { direction, source: DecisionSource::Swipe }
    }

    pub fn control(direction: Direction) -> Self {
        Self { direction, source: DecisionSource::Control }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Pending,
    Confirmed,
    Failed,
}

/// One like/dislike decision on a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: Uuid,
    pub target_profile_id: ProfileId,
    pub direction: Direction,
    pub status: ActionStatus,
    pub created_at: DateTime<Utc>,
}

impl ActionRecord {
    pub fn pending(target_profile_id: ProfileId, direction: Direction) -> Self {
        Self {
            id: Uuid::new_v4(),
            target_profile_id,
            direction,
            status: ActionStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ActionStatus::Pending
    }
}

/// Result of a confirmed accept, consumed once by the match detector
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptOutcome {
    pub action_id: Uuid,
    pub target_profile_id: ProfileId,
    pub is_match: bool,
    pub matched_profile: Option<Profile>,
    pub match_id: Option<i64>,
    pub likes_count: Option<u32>,
}

/// Mutual match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    #[serde(default)]
    pub remote_id: Option<i64>,
    pub matched_profile: Profile,
    pub matched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Match {
    pub fn new(matched_profile: Profile, remote_id: Option<i64>, matched_at: DateTime<Utc>, window: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            remote_id,
            matched_profile,
            matched_at,
            expires_at: matched_at + window,
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Time left before the match expires, zero once expired
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}
