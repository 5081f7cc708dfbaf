use crate::models::{AcceptOutcome, Match};
use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

/// Turns confirmed accept results into matches
///
/// Keeps the session's match list, most recent first. A profile is matched
/// at most once per session, so replaying an outcome adds nothing.
#[derive(Debug, Clone)]
pub struct MatchDetector {
    matches: VecDeque<Match>,
    window: Duration,
}

impl MatchDetector {
    pub fn new(window: Duration) -> Self {
        Self {
            matches: VecDeque::new(),
            window,
        }
    }

    /// Record a match if the outcome is mutual
    ///
    /// Returns the new match, which the caller celebrates exactly once.
    /// Non-matches and already-seen outcomes return `None`.
    pub fn observe(&mut self, outcome: &AcceptOutcome, now: DateTime<Utc>) -> Option<Match> {
        if !outcome.is_match {
            return None;
        }

        let Some(profile) = outcome.matched_profile.clone() else {
            tracing::warn!("Match reported for {} without a profile", outcome.target_profile_id);
            return None;
        };

        if self.matches.iter().any(|m| m.matched_profile.id == profile.id) {
            tracing::debug!("Already matched with {}, outcome {} ignored", profile.id, outcome.action_id);
            return None;
        }

        let new_match = Match::new(profile, outcome.match_id, now, self.window);
        tracing::info!(
            "New match with {} (expires {})",
            new_match.matched_profile.id,
            new_match.expires_at
        );
        self.matches.push_front(new_match.clone());
        Some(new_match)
    }

    /// All matches of this session, newest first
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter()
    }

    /// Matches still inside their window
    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<Match> {
        self.matches.iter().filter(|m| m.is_active_at(now)).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl Default for MatchDetector {
    fn default() -> Self {
        Self::new(Duration::hours(24))
    }
}
