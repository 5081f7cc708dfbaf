use crate::config::AcceptFailurePolicy;
use crate::core::events::{EventSink, FeedEvent};
use crate::core::likes::SharedLikedMe;
use crate::core::queue::SharedQueue;
use crate::error::{FeedError, FeedResult};
use crate::models::{
    AcceptOutcome, ActionRecord, ActionStatus, Decision, Direction, LikeResponse, Profile, ProfileId,
};
use crate::services::DatingApi;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Decisions still waiting on the service
///
/// Holds at most one pending record per profile. Settled records leave the
/// ledger; only per-status tallies are kept.
#[derive(Debug, Default)]
pub struct ActionLedger {
    pending: HashMap<ProfileId, ActionRecord>,
    confirmed: usize,
    failed: usize,
}

impl ActionLedger {
    /// Open a pending record, refusing a second pending one for the same target
    pub fn begin(&mut self, target: ProfileId, direction: Direction) -> FeedResult<Uuid> {
        if self.pending.contains_key(&target) {
            return Err(FeedError::AlreadyPending(target));
        }
        let record = ActionRecord::pending(target, direction);
        let id = record.id;
        self.pending.insert(target, record);
        Ok(id)
    }

    /// Settle a pending record; returns it with its final status
    pub fn finish(&mut self, target: ProfileId, id: Uuid, status: ActionStatus) -> Option<ActionRecord> {
        let mut record = self.take(target, id)?;
        record.status = status;
        match status {
            ActionStatus::Confirmed => self.confirmed += 1,
            ActionStatus::Failed => self.failed += 1,
            ActionStatus::Pending => {}
        }
        Some(record)
    }

    /// Drop a pending record that never reached the service
    pub fn abandon(&mut self, target: ProfileId, id: Uuid) {
        self.take(target, id);
    }

    pub fn pending_for(&self, target: ProfileId) -> Option<&ActionRecord> {
        self.pending.get(&target)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn confirmed_count(&self) -> usize {
        self.confirmed
    }

    pub fn failed_count(&self) -> usize {
        self.failed
    }

    fn take(&mut self, target: ProfileId, id: Uuid) -> Option<ActionRecord> {
        match self.pending.get(&target) {
            Some(record) if record.id == id => self.pending.remove(&target),
            _ => None,
        }
    }
}

pub type SharedLedger = Arc<Mutex<ActionLedger>>;

/// Applies decisions locally first, then reconciles with the service
///
/// Rejects are fire-and-forget and never rolled back. Accepts advance the
/// queue before the like call resolves; a failed like is surfaced as an
/// error event and handled per [`AcceptFailurePolicy`].
#[derive(Clone)]
pub struct ActionCoordinator {
    api: Arc<dyn DatingApi>,
    queue: SharedQueue,
    liked_me: SharedLikedMe,
    ledger: SharedLedger,
    events: EventSink,
    policy: AcceptFailurePolicy,
    swipe_out: Duration,
}

impl ActionCoordinator {
    pub fn new(
        api: Arc<dyn DatingApi>,
        queue: SharedQueue,
        liked_me: SharedLikedMe,
        events: EventSink,
        policy: AcceptFailurePolicy,
        swipe_out: Duration,
    ) -> Self {
        Self {
            api,
            queue,
            liked_me,
            ledger: Arc::new(Mutex::new(ActionLedger::default())),
            events,
            policy,
            swipe_out,
        }
    }

    pub fn ledger(&self) -> SharedLedger {
        self.ledger.clone()
    }

    /// Apply a decision to a queued profile
    ///
    /// Returns the accept outcome for accepts, `None` for rejects.
    pub async fn apply(&self, decision: Decision, profile: Profile) -> FeedResult<Option<AcceptOutcome>> {
        tracing::info!("Applying {:?} ({:?}) to profile {}", decision.direction, decision.source, profile.id);

        match decision.direction {
            Direction::Reject => {
                self.reject(&profile).await?;
                Ok(None)
            }
            Direction::Accept => self.accept(profile).await.map(Some),
        }
    }

    /// Remove the profile and send the dislike in the background
    ///
    /// The returned handle resolves once the remote call settles; dropping it
    /// does not cancel the call.
    pub async fn reject(&self, profile: &Profile) -> FeedResult<JoinHandle<()>> {
        let action_id = self.begin_and_remove(profile.id, Direction::Reject).await?;
        self.emit_swipe_out(profile.id, Direction::Reject);
        Ok(self.spawn_reject(action_id, profile.id))
    }

    /// Remove the profile, then await the like call
    pub async fn accept(&self, profile: Profile) -> FeedResult<AcceptOutcome> {
        let action_id = self.begin_and_remove(profile.id, Direction::Accept).await?;
        self.emit_swipe_out(profile.id, Direction::Accept);

        match self.api.decide_accept(profile.id).await {
            Ok(response) => {
                self.ledger.lock().await.finish(profile.id, action_id, ActionStatus::Confirmed);
                Ok(outcome(action_id, profile, response))
            }
            Err(e) => {
                self.ledger.lock().await.finish(profile.id, action_id, ActionStatus::Failed);
                tracing::error!("Like failed for profile {}: {}", profile.id, e);
                self.events.emit(FeedEvent::Error {
                    profile_id: Some(profile.id),
                    message: format!("Could not like {}: {}", profile.name, e),
                });

                if self.policy == AcceptFailurePolicy::Restore {
                    let id = profile.id;
                    if self.queue.lock().await.restore(profile) {
                        tracing::info!("Restored profile {} after failed like", id);
                    }
                }
                Err(FeedError::Remote(e))
            }
        }
    }

    /// Accept someone from the liked-me list rather than the live queue
    ///
    /// The profile leaves the list only once the like is confirmed; the
    /// queue is not touched.
    pub async fn accept_from_list(&self, profile_id: ProfileId) -> FeedResult<AcceptOutcome> {
        let profile = self
            .liked_me
            .lock()
            .await
            .find(profile_id)
            .cloned()
            .ok_or(FeedError::NotInLikesList(profile_id))?;

        let action_id = self.ledger.lock().await.begin(profile_id, Direction::Accept)?;

        match self.api.decide_accept(profile_id).await {
            Ok(response) => {
                self.ledger.lock().await.finish(profile_id, action_id, ActionStatus::Confirmed);
                self.liked_me.lock().await.remove(profile_id);
                tracing::info!("Accepted profile {} from likes list", profile_id);
                Ok(outcome(action_id, profile, response))
            }
            Err(e) => {
                self.ledger.lock().await.finish(profile_id, action_id, ActionStatus::Failed);
                tracing::error!("Like from list failed for profile {}: {}", profile_id, e);
                self.events.emit(FeedEvent::Error {
                    profile_id: Some(profile_id),
                    message: format!("Could not like {}: {}", profile.name, e),
                });
                Err(FeedError::Remote(e))
            }
        }
    }

    /// Drop someone from the liked-me list with a best-effort dislike
    pub async fn reject_from_list(&self, profile_id: ProfileId) -> FeedResult<JoinHandle<()>> {
        let mut ledger = self.ledger.lock().await;
        let action_id = ledger.begin(profile_id, Direction::Reject)?;
        if self.liked_me.lock().await.remove(profile_id).is_none() {
            ledger.abandon(profile_id, action_id);
            return Err(FeedError::NotInLikesList(profile_id));
        }
        drop(ledger);

        Ok(self.spawn_reject(action_id, profile_id))
    }

    async fn begin_and_remove(&self, id: ProfileId, direction: Direction) -> FeedResult<Uuid> {
        let mut ledger = self.ledger.lock().await;
        let action_id = ledger.begin(id, direction)?;
        self.queue.lock().await.remove(id);
        Ok(action_id)
    }

    fn emit_swipe_out(&self, profile_id: ProfileId, direction: Direction) {
        self.events.emit(FeedEvent::SwipeOut {
            profile_id,
            direction,
            duration: self.swipe_out,
        });
    }

    fn spawn_reject(&self, action_id: Uuid, profile_id: ProfileId) -> JoinHandle<()> {
        let api = self.api.clone();
        let ledger = self.ledger.clone();

        tokio::spawn(async move {
            let status = match api.decide_reject(profile_id).await {
                Ok(_) => {
                    tracing::debug!("Dislike recorded for profile {}", profile_id);
                    ActionStatus::Confirmed
                }
                Err(e) => {
                    tracing::warn!("Dislike failed for profile {} (not retried): {}", profile_id, e);
                    ActionStatus::Failed
                }
            };
            ledger.lock().await.finish(profile_id, action_id, status);
        })
    }
}

fn outcome(action_id: Uuid, profile: Profile, response: LikeResponse) -> AcceptOutcome {
    let target_profile_id = profile.id;
    let matched_profile = if response.is_match {
        Some(response.matched_profile.unwrap_or(profile))
    } else {
        None
    };

    AcceptOutcome {
        action_id,
        target_profile_id,
        is_match: response.is_match,
        matched_profile,
        match_id: response.match_id,
        likes_count: response.likes_count,
    }
}
