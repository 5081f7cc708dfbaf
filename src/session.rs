//! One swipe screen's worth of engine state
//!
//! `FeedSession` owns the queue, the prefetcher, the gesture machine, the
//! action coordinator and the match list, and is the only object the view
//! layer talks to. Visual and one-shot signals arrive on the event receiver
//! returned by [`FeedSession::new`].

use crate::config::Settings;
use crate::core::{
    ActionCoordinator, Backoff, EventSink, Feedback, FeedEvent, GestureInterpreter, GestureOutput, GestureState,
    LikedMeList, MatchDetector, PrefetchOutcome, PrefetchScheduler, ProfileQueue, SharedLikedMe, SharedQueue,
};
use crate::error::{FeedError, FeedResult};
use crate::models::{AcceptOutcome, Decision, Direction, Match, Profile, ProfileId, StatsResponse};
use crate::services::DatingApi;
use chrono::Utc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex as SyncMutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Mutex;

/// What a finished gesture or control press did
#[derive(Debug, Clone, PartialEq)]
pub enum SwipeResult {
    /// Event arrived in a state where it means nothing
    Ignored,
    SpringBack,
    Rejected(ProfileId),
    Accepted {
        outcome: AcceptOutcome,
        new_match: Option<Match>,
    },
}

pub struct FeedSession {
    settings: Settings,
    api: Arc<dyn DatingApi>,
    queue: SharedQueue,
    liked_me: SharedLikedMe,
    prefetch: PrefetchScheduler,
    coordinator: ActionCoordinator,
    matches: Arc<Mutex<MatchDetector>>,
    gesture: SyncMutex<GestureInterpreter>,
    likes_count: AtomicU32,
    events: EventSink,
}

impl FeedSession {
    pub fn new(api: Arc<dyn DatingApi>, settings: Settings) -> (Self, UnboundedReceiver<FeedEvent>) {
        let (events, rx) = EventSink::channel();
        let queue = ProfileQueue::shared();
        let liked_me = LikedMeList::shared();

        let backoff = Backoff::new(
            Duration::from_millis(settings.feed.backoff_base_ms),
            Duration::from_millis(settings.feed.backoff_max_ms),
        );
        let prefetch = PrefetchScheduler::new(
            api.clone(),
            queue.clone(),
            events.clone(),
            settings.feed.page_size,
            backoff,
        );
        let coordinator = ActionCoordinator::new(
            api.clone(),
            queue.clone(),
            liked_me.clone(),
            events.clone(),
            settings.actions.accept_failure,
            Duration::from_millis(settings.actions.swipe_out_ms),
        );

        let session = Self {
            matches: Arc::new(Mutex::new(MatchDetector::new(settings.match_window()))),
            gesture: SyncMutex::new(GestureInterpreter::new(settings.gesture)),
            likes_count: AtomicU32::new(0),
            settings,
            api,
            queue,
            liked_me,
            prefetch,
            coordinator,
            events,
        };

        (session, rx)
    }

    /// Screen mount: load the first page if nothing is on screen, refresh stats
    pub async fn mount(&self) -> Option<PrefetchOutcome> {
        let needs_load = {
            let queue = self.queue.lock().await;
            queue.current().is_none() && !queue.is_exhausted()
        };

        let outcome = if needs_load {
            Some(self.prefetch.request_more(true).await)
        } else {
            None
        };

        if let Err(e) = self.refresh_stats().await {
            tracing::warn!("Failed to load dating stats: {}", e);
        }

        outcome
    }

    /// Low-water-mark callback from the view layer
    pub async fn on_low_water_mark(&self) -> PrefetchOutcome {
        tracing::debug!("Low-water mark reached, requesting more candidates");
        self.prefetch.request_more(false).await
    }

    /// Restart the feed from the first page
    pub async fn reload(&self) -> PrefetchOutcome {
        self.prefetch.request_more(true).await
    }

    /// Whether the queue has dropped below the configured low-water mark
    pub async fn needs_refill(&self) -> bool {
        let queue = self.queue.lock().await;
        !queue.is_exhausted() && queue.length() < self.settings.feed.low_water_mark
    }

    pub fn drag_start(&self) {
        self.gesture().on_drag_start();
    }

    pub fn drag_move(&self, delta_x: f64) -> Feedback {
        self.gesture().on_drag_move(delta_x)
    }

    /// Finish a drag. The gesture lock is released before any remote call,
    /// so the next card can be dragged while a like is still in flight.
    pub async fn drag_end(&self, final_delta_x: f64) -> FeedResult<SwipeResult> {
        let output = self.gesture().on_drag_end(final_delta_x);
        match output {
            None => Ok(SwipeResult::Ignored),
            Some(GestureOutput::SpringBack) => {
                self.events.emit(FeedEvent::SpringBack);
                Ok(SwipeResult::SpringBack)
            }
            Some(GestureOutput::Decision(decision)) => self.decide(decision).await,
        }
    }

    /// Like/nope button
    pub async fn press(&self, direction: Direction) -> FeedResult<SwipeResult> {
        let decision = self.gesture().trigger(direction);
        self.decide(decision).await
    }

    /// Apply a decision to the card on screen
    ///
    /// Takes `&self`, so several accepts may be awaited concurrently.
    pub async fn decide(&self, decision: Decision) -> FeedResult<SwipeResult> {
        let profile = self
            .queue
            .lock()
            .await
            .promote_if_needed()
            .cloned()
            .ok_or(FeedError::NoCurrentProfile)?;
        let profile_id = profile.id;

        match self.coordinator.apply(decision, profile).await? {
            None => Ok(SwipeResult::Rejected(profile_id)),
            Some(outcome) => {
                let new_match = self.record_outcome(&outcome).await;
                Ok(SwipeResult::Accepted { outcome, new_match })
            }
        }
    }

    /// Accept from the liked-me detail view
    ///
    /// The outcome goes back to the caller so the view can react before it closes.
    pub async fn accept_from_likes(&self, profile_id: ProfileId) -> FeedResult<(AcceptOutcome, Option<Match>)> {
        let outcome = self.coordinator.accept_from_list(profile_id).await?;
        let new_match = self.record_outcome(&outcome).await;
        Ok((outcome, new_match))
    }

    pub async fn dismiss_from_likes(&self, profile_id: ProfileId) -> FeedResult<()> {
        self.coordinator.reject_from_list(profile_id).await?;
        Ok(())
    }

    /// Page the liked-me list; returns how many new profiles were added
    pub async fn load_liked_me(&self, reset: bool) -> FeedResult<usize> {
        let offset = if reset { 0 } else { self.liked_me.lock().await.offset() };

        let page = self
            .api
            .fetch_liked_me(self.settings.feed.likes_page_size, offset)
            .await
            .map_err(|e| {
                tracing::warn!("Failed to load likes received: {}", e);
                e
            })?;

        let added = self.liked_me.lock().await.load_page(page, reset);
        tracing::debug!("Loaded {} profiles into likes list", added);
        Ok(added)
    }

    pub async fn refresh_stats(&self) -> FeedResult<StatsResponse> {
        let stats = self.api.fetch_stats().await?;
        self.likes_count.store(stats.likes_count, Ordering::SeqCst);
        Ok(stats)
    }

    pub async fn current(&self) -> Option<Profile> {
        self.queue.lock().await.current().cloned()
    }

    pub async fn queue_len(&self) -> usize {
        self.queue.lock().await.length()
    }

    pub async fn is_exhausted(&self) -> bool {
        self.queue.lock().await.is_exhausted()
    }

    pub fn queue(&self) -> SharedQueue {
        self.queue.clone()
    }

    pub async fn liked_me(&self) -> Vec<Profile> {
        self.liked_me.lock().await.profiles().to_vec()
    }

    /// Session matches, newest first
    pub async fn matches(&self) -> Vec<Match> {
        self.matches.lock().await.matches().cloned().collect()
    }

    pub async fn active_matches(&self) -> Vec<Match> {
        self.matches.lock().await.active_at(Utc::now())
    }

    pub fn likes_count(&self) -> u32 {
        self.likes_count.load(Ordering::SeqCst)
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gesture().state()
    }

    pub fn coordinator(&self) -> &ActionCoordinator {
        &self.coordinator
    }

    pub fn prefetcher(&self) -> &PrefetchScheduler {
        &self.prefetch
    }

    fn gesture(&self) -> MutexGuard<'_, GestureInterpreter> {
        self.gesture.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn record_outcome(&self, outcome: &AcceptOutcome) -> Option<Match> {
        if let Some(count) = outcome.likes_count {
            self.likes_count.store(count, Ordering::SeqCst);
        }

        let new_match = self.matches.lock().await.observe(outcome, Utc::now());
        if let Some(m) = &new_match {
            self.events.emit(FeedEvent::Celebrate(m.clone()));
        }
        new_match
    }
}
