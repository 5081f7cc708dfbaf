use crate::core::events::{EventSink, FeedEvent};
use crate::core::queue::SharedQueue;
use crate::services::{ApiError, DatingApi};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Why a refill request did not reach the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InFlight,
    BackingOff,
}

/// Result of one `request_more` call
#[derive(Debug)]
pub enum PrefetchOutcome {
    Skipped(SkipReason),
    Fetched { fetched: usize, added: usize },
    Exhausted,
    Failed(ApiError),
}

impl PrefetchOutcome {
    /// Whether this call actually hit the feed endpoint
    pub fn reached_service(&self) -> bool {
        !matches!(self, PrefetchOutcome::Skipped(_))
    }
}

/// Exponential backoff over consecutive fetch failures
///
/// A zero base disables it entirely.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    failures: u32,
    not_before: Option<Instant>,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            failures: 0,
            not_before: None,
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn ready(&self, now: Instant) -> bool {
        self.not_before.map_or(true, |t| now >= t)
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Register a failure and return the delay before the next attempt
    pub fn record_failure(&mut self, now: Instant) -> Duration {
        self.failures = self.failures.saturating_add(1);
        if self.base.is_zero() {
            return Duration::ZERO;
        }

        let exponent = (self.failures - 1).min(16);
        let delay = self.base.saturating_mul(1u32 << exponent).min(self.max);
        self.not_before = Some(now + delay);
        delay
    }

    pub fn record_success(&mut self) {
        self.failures = 0;
        self.not_before = None;
    }
}

/// Clears the in-flight flag on every exit path
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Decides when to pull more candidates into the queue
///
/// At most one feed request is in flight at a time; a trigger arriving while
/// one is outstanding is dropped, not queued.
#[derive(Clone)]
pub struct PrefetchScheduler {
    api: Arc<dyn DatingApi>,
    queue: SharedQueue,
    events: EventSink,
    page_size: u32,
    in_flight: Arc<AtomicBool>,
    backoff: Arc<Mutex<Backoff>>,
}

impl PrefetchScheduler {
    pub fn new(
        api: Arc<dyn DatingApi>,
        queue: SharedQueue,
        events: EventSink,
        page_size: u32,
        backoff: Backoff,
    ) -> Self {
        Self {
            api,
            queue,
            events,
            page_size,
            in_flight: Arc::new(AtomicBool::new(false)),
            backoff: Arc::new(Mutex::new(backoff)),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Fetch the next page; `reset` restarts pagination from offset 0
    pub async fn request_more(&self, reset: bool) -> PrefetchOutcome {
        let Some(_guard) = InFlightGuard::claim(&self.in_flight) else {
            tracing::debug!("Prefetch already in flight, skipping");
            return PrefetchOutcome::Skipped(SkipReason::InFlight);
        };

        if !self.backoff.lock().await.ready(Instant::now()) {
            tracing::debug!("Prefetch backing off after failures");
            return PrefetchOutcome::Skipped(SkipReason::BackingOff);
        }

        let offset = if reset { 0 } else { self.queue.lock().await.cursor() };

        tracing::debug!("Requesting feed page: limit={}, offset={}, reset={}", self.page_size, offset, reset);

        match self.api.fetch_feed(self.page_size, offset).await {
            Ok(batch) => {
                self.backoff.lock().await.record_success();

                let mut queue = self.queue.lock().await;
                if reset {
                    queue.reset();
                }

                if batch.is_empty() {
                    queue.mark_exhausted();
                    drop(queue);
                    tracing::info!("Candidate feed exhausted at offset {}", offset);
                    self.events.emit(FeedEvent::Exhausted);
                    return PrefetchOutcome::Exhausted;
                }

                let fetched = batch.len();
                let added = queue.append(batch);
                queue.advance_cursor(fetched);
                queue.promote_if_needed();

                tracing::debug!(
                    "Queued {} of {} fetched profiles (queue length: {}, cursor: {})",
                    added,
                    fetched,
                    queue.length(),
                    queue.cursor()
                );

                PrefetchOutcome::Fetched { fetched, added }
            }
            Err(e) => {
                let delay = self.backoff.lock().await.record_failure(Instant::now());
                tracing::warn!("Failed to fetch candidates (retry after {:?}): {}", delay, e);
                PrefetchOutcome::Failed(e)
            }
        }
    }
}
