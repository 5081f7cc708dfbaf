// Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use campus_match::models::{DislikeResponse, LikeResponse, Profile, ProfileId, StatsResponse};
use campus_match::services::{ApiError, DatingApi};
use campus_match::{FeedEvent, FeedSession, Settings};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Semaphore;

pub fn profile(id: i64) -> Profile {
    let mut p = Profile::new(id, format!("User {}", id));
    p.age = Some(20);
    p.university = Some("MSU".to_string());
    p.interests = vec!["it".to_string(), "coffee".to_string()];
    p
}

pub fn page(ids: &[i64]) -> Vec<Profile> {
    ids.iter().map(|id| profile(*id)).collect()
}

pub fn like(is_match: bool) -> LikeResponse {
    LikeResponse {
        success: true,
        is_match,
        match_id: if is_match { Some(77) } else { None },
        matched_profile: None,
        likes_count: None,
        already_liked: false,
        error: None,
    }
}

/// In-memory dating service with scripted responses
///
/// Feed pages are served in order; once the script runs out every call
/// returns an empty page. With a gate installed, each feed call waits for a
/// permit before answering; the like gate does the same for like calls.
#[derive(Default)]
pub struct ScriptedApi {
    feed: Mutex<VecDeque<Result<Vec<Profile>, String>>>,
    feed_calls: Mutex<Vec<(u32, u32)>>,
    feed_gate: Option<Arc<Semaphore>>,
    likes: Mutex<HashMap<ProfileId, Result<LikeResponse, String>>>,
    like_gate: Option<Arc<Semaphore>>,
    accept_calls: Mutex<Vec<ProfileId>>,
    reject_calls: Mutex<Vec<ProfileId>>,
    reject_fails: bool,
    liked_me: Mutex<Vec<Profile>>,
    stats: StatsResponse,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, ids: &[i64]) -> Self {
        self.feed.lock().unwrap().push_back(Ok(page(ids)));
        self
    }

    pub fn with_feed_error(self, message: &str) -> Self {
        self.feed.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.feed_gate = Some(gate);
        self
    }

    pub fn with_like_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.like_gate = Some(gate);
        self
    }

    pub fn with_like(self, id: i64, response: LikeResponse) -> Self {
        self.likes.lock().unwrap().insert(ProfileId(id), Ok(response));
        self
    }

    pub fn with_like_error(self, id: i64, message: &str) -> Self {
        self.likes.lock().unwrap().insert(ProfileId(id), Err(message.to_string()));
        self
    }

    pub fn with_failing_rejects(mut self) -> Self {
        self.reject_fails = true;
        self
    }

    pub fn with_liked_me(self, ids: &[i64]) -> Self {
        *self.liked_me.lock().unwrap() = page(ids);
        self
    }

    pub fn with_stats(mut self, likes_count: u32) -> Self {
        self.stats = StatsResponse { likes_count, matches_count: 0 };
        self
    }

    pub fn feed_calls(&self) -> Vec<(u32, u32)> {
        self.feed_calls.lock().unwrap().clone()
    }

    pub fn accept_calls(&self) -> Vec<ProfileId> {
        self.accept_calls.lock().unwrap().clone()
    }

    pub fn reject_calls(&self) -> Vec<ProfileId> {
        self.reject_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DatingApi for ScriptedApi {
    async fn fetch_feed(&self, limit: u32, offset: u32) -> Result<Vec<Profile>, ApiError> {
        self.feed_calls.lock().unwrap().push((limit, offset));

        if let Some(gate) = &self.feed_gate {
            gate.acquire().await.unwrap().forget();
        }

        let next = self.feed.lock().unwrap().pop_front();
        match next {
            Some(Ok(profiles)) => Ok(profiles),
            Some(Err(message)) => Err(ApiError::InvalidResponse(message)),
            None => Ok(vec![]),
        }
    }

    async fn decide_accept(&self, profile_id: ProfileId) -> Result<LikeResponse, ApiError> {
        self.accept_calls.lock().unwrap().push(profile_id);

        if let Some(gate) = &self.like_gate {
            gate.acquire().await.unwrap().forget();
        }

        match self.likes.lock().unwrap().get(&profile_id) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(ApiError::InvalidResponse(message.clone())),
            None => Ok(like(false)),
        }
    }

    async fn decide_reject(&self, profile_id: ProfileId) -> Result<DislikeResponse, ApiError> {
        self.reject_calls.lock().unwrap().push(profile_id);
        if self.reject_fails {
            return Err(ApiError::InvalidResponse("dislike endpoint down".to_string()));
        }
        Ok(DislikeResponse { success: true, updated: false })
    }

    async fn fetch_liked_me(&self, limit: u32, offset: u32) -> Result<Vec<Profile>, ApiError> {
        let all = self.liked_me.lock().unwrap().clone();
        Ok(all.into_iter().skip(offset as usize).take(limit as usize).collect())
    }

    async fn fetch_stats(&self) -> Result<StatsResponse, ApiError> {
        Ok(self.stats.clone())
    }
}

pub fn session(api: Arc<ScriptedApi>) -> (FeedSession, UnboundedReceiver<FeedEvent>) {
    session_with(api, Settings::default())
}

pub fn session_with(api: Arc<ScriptedApi>, settings: Settings) -> (FeedSession, UnboundedReceiver<FeedEvent>) {
    FeedSession::new(api, settings)
}

/// Everything currently waiting on the event channel
pub fn drain(rx: &mut UnboundedReceiver<FeedEvent>) -> Vec<FeedEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Wait until this many like calls have reached the service
pub async fn wait_for_accepts(api: &ScriptedApi, count: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while api.accept_calls().len() < count {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("like calls did not arrive");
}

/// Wait until the background dislike calls have reached the service
pub async fn wait_for_rejects(api: &ScriptedApi, count: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while api.reject_calls().len() < count {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("dislike calls did not arrive");
}
