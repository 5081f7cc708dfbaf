use crate::models::{Profile, ProfileId};
use std::sync::Arc;
use tokio::sync::Mutex;

pub type SharedLikedMe = Arc<Mutex<LikedMeList>>;

/// Separately paginated list of people who liked the current user
#[derive(Debug, Default, Clone)]
pub struct LikedMeList {
    profiles: Vec<Profile>,
    offset: u32,
    exhausted: bool,
}

impl LikedMeList {
    pub fn shared() -> SharedLikedMe {
        Arc::new(Mutex::new(Self::default()))
    }

    /// Add a fetched page; `reset` replaces the list
    pub fn load_page(&mut self, page: Vec<Profile>, reset: bool) -> usize {
        if reset {
            self.profiles.clear();
            self.offset = 0;
            self.exhausted = false;
        }

        let fetched = page.len();
        if fetched == 0 {
            self.exhausted = true;
            return 0;
        }

        self.offset = self.offset.saturating_add(u32::try_from(fetched).unwrap_or(u32::MAX));
        let before = self.profiles.len();
        for profile in page {
            if !self.profiles.iter().any(|p| p.id == profile.id) {
                self.profiles.push(profile);
            }
        }
        self.profiles.len() - before
    }

    pub fn find(&self, id: ProfileId) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn remove(&mut self, id: ProfileId) -> Option<Profile> {
        let index = self.profiles.iter().position(|p| p.id == id)?;
        Some(self.profiles.remove(index))
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
