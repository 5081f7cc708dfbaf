use crate::models::{Profile, ProfileId};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Queue shared between the session, the prefetcher and in-flight actions
pub type SharedQueue = Arc<Mutex<ProfileQueue>>;

/// Ordered buffer of upcoming candidates plus the card currently on screen
///
/// No id ever appears twice across `current` and `buffer`.
#[derive(Debug, Default, Clone)]
pub struct ProfileQueue {
    current: Option<Profile>,
    buffer: VecDeque<Profile>,
    exhausted: bool,
    cursor: u32,
}

impl ProfileQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedQueue {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Drop everything and rewind pagination
    pub fn reset(&mut self) {
        self.current = None;
        self.buffer.clear();
        self.cursor = 0;
        self.exhausted = false;
    }

    /// Append a fetched batch, skipping ids already queued
    ///
    /// An empty batch marks the feed exhausted. Returns the number of
    /// profiles actually added.
    pub fn append(&mut self, batch: Vec<Profile>) -> usize {
        if batch.is_empty() {
            self.exhausted = true;
            return 0;
        }

        let mut added = 0;
        for profile in batch {
            if self.contains(profile.id) {
                tracing::debug!("Skipping duplicate profile {}", profile.id);
                continue;
            }
            self.buffer.push_back(profile);
            added += 1;
        }
        added
    }

    /// Move the buffer head into `current` when no card is showing
    pub fn promote_if_needed(&mut self) -> Option<&Profile> {
        if self.current.is_none() {
            if let Some(next) = self.buffer.pop_front() {
                self.current = Some(next);
            }
        }
        self.current.as_ref()
    }

    /// Remove a profile wherever it is. Absent ids are a no-op.
    pub fn remove(&mut self, id: ProfileId) -> Option<Profile> {
        if self.current.as_ref().is_some_and(|p| p.id == id) {
            let removed = self.current.take();
            self.promote_if_needed();
            return removed;
        }

        let index = self.buffer.iter().position(|p| p.id == id)?;
        self.buffer.remove(index)
    }

    /// Put a profile back on screen, pushing the current card to the buffer head
    pub fn restore(&mut self, profile: Profile) -> bool {
        if self.contains(profile.id) {
            return false;
        }
        if let Some(previous) = self.current.replace(profile) {
            self.buffer.push_front(previous);
        }
        true
    }

    /// Current card (0 or 1) plus buffered profiles
    pub fn length(&self) -> usize {
        usize::from(self.current.is_some()) + self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    pub fn contains(&self, id: ProfileId) -> bool {
        self.current.as_ref().is_some_and(|p| p.id == id) || self.buffer.iter().any(|p| p.id == id)
    }

    pub fn current(&self) -> Option<&Profile> {
        self.current.as_ref()
    }

    pub fn buffer(&self) -> impl Iterator<Item = &Profile> {
        self.buffer.iter()
    }

    pub fn buffer_ids(&self) -> Vec<ProfileId> {
        self.buffer.iter().map(|p| p.id).collect()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn mark_exhausted(&mut self) {
        self.exhausted = true;
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Cursor only moves forward
    pub fn advance_cursor(&mut self, by: usize) {
        let by = u32::try_from(by).unwrap_or(u32::MAX);
        self.cursor = self.cursor.saturating_add(by);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiles(ids: &[i64]) -> Vec<Profile> {
        ids.iter().map(|id| Profile::new(*id, format!("User {}", id))).collect()
    }

    fn queue_with(ids: &[i64]) -> ProfileQueue {
        let mut queue = ProfileQueue::new();
        queue.append(profiles(ids));
        queue.promote_if_needed();
        queue
    }

    #[test]
    fn test_append_filters_duplicates() {
        let mut queue = queue_with(&[1, 2, 3]);

        let added = queue.append(profiles(&[3, 4, 1, 4]));

        assert_eq!(added, 1);
        assert_eq!(queue.current().map(|p| p.id), Some(ProfileId(1)));
        assert_eq!(queue.buffer_ids(), vec![ProfileId(2), ProfileId(3), ProfileId(4)]);
        assert_eq!(queue.length(), 4);
    }

    #[test]
    fn test_empty_batch_marks_exhausted() {
        let mut queue = queue_with(&[1]);
        assert!(!queue.is_exhausted());

        queue.append(vec![]);

        assert!(queue.is_exhausted());
        assert_eq!(queue.length(), 1);
    }

    #[test]
    fn test_remove_current_promotes_next() {
        let mut queue = queue_with(&[1, 2, 3]);

        let removed = queue.remove(ProfileId(1));

        assert_eq!(removed.map(|p| p.id), Some(ProfileId(1)));
        assert_eq!(queue.current().map(|p| p.id), Some(ProfileId(2)));
        assert_eq!(queue.buffer_ids(), vec![ProfileId(3)]);
    }

    #[test]
    fn test_remove_from_buffer() {
        let mut queue = queue_with(&[1, 2, 3]);

        queue.remove(ProfileId(2));

        assert_eq!(queue.current().map(|p| p.id), Some(ProfileId(1)));
        assert_eq!(queue.buffer_ids(), vec![ProfileId(3)]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut queue = queue_with(&[1, 2]);

        assert!(queue.remove(ProfileId(9)).is_none());
        assert!(queue.remove(ProfileId(9)).is_none());

        assert_eq!(queue.current().map(|p| p.id), Some(ProfileId(1)));
        assert_eq!(queue.buffer_ids(), vec![ProfileId(2)]);
    }

    #[test]
    fn test_remove_last_card_leaves_queue_empty() {
        let mut queue = queue_with(&[1]);
        queue.remove(ProfileId(1));

        assert!(queue.current().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_reset_clears_state() {
        let mut queue = queue_with(&[1, 2]);
        queue.advance_cursor(2);
        queue.mark_exhausted();

        queue.reset();

        assert!(queue.is_empty());
        assert_eq!(queue.cursor(), 0);
        assert!(!queue.is_exhausted());
    }

    #[test]
    fn test_restore_puts_profile_back_on_top() {
        let mut queue = queue_with(&[1, 2, 3]);
        let removed = queue.remove(ProfileId(1)).unwrap();

        assert!(queue.restore(removed));
        assert!(!queue.restore(Profile::new(2, "dup")));

        assert_eq!(queue.current().map(|p| p.id), Some(ProfileId(1)));
        assert_eq!(queue.buffer_ids(), vec![ProfileId(2), ProfileId(3)]);
    }

    #[test]
    fn test_no_duplicates_across_mixed_operations() {
        let mut queue = ProfileQueue::new();
        let batches: [&[i64]; 4] = [&[1, 2, 3], &[2, 3, 4, 5], &[5, 6, 1], &[7, 7, 7]];

        for (round, batch) in batches.iter().enumerate() {
            queue.append(profiles(batch));
            queue.promote_if_needed();
            if round % 2 == 1 {
                let current = queue.current().map(|p| p.id).unwrap();
                queue.remove(current);
            }

            let mut ids: Vec<ProfileId> = queue.current().map(|p| p.id).into_iter().collect();
            ids.extend(queue.buffer_ids());
            let total = ids.len();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), total, "duplicate id after round {}", round);
        }
    }
}
