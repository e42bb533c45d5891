// src/feed.rs
use crate::announcement::{Announcement, AnnouncementId};
use log::debug;

/// A delta delivered over the push channel after the initial snapshot.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A newly published announcement; becomes the newest feed entry.
    New(Announcement),
    /// An announcement was archived server-side and must leave the feed.
    Archive(AnnouncementId),
}

/// The in-memory announcement list: ordered newest-first, never two entries
/// with the same id. Populated once by the snapshot fetch and mutated only by
/// applying [`FeedEvent`]s, in arrival order.
#[derive(Debug, Clone)]
pub struct AnnouncementFeed {
    items: Vec<Announcement>,
    loading: bool,
}

impl Default for AnnouncementFeed {
    fn default() -> Self {
        AnnouncementFeed::new()
    }
}

impl AnnouncementFeed {
    pub fn new() -> Self {
        Self { items: Vec::new(), loading: true }
    }

    pub fn items(&self) -> &[Announcement] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True until the snapshot request settles, success or failure.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn contains(&self, id: AnnouncementId) -> bool {
        self.items.iter().any(|a| a.id() == id)
    }

    /// Installs the snapshot verbatim, preserving server order.
    pub fn replace_all(&mut self, items: Vec<Announcement>) {
        self.items = items;
    }

    /// Clears the loading flag. Called unconditionally once the snapshot
    /// request settles, whether or not it succeeded.
    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    /// Applies one delta. Returns whether the feed actually changed, so the
    /// caller can decide whether its selection needs adjusting.
    ///
    /// Inserting an id already present is a no-op, as is removing an absent
    /// one, so replayed events cannot corrupt the list.
    pub fn apply(&mut self, event: FeedEvent) -> bool {
        match event {
            FeedEvent::New(announcement) => {
                if self.contains(announcement.id()) {
                    debug!("ignoring duplicate announcement {}", announcement.id());
                    return false;
                }
                self.items.insert(0, announcement);
                true
            }
            FeedEvent::Archive(id) => {
                let before = self.items.len();
                self.items.retain(|a| a.id() != id);
                if self.items.len() == before {
                    debug!("archive for unknown announcement {}", id);
                    return false;
                }
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann(id: i64, title: &str) -> Announcement {
        Announcement::new(AnnouncementId::new(id), title.to_string(), format!("body of {title}"), None)
    }

    fn ids(feed: &AnnouncementFeed) -> Vec<i64> {
        feed.items().iter().map(|a| a.id().value()).collect()
    }

    #[test]
    fn snapshot_preserves_server_order() {
        let mut feed = AnnouncementFeed::new();
        assert!(feed.is_loading());
        feed.replace_all(vec![ann(5, "e"), ann(1, "a"), ann(9, "i")]);
        feed.finish_loading();
        assert_eq!(ids(&feed), vec![5, 1, 9]);
        assert!(!feed.is_loading());
    }

    #[test]
    fn failed_snapshot_leaves_feed_empty_but_settled() {
        let mut feed = AnnouncementFeed::new();
        feed.finish_loading();
        assert!(feed.is_empty());
        assert!(!feed.is_loading());
    }

    #[test]
    fn new_event_prepends() {
        let mut feed = AnnouncementFeed::new();
        feed.replace_all(vec![ann(1, "a"), ann(2, "b")]);
        assert!(feed.apply(FeedEvent::New(ann(3, "c"))));
        assert_eq!(ids(&feed), vec![3, 1, 2]);
    }

    #[test]
    fn archive_event_removes_by_id() {
        let mut feed = AnnouncementFeed::new();
        feed.replace_all(vec![ann(3, "c"), ann(1, "a"), ann(2, "b")]);
        assert!(feed.apply(FeedEvent::Archive(AnnouncementId::new(1))));
        assert_eq!(ids(&feed), vec![3, 2]);
    }

    #[test]
    fn duplicate_insert_is_a_noop() {
        let mut feed = AnnouncementFeed::new();
        assert!(feed.apply(FeedEvent::New(ann(3, "c"))));
        assert!(!feed.apply(FeedEvent::New(ann(3, "c"))));
        assert_eq!(ids(&feed), vec![3]);
    }

    #[test]
    fn insert_of_present_id_keeps_length_and_order() {
        let mut feed = AnnouncementFeed::new();
        feed.replace_all(vec![ann(1, "a"), ann(2, "b")]);
        assert!(!feed.apply(FeedEvent::New(ann(2, "b again"))));
        assert_eq!(ids(&feed), vec![1, 2]);
        assert_eq!(feed.items()[1].title(), "b");
    }

    #[test]
    fn archive_of_absent_id_is_a_noop() {
        let mut feed = AnnouncementFeed::new();
        feed.replace_all(vec![ann(1, "a")]);
        assert!(!feed.apply(FeedEvent::Archive(AnnouncementId::new(42))));
        assert_eq!(ids(&feed), vec![1]);
    }

    #[test]
    fn no_event_sequence_produces_duplicate_ids() {
        let mut feed = AnnouncementFeed::new();
        feed.replace_all(vec![ann(1, "a"), ann(2, "b")]);
        let events = vec![
            FeedEvent::New(ann(3, "c")),
            FeedEvent::New(ann(2, "b dup")),
            FeedEvent::Archive(AnnouncementId::new(1)),
            FeedEvent::New(ann(1, "a back")),
            FeedEvent::New(ann(3, "c dup")),
            FeedEvent::Archive(AnnouncementId::new(99)),
        ];
        for event in events {
            feed.apply(event);
            let mut seen = std::collections::HashSet::new();
            assert!(feed.items().iter().all(|a| seen.insert(a.id())));
        }
        assert_eq!(ids(&feed), vec![1, 3, 2]);
    }
}
