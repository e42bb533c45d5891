// src/event.rs
use crate::announcement::Announcement;
use crate::feed::FeedEvent;

/// Everything that mutates the feed funnels through one channel into the UI
/// loop, so there is exactly one logical writer applying changes serially.
#[derive(Debug, Clone)]
pub enum FeedMessage {
    /// The initial snapshot arrived; replaces the feed wholesale.
    Snapshot(Vec<Announcement>),
    /// The snapshot request failed. The feed stays empty; the loading
    /// indicator still has to settle.
    SnapshotFailed,
    /// An incremental delta delivered over the push channel.
    Delta(FeedEvent),
}
