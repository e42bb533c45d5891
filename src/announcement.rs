// src/announcement.rs
use serde::{Deserialize, Serialize};
use std::fmt;

// === ANNOUNCEMENT STRUCTURES ===

/// Server-issued numeric identifier; unique and stable per announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnouncementId(i64);

impl fmt::Display for AnnouncementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AnnouncementId {
    pub fn new(value: i64) -> Self {
        AnnouncementId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// A notice published by the property management backend. Field names match
/// the wire format of `GET /api/announcements` and the push channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    id: AnnouncementId,
    title: String,
    description: String,
    #[serde(default)]
    file_url: Option<String>,
}

impl Announcement {
    pub fn new(
        id: AnnouncementId,
        title: String,
        description: String,
        file_url: Option<String>,
    ) -> Self {
        Self { id, title, description, file_url }
    }

    // Accessor methods

    pub fn id(&self) -> AnnouncementId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn file_url(&self) -> Option<&str> {
        self.file_url.as_deref()
    }
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Id          : {}", self.id)?;
        writeln!(f, "Title       : {}", self.title)?;
        writeln!(f, "Description : {}", self.description)?;
        if let Some(file) = &self.file_url {
            writeln!(f, "Attachment  : {}", file)?;
        }
        Ok(())
    }
}
