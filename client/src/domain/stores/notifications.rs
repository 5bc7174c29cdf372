//! Notification inbox.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, PaginatedListCache};

/// Origin of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Announcement from the operator.
    Notice,
    /// Account or order event.
    System,
}

/// One inbox entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Server identifier.
    pub id: u64,
    /// Origin.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Headline.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub content: String,
    /// Whether the user has opened it.
    #[serde(default)]
    pub is_read: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Inbox tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationFilter {
    /// Every notification.
    #[default]
    All,
    /// Operator notices only.
    Notice,
    /// System events only.
    System,
}

/// Paged notification inbox.
pub type NotificationStore = PaginatedListCache<Notification, NotificationFilter>;

impl NotificationStore {
    /// Unread entries among the loaded pages.
    pub fn unread_count(&self) -> Result<usize, Error> {
        let snapshot = self.snapshot()?;
        Ok(snapshot
            .collection
            .items()
            .iter()
            .filter(|notification| !notification.is_read)
            .count())
    }
}
