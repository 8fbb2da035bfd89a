use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use crate::media_id::MediaId;
use crate::poster_entry::PosterEntry;

/// Fixed slot id of the single "continue watching" reminder.
pub const CONTINUE_WATCHING_ID: &str = "continue_watching";
/// Fixed slot id of the single "my list" reminder.
pub const MY_LIST_REMINDER_ID: &str = "my_list_reminder";

/// An entry of the bell-icon inbox.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboxNotification {
    /// A followed series aired an episode since the previous check.
    NewEp {
        #[serde(rename = "uniqueId")]
        unique_id: String,
        #[serde(deserialize_with = "crate::media_id::lenient")]
        series_id: MediaId,
        series_name: String,
        poster_path: Option<String>,
        season: u32,
        episode: u32,
        episode_name: Option<String>,
        air_date: NaiveDate,
        created_at: DateTime<Utc>,
    },
    /// Nudge to resume the most recent in-progress series.
    ContinueWatching {
        #[serde(rename = "uniqueId")]
        unique_id: String,
        item: PosterEntry,
        created_at: DateTime<Utc>,
    },
    /// Nudge towards a random title of "my list".
    MyListReminder {
        #[serde(rename = "uniqueId")]
        unique_id: String,
        item: PosterEntry,
        created_at: DateTime<Utc>,
    },
}

/// Notification category, ordered by display priority (highest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NotificationKind {
    NewEp,
    ContinueWatching,
    MyListReminder,
}

impl InboxNotification {
    #[allow(clippy::too_many_arguments)]
    pub fn new_episode(
        series_id: MediaId,
        series_name: impl Into<String>,
        poster_path: Option<String>,
        season: u32,
        episode: u32,
        episode_name: Option<String>,
        air_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        InboxNotification::NewEp {
            unique_id: format!("new_ep-{}-S{}-E{}", series_id, season, episode),
            series_id,
            series_name: series_name.into(),
            poster_path,
            season,
            episode,
            episode_name,
            air_date,
            created_at,
        }
    }

    pub fn continue_watching(item: PosterEntry, created_at: DateTime<Utc>) -> Self {
        InboxNotification::ContinueWatching {
            unique_id: CONTINUE_WATCHING_ID.to_string(),
            item,
            created_at,
        }
    }

    pub fn my_list_reminder(item: PosterEntry, created_at: DateTime<Utc>) -> Self {
        InboxNotification::MyListReminder {
            unique_id: MY_LIST_REMINDER_ID.to_string(),
            item,
            created_at,
        }
    }

    pub fn unique_id(&self) -> &str {
        match self {
            InboxNotification::NewEp { unique_id, .. }
            | InboxNotification::ContinueWatching { unique_id, .. }
            | InboxNotification::MyListReminder { unique_id, .. } => unique_id,
        }
    }

    pub fn kind(&self) -> NotificationKind {
        match self {
            InboxNotification::NewEp { .. } => NotificationKind::NewEp,
            InboxNotification::ContinueWatching { .. } => NotificationKind::ContinueWatching,
            InboxNotification::MyListReminder { .. } => NotificationKind::MyListReminder,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            InboxNotification::NewEp { created_at, .. }
            | InboxNotification::ContinueWatching { created_at, .. }
            | InboxNotification::MyListReminder { created_at, .. } => *created_at,
        }
    }

    /// One-line text for the inbox list.
    pub fn headline(&self) -> String {
        match self {
            InboxNotification::NewEp { series_name, season, episode, episode_name, .. } => {
                match episode_name {
                    Some(name) if !name.is_empty() => {
                        format!("Novo episódio de {}: T{}E{} - {}", series_name, season, episode, name)
                    }
                    _ => format!("Novo episódio de {}: T{}E{}", series_name, season, episode),
                }
            }
            InboxNotification::ContinueWatching { item, .. } => {
                format!("Continue assistindo {}", item.title)
            }
            InboxNotification::MyListReminder { item, .. } => {
                format!("Que tal assistir {}? Está na sua lista", item.title)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;

    fn entry() -> PosterEntry {
        PosterEntry {
            id: 1,
            kind: MediaKind::Tv,
            title: "Dark".to_string(),
            poster_path: "/dark.jpg".to_string(),
        }
    }

    #[test]
    fn test_new_episode_unique_id() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let n = InboxNotification::new_episode(99, "Severance", None, 2, 5, None, date, Utc::now());
        assert_eq!(n.unique_id(), "new_ep-99-S2-E5");
        assert_eq!(n.kind(), NotificationKind::NewEp);
    }

    #[test]
    fn test_reminders_use_fixed_slots() {
        let a = InboxNotification::continue_watching(entry(), Utc::now());
        let b = InboxNotification::my_list_reminder(entry(), Utc::now());
        assert_eq!(a.unique_id(), CONTINUE_WATCHING_ID);
        assert_eq!(b.unique_id(), MY_LIST_REMINDER_ID);
    }

    #[test]
    fn test_priority_order() {
        assert!(NotificationKind::NewEp < NotificationKind::ContinueWatching);
        assert!(NotificationKind::ContinueWatching < NotificationKind::MyListReminder);
    }

    #[test]
    fn test_tagged_serialization() {
        let n = InboxNotification::continue_watching(entry(), Utc::now());
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "continue_watching");
        assert_eq!(json["uniqueId"], "continue_watching");
        let back: InboxNotification = serde_json::from_value(json).unwrap();
        assert_eq!(back, n);
    }
}
