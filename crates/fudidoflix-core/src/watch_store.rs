use chrono::{DateTime, SecondsFormat, Utc};
use fudidoflix_config::StorageConfig;
use fudidoflix_models::{
    ContinueWatchingEntry, EntryDraft, InboxNotification, MediaId, MediaKind, MyListEntry,
    PosterEntry, RouletteItem, WatchedEpisodeMark, WatchedHistoryEntry,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::clock::{Clock, SystemClock};
use crate::store::{keys, read_list, remove_key, write_list, KeyValueStore};

/// Typed, fail-soft access to every persisted list.
///
/// Reads never fail: unreadable data comes back empty. Writes log their
/// failures and carry on. Read-modify-write is last-write-wins.
#[derive(Clone)]
pub struct WatchStore {
    backend: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    history_limit: usize,
    continue_watching_limit: usize,
}

impl WatchStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, config: &StorageConfig) -> Self {
        Self {
            backend,
            clock: Arc::new(SystemClock),
            history_limit: config.history_limit.max(1),
            continue_watching_limit: config.continue_watching_limit.max(1),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn validated(&self, list: &str, draft: &EntryDraft) -> Option<PosterEntry> {
        match draft.validate() {
            Ok(entry) => Some(entry),
            Err(missing) => {
                warn!(list, id = ?draft.id, missing = %missing, "Incomplete entry not saved");
                None
            }
        }
    }

    /// Move `entry` to the front of a bounded, deduplicated list.
    fn push_front_bounded(&self, key: &str, entry: PosterEntry, limit: usize) {
        let mut items: Vec<PosterEntry> = read_list(self.backend(), key);
        items.retain(|item| item.key() != entry.key());
        items.insert(0, entry);
        items.truncate(limit);
        write_list(self.backend(), key, &items);
    }

    fn remove_entry(&self, key: &str, id: MediaId, kind: MediaKind) {
        let mut items: Vec<PosterEntry> = read_list(self.backend(), key);
        let before = items.len();
        items.retain(|item| !item.matches(id, kind));
        if items.len() != before {
            write_list(self.backend(), key, &items);
        }
    }

    // Watched history

    pub fn watched_history(&self) -> Vec<WatchedHistoryEntry> {
        read_list(self.backend(), keys::WATCHED_HISTORY)
    }

    pub fn save_to_watched_history(&self, draft: &EntryDraft) -> bool {
        let Some(entry) = self.validated("watched_history", draft) else {
            return false;
        };
        self.push_front_bounded(keys::WATCHED_HISTORY, entry, self.history_limit);
        true
    }

    pub fn remove_from_watched_history(&self, id: MediaId, kind: MediaKind) {
        self.remove_entry(keys::WATCHED_HISTORY, id, kind);
    }

    /// Clears watched history and every watched mark.
    pub fn clear_all_history(&self) {
        remove_key(self.backend(), keys::WATCHED_HISTORY);
        remove_key(self.backend(), keys::WATCHED_EPISODES);
        info!("Watch history cleared");
    }

    // Continue watching

    pub fn continue_watching(&self) -> Vec<ContinueWatchingEntry> {
        read_list(self.backend(), keys::CONTINUE_WATCHING)
    }

    pub fn save_to_continue_watching(&self, draft: &EntryDraft) -> bool {
        let Some(entry) = self.validated("continue_watching", draft) else {
            return false;
        };
        self.push_front_bounded(keys::CONTINUE_WATCHING, entry, self.continue_watching_limit);
        true
    }

    pub fn remove_from_continue_watching(&self, id: MediaId, kind: MediaKind) {
        self.remove_entry(keys::CONTINUE_WATCHING, id, kind);
    }

    pub fn clear_continue_watching(&self) {
        remove_key(self.backend(), keys::CONTINUE_WATCHING);
    }

    // My list

    pub fn my_list(&self) -> Vec<MyListEntry> {
        read_list(self.backend(), keys::MY_LIST)
    }

    pub fn is_in_my_list(&self, id: MediaId, kind: MediaKind) -> bool {
        self.my_list().iter().any(|item| item.matches(id, kind))
    }

    /// Adds to the front; a title already in the list is left where it is.
    pub fn save_to_my_list(&self, draft: &EntryDraft) -> bool {
        let Some(entry) = self.validated("my_list", draft) else {
            return false;
        };
        let mut items = self.my_list();
        if items.iter().any(|item| item.key() == entry.key()) {
            debug!(id = entry.id, "Already in my list");
            return true;
        }
        items.insert(0, entry);
        write_list(self.backend(), keys::MY_LIST, &items);
        true
    }

    pub fn remove_from_my_list(&self, id: MediaId, kind: MediaKind) {
        self.remove_entry(keys::MY_LIST, id, kind);
    }

    /// Returns the membership after the toggle.
    pub fn toggle_my_list(&self, draft: &EntryDraft) -> bool {
        let (Some(id), Some(kind)) = (draft.id, draft.kind) else {
            warn!(id = ?draft.id, "Cannot toggle an entry without id and type");
            return false;
        };
        if self.is_in_my_list(id, kind) {
            self.remove_from_my_list(id, kind);
            false
        } else {
            self.save_to_my_list(draft)
        }
    }

    pub fn clear_my_list(&self) {
        remove_key(self.backend(), keys::MY_LIST);
    }

    // Watched marks

    pub fn watched_episodes(&self) -> Vec<WatchedEpisodeMark> {
        read_list(self.backend(), keys::WATCHED_EPISODES)
    }

    /// Record a watched movie or episode; re-marking moves the mark to the
    /// front with a fresh timestamp.
    pub fn save_watched_episode(
        &self,
        id: MediaId,
        kind: MediaKind,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> bool {
        if id == 0 {
            warn!("Watched mark without id not saved");
            return false;
        }
        if kind == MediaKind::Tv && (season.is_none() || episode.is_none()) {
            warn!(id, ?season, ?episode, "Episode mark needs season and episode");
            return false;
        }

        let mark = WatchedEpisodeMark::new(id, kind, season, episode, self.clock.now());
        let identifier = mark.identifier();
        let mut marks = self.watched_episodes();
        marks.retain(|existing| existing.identifier() != identifier);
        marks.insert(0, mark);
        write_list(self.backend(), keys::WATCHED_EPISODES, &marks);
        true
    }

    /// Movies match on id alone; episodes need season and episode.
    pub fn is_episode_watched(
        &self,
        id: MediaId,
        kind: MediaKind,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> bool {
        self.watched_episodes()
            .iter()
            .any(|mark| mark.matches(id, kind, season, episode))
    }

    // Inbox

    pub fn inbox(&self) -> Vec<InboxNotification> {
        read_list(self.backend(), keys::NOTIFICATIONS)
    }

    /// Adds to the front unless a notification with the same uniqueId exists.
    pub fn add_notification(&self, notification: InboxNotification) -> bool {
        let mut items = self.inbox();
        if items.iter().any(|n| n.unique_id() == notification.unique_id()) {
            return false;
        }
        items.insert(0, notification);
        write_list(self.backend(), keys::NOTIFICATIONS, &items);
        true
    }

    pub fn remove_notification(&self, unique_id: &str) -> bool {
        let mut items = self.inbox();
        let before = items.len();
        items.retain(|n| n.unique_id() != unique_id);
        if items.len() == before {
            return false;
        }
        write_list(self.backend(), keys::NOTIFICATIONS, &items);
        true
    }

    pub fn clear_inbox(&self) {
        remove_key(self.backend(), keys::NOTIFICATIONS);
    }

    pub fn replace_inbox(&self, items: &[InboxNotification]) {
        write_list(self.backend(), keys::NOTIFICATIONS, items);
    }

    // Last check

    pub fn last_check(&self) -> Option<DateTime<Utc>> {
        let raw = match self.backend.get(keys::LAST_CHECK) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read last check");
                return None;
            }
        };
        let trimmed = raw.trim().trim_matches('"');
        match DateTime::parse_from_rfc3339(trimmed) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                warn!(value = trimmed, error = %e, "Ignoring unreadable last check timestamp");
                None
            }
        }
    }

    pub fn set_last_check(&self, at: DateTime<Utc>) {
        let value = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        if let Err(e) = self.backend.set(keys::LAST_CHECK, &value) {
            warn!(error = %e, "Failed to write last check");
        }
    }

    // Roulette

    pub fn roulette_items(&self) -> Vec<RouletteItem> {
        read_list(self.backend(), keys::ROULETTE)
    }

    /// Appends unless an item with the same id is already on the wheel.
    pub fn add_roulette_item(&self, item: RouletteItem) -> bool {
        let mut items = self.roulette_items();
        if items.iter().any(|existing| existing.id == item.id) {
            return false;
        }
        items.push(item);
        self.save_roulette_items(&items);
        true
    }

    pub fn remove_roulette_item(&self, id: MediaId) -> bool {
        let mut items = self.roulette_items();
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return false;
        }
        self.save_roulette_items(&items);
        true
    }

    /// An empty wheel removes the key altogether.
    pub fn save_roulette_items(&self, items: &[RouletteItem]) {
        if items.is_empty() {
            remove_key(self.backend(), keys::ROULETTE);
        } else {
            write_list(self.backend(), keys::ROULETTE, items);
        }
    }
}
