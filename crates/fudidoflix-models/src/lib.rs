pub mod media;
pub mod media_id;
pub mod poster_entry;
pub mod episode_mark;
pub mod notification;
pub mod roulette;

pub use media::MediaKind;
pub use media_id::MediaId;
pub use poster_entry::{ContinueWatchingEntry, EntryDraft, MissingField, MyListEntry, PosterEntry, WatchedHistoryEntry};
pub use episode_mark::WatchedEpisodeMark;
pub use notification::{InboxNotification, NotificationKind, CONTINUE_WATCHING_ID, MY_LIST_REMINDER_ID};
pub use roulette::RouletteItem;
