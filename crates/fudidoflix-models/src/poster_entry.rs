use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::media::MediaKind;
use crate::media_id::MediaId;

/// Everything needed to render a poster tile: the shape shared by watch
/// history, continue watching and "my list".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PosterEntry {
    #[serde(deserialize_with = "crate::media_id::lenient")]
    pub id: MediaId,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(alias = "name")]
    pub title: String,
    pub poster_path: String,
}

pub type WatchedHistoryEntry = PosterEntry;
pub type ContinueWatchingEntry = PosterEntry;
pub type MyListEntry = PosterEntry;

impl PosterEntry {
    /// Natural key used for deduplication.
    pub fn key(&self) -> (MediaId, MediaKind) {
        (self.id, self.kind)
    }

    pub fn matches(&self, id: MediaId, kind: MediaKind) -> bool {
        self.id == id && self.kind == kind
    }
}

/// Field missing from a candidate entry at the write boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MissingField {
    #[error("id")]
    Id,
    #[error("type")]
    Kind,
    #[error("title or name")]
    Title,
    #[error("poster_path")]
    PosterPath,
}

/// Unvalidated entry as assembled from API payloads or CLI input.
///
/// Only [`EntryDraft::validate`] turns it into a [`PosterEntry`], so an entry
/// without a poster can never reach storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub id: Option<MediaId>,
    pub kind: Option<MediaKind>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub poster_path: Option<String>,
}

impl EntryDraft {
    pub fn new(id: MediaId, kind: MediaKind) -> Self {
        Self {
            id: Some(id),
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_poster(mut self, poster_path: impl Into<String>) -> Self {
        self.poster_path = Some(poster_path.into());
        self
    }

    pub fn validate(&self) -> Result<PosterEntry, MissingField> {
        let id = self.id.filter(|id| *id != 0).ok_or(MissingField::Id)?;
        let kind = self.kind.ok_or(MissingField::Kind)?;
        let title = non_empty(&self.title)
            .or_else(|| non_empty(&self.name))
            .ok_or(MissingField::Title)?;
        let poster_path = non_empty(&self.poster_path).ok_or(MissingField::PosterPath)?;

        Ok(PosterEntry {
            id,
            kind,
            title: title.to_string(),
            poster_path: poster_path.to_string(),
        })
    }
}

impl From<&PosterEntry> for EntryDraft {
    fn from(entry: &PosterEntry) -> Self {
        Self {
            id: Some(entry.id),
            kind: Some(entry.kind),
            title: Some(entry.title.clone()),
            name: None,
            poster_path: Some(entry.poster_path.clone()),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
