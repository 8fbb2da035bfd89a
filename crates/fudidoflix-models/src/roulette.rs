use serde::{Deserialize, Serialize};
use crate::media::MediaKind;
use crate::media_id::MediaId;

/// A candidate on the Sorte roulette wheel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouletteItem {
    #[serde(deserialize_with = "crate::media_id::lenient")]
    pub id: MediaId,
    pub title: String,
    pub poster_path: String,
    pub media_type: MediaKind,
}

impl RouletteItem {
    /// Title shortened to fit a wheel segment label.
    pub fn wheel_label(&self) -> String {
        if self.title.chars().count() > 18 {
            let head: String = self.title.chars().take(15).collect();
            format!("{}...", head)
        } else {
            self.title.clone()
        }
    }
}
