/// Data structures for YouTube Pinner
use serde::{Deserialize, Serialize};

const THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";
const WATCH_BASE: &str = "https://www.youtube.com/watch?v=";

/// A video the user pinned to the homepage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PinnedItem {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
}

impl PinnedItem {
    pub fn new(id: String, title: String, thumbnail: String) -> PinnedItem {
        PinnedItem { id, title, thumbnail }
    }

    /// Build an item whose thumbnail is derived from the video id
    pub fn from_video(id: &str, title: &str) -> PinnedItem {
        PinnedItem {
            id: id.to_string(),
            title: title.to_string(),
            thumbnail: thumbnail_url(id),
        }
    }

    pub fn watch_url(&self) -> String {
        watch_url(&self.id)
    }
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("{}/{}/hqdefault.jpg", THUMBNAIL_BASE, video_id)
}

pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_BASE, video_id)
}
