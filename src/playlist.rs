use crate::ffmpeg::MediaInfo;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A loaded media file plus its probed metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    pub path: PathBuf,
    pub info: MediaInfo,
}

impl MediaItem {
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn duration_ms(&self) -> u64 {
        (self.info.duration * 1000.0).round() as u64
    }
}

/// Ordered collection of loaded media with next/previous navigation.
/// Navigation saturates at both ends rather than wrapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Playlist {
    items: Vec<MediaItem>,
    current: Option<usize>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a media item. The current selection is unchanged; callers
    /// advance with `next` to reach the new item.
    pub fn add_media(&mut self, item: MediaItem) {
        self.items.push(item);
    }

    pub fn media_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_item(&self) -> Option<&MediaItem> {
        self.current.and_then(|i| self.items.get(i))
    }

    /// Advance to the next item. Returns whether the selection moved.
    pub fn next(&mut self) -> bool {
        match self.current {
            None if !self.items.is_empty() => {
                self.current = Some(0);
                true
            }
            Some(i) if i + 1 < self.items.len() => {
                self.current = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    /// Step back to the prior item. Returns whether the selection moved.
    pub fn previous(&mut self) -> bool {
        match self.current {
            Some(i) if i > 0 => {
                self.current = Some(i - 1);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> MediaItem {
        MediaItem {
            path: PathBuf::from(name),
            info: MediaInfo::default(),
        }
    }

    #[test]
    fn navigation_saturates_at_both_ends() {
        let mut playlist = Playlist::new();
        assert!(!playlist.next());
        assert!(!playlist.previous());

        playlist.add_media(item("a.mp4"));
        playlist.add_media(item("b.mp4"));

        assert!(playlist.next());
        assert_eq!(playlist.current_index(), Some(0));
        assert!(playlist.next());
        assert_eq!(playlist.current_index(), Some(1));
        assert!(!playlist.next());
        assert_eq!(playlist.current_index(), Some(1));

        assert!(playlist.previous());
        assert_eq!(playlist.current_index(), Some(0));
        assert!(!playlist.previous());
        assert_eq!(playlist.current_index(), Some(0));
    }

    #[test]
    fn open_flow_reaches_the_newly_added_item() {
        let mut playlist = Playlist::new();
        playlist.add_media(item("a.mp4"));
        playlist.next();
        playlist.add_media(item("b.mp4"));
        playlist.next();
        assert_eq!(playlist.current_item().unwrap().filename(), "b.mp4");
    }

    #[test]
    fn media_count_tracks_additions() {
        let mut playlist = Playlist::new();
        assert_eq!(playlist.media_count(), 0);
        playlist.add_media(item("a.mp4"));
        assert_eq!(playlist.media_count(), 1);
        assert!(playlist.current_item().is_none());
    }
}
