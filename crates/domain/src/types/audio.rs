//! Audio track types

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::utils::text::{decode_entities, format_mm_ss};

/// Audio track as returned by `audio.search` and `audio.get`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Audio {
    #[serde(rename = "aid")]
    pub id: u32,
    /// Negative for tracks owned by a group.
    pub owner_id: i64,
    pub artist: String,
    pub title: String,
    /// Length in seconds.
    pub duration: u32,
    pub url: String,
    pub lyrics_id: u32,
}

impl Audio {
    /// `Artist - Title`, entities decoded.
    #[must_use]
    pub fn caption(&self) -> String {
        format!(
            "{} - {}",
            decode_entities(self.artist.trim()),
            decode_entities(self.title.trim())
        )
    }

    /// `Artist - Title [mm:ss]`
    #[must_use]
    pub fn caption_full(&self) -> String {
        format!("{} {}", self.caption(), self.duration_string())
    }

    /// `[mm:ss]`
    #[must_use]
    pub fn duration_string(&self) -> String {
        format!("[{}]", format_mm_ss(self.duration))
    }

    /// Suggested file name: `Artist-Title` plus the extension of the track URL.
    #[must_use]
    pub fn filename(&self) -> String {
        let stem = format!(
            "{}-{}",
            decode_entities(self.artist.trim()),
            decode_entities(self.title.trim())
        );

        let path = self.url.split(['?', '#']).next().unwrap_or_default();
        let file = path.rsplit('/').next().unwrap_or_default();
        match file.rfind('.') {
            Some(dot) => format!("{stem}{}", &file[dot..]),
            None => stem,
        }
    }

    /// Order by raw `artist - title`.
    #[must_use]
    pub fn cmp_by_caption(&self, other: &Self) -> Ordering {
        (self.artist.as_str(), self.title.as_str()).cmp(&(other.artist.as_str(), other.title.as_str()))
    }
}

/// Song lyrics (`audio.getLyrics`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Lyrics {
    #[serde(rename = "lyrics_id")]
    pub id: u32,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Audio {
        Audio {
            id: 1,
            owner_id: 42,
            artist: " Simon &amp; Garfunkel ".to_string(),
            title: "The Boxer".to_string(),
            duration: 308,
            url: "http://cs1.example.com/u42/audio/abc123.mp3?extra=token".to_string(),
            lyrics_id: 0,
        }
    }

    #[test]
    fn captions_decode_entities_and_trim() {
        let audio = track();
        assert_eq!(audio.caption(), "Simon & Garfunkel - The Boxer");
        assert_eq!(audio.caption_full(), "Simon & Garfunkel - The Boxer [05:08]");
        assert_eq!(audio.duration_string(), "[05:08]");
    }

    #[test]
    fn filename_takes_extension_from_url_path() {
        assert_eq!(track().filename(), "Simon & Garfunkel-The Boxer.mp3");

        let no_ext = Audio { url: "http://example.com/stream".to_string(), ..track() };
        assert_eq!(no_ext.filename(), "Simon & Garfunkel-The Boxer");
    }
}
