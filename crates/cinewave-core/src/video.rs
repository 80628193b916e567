//! YouTube video key normalization
//!
//! The catalog sometimes stores full URLs, short links or keys with tracking
//! parameters where a bare YouTube ID is expected. This module extracts the
//! canonical 11-character ID so players and thumbnails can rely on it.

use regex_lite::Regex;

use crate::types::ContentDetails;

/// Thumbnail resolution served by YouTube
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailQuality {
    MaxRes,
    High,
}

impl ThumbnailQuality {
    fn file_name(&self) -> &'static str {
        match self {
            ThumbnailQuality::MaxRes => "maxresdefault.jpg",
            ThumbnailQuality::High => "hqdefault.jpg",
        }
    }
}

/// Extract a YouTube video ID from a bare key or any common URL shape.
///
/// Patterns are tried in order: the whole input, a `youtu.be/` short link,
/// a `v=` query parameter, an `embed/` path, and finally any 11-character
/// run of the ID alphabet. The last one can match unrelated parameters.
///
/// # Arguments
/// * `input` - Raw key or URL
///
/// # Returns
/// * `Some(id)` with the 11-character ID
/// * `None` if no pattern matches
///
/// # Examples
/// ```
/// use cinewave_core::video::extract_video_id;
///
/// assert_eq!(extract_video_id("dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_string()));
/// assert_eq!(
///     extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abc"),
///     Some("dQw4w9WgXcQ".to_string())
/// );
/// assert_eq!(extract_video_id("short"), None);
/// ```
pub fn extract_video_id(input: &str) -> Option<String> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    let exact = Regex::new(r"^[A-Za-z0-9_-]{11}$").ok()?;
    if exact.is_match(s) {
        return Some(s.to_string());
    }

    let patterns = [
        r"youtu\.be/([A-Za-z0-9_-]{11})",
        r"[?&]v=([A-Za-z0-9_-]{11})",
        r"embed/([A-Za-z0-9_-]{11})",
        r"([A-Za-z0-9_-]{11})",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).ok()?;
        if let Some(caps) = re.captures(s) {
            return Some(caps.get(1)?.as_str().to_string());
        }
    }

    None
}

/// Replace every YouTube key in the details with its canonical ID.
///
/// Keys with no extractable ID and videos from other sites are left as they are.
pub fn normalize_video_keys(details: &mut ContentDetails) {
    for video in details.videos.results.iter_mut().filter(|v| v.is_youtube()) {
        if let Some(id) = extract_video_id(&video.key) {
            video.key = id;
        }
    }
}

/// Thumbnail URL for a normalized YouTube key
pub fn thumbnail_url(key: &str, quality: ThumbnailQuality) -> String {
    format!("https://img.youtube.com/vi/{}/{}", key, quality.file_name())
}

/// Embeddable player URL for a normalized YouTube key
pub fn embed_url(key: &str) -> String {
    format!("https://www.youtube.com/embed/{key}")
}
