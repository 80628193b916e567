//! Image URL builders
//!
//! Pure functions turning nullable TMDB path fragments into fully qualified
//! CDN URLs. Nothing here touches the network.

/// Base URL of the TMDB image CDN
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

pub const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/500x750?text=No+Poster";
pub const BACKDROP_PLACEHOLDER: &str = "https://via.placeholder.com/1280x720?text=No+Image";
pub const PROFILE_PLACEHOLDER: &str = "https://via.placeholder.com/342x513?text=Sin+Foto";

/// Size token for posters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PosterSize {
    W342,
    #[default]
    W500,
    Original,
}

impl PosterSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterSize::W342 => "w342",
            PosterSize::W500 => "w500",
            PosterSize::Original => "original",
        }
    }
}

/// Size token for backdrops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackdropSize {
    W780,
    #[default]
    W1280,
    Original,
}

impl BackdropSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackdropSize::W780 => "w780",
            BackdropSize::W1280 => "w1280",
            BackdropSize::Original => "original",
        }
    }
}

/// Size token for profile photos
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProfileSize {
    W185,
    #[default]
    W342,
    H632,
    Original,
}

impl ProfileSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileSize::W185 => "w185",
            ProfileSize::W342 => "w342",
            ProfileSize::H632 => "h632",
            ProfileSize::Original => "original",
        }
    }
}

fn image_url(path: Option<&str>, size: &str, placeholder: &str) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(p) => format!("{IMAGE_BASE_URL}/{size}{p}"),
        None => placeholder.to_string(),
    }
}

/// Poster URL, or the poster placeholder when there is no path
///
/// # Examples
/// ```
/// use cinewave_core::images::{poster_url, PosterSize, POSTER_PLACEHOLDER};
///
/// assert_eq!(
///     poster_url(Some("/abc.jpg"), PosterSize::W342),
///     "https://image.tmdb.org/t/p/w342/abc.jpg"
/// );
/// assert_eq!(poster_url(None, PosterSize::W500), POSTER_PLACEHOLDER);
/// ```
pub fn poster_url(path: Option<&str>, size: PosterSize) -> String {
    image_url(path, size.as_str(), POSTER_PLACEHOLDER)
}

/// Backdrop URL, or the backdrop placeholder when there is no path
pub fn backdrop_url(path: Option<&str>, size: BackdropSize) -> String {
    image_url(path, size.as_str(), BACKDROP_PLACEHOLDER)
}

/// Profile photo URL, or the profile placeholder when there is no path
pub fn profile_url(path: Option<&str>, size: ProfileSize) -> String {
    image_url(path, size.as_str(), PROFILE_PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_url() {
        assert_eq!(
            poster_url(Some("/p.jpg"), PosterSize::default()),
            "https://image.tmdb.org/t/p/w500/p.jpg"
        );
        assert_eq!(
            poster_url(Some("/p.jpg"), PosterSize::Original),
            "https://image.tmdb.org/t/p/original/p.jpg"
        );
    }

    #[test]
    fn test_backdrop_url() {
        assert_eq!(
            backdrop_url(Some("/b.jpg"), BackdropSize::default()),
            "https://image.tmdb.org/t/p/w1280/b.jpg"
        );
        assert_eq!(backdrop_url(None, BackdropSize::W780), BACKDROP_PLACEHOLDER);
    }

    #[test]
    fn test_profile_url() {
        assert_eq!(
            profile_url(Some("/f.jpg"), ProfileSize::H632),
            "https://image.tmdb.org/t/p/h632/f.jpg"
        );
        assert_eq!(profile_url(None, ProfileSize::W185), PROFILE_PLACEHOLDER);
    }

    #[test]
    fn test_empty_path_uses_placeholder() {
        assert_eq!(poster_url(Some(""), PosterSize::W342), POSTER_PLACEHOLDER);
    }
}
