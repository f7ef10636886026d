//! Media sets and media kind recognition

use std::fmt;

const VIDEO_EXTENSIONS: [&str; 3] = [".mp4", ".webm", ".mov"];
const ANIMATED_EXTENSIONS: [&str; 1] = [".gif"];

/// Kind of media a URL points at, derived from its file-extension substring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    AnimatedImage,
    Video,
    /// No URL at all; a static placeholder is shown instead
    Placeholder,
}

impl MediaKind {
    /// Resolves the kind of an optional URL.
    ///
    /// Matching is a case-insensitive substring check, so query strings and
    /// CDN transformation segments do not interfere. Unrecognized extensions
    /// are treated as images.
    pub fn from_url(url: Option<&str>) -> Self {
        let url = match url {
            Some(url) if !url.is_empty() => url.to_ascii_lowercase(),
            _ => return MediaKind::Placeholder,
        };

        if VIDEO_EXTENSIONS.iter().any(|ext| url.contains(ext)) {
            MediaKind::Video
        } else if ANIMATED_EXTENSIONS.iter().any(|ext| url.contains(ext)) {
            MediaKind::AnimatedImage
        } else {
            MediaKind::Image
        }
    }

    /// Returns true for video media
    pub fn is_video(self) -> bool {
        self == MediaKind::Video
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaKind::Image => "image",
            MediaKind::AnimatedImage => "animated-image",
            MediaKind::Video => "video",
            MediaKind::Placeholder => "placeholder",
        };
        f.write_str(name)
    }
}

/// Ordered, immutable sequence of media URLs for one stage or sub-stage.
///
/// Position 0 is the default/poster item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaSet {
    urls: Vec<String>,
}

impl MediaSet {
    /// Creates a media set from an ordered list of URLs
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls }
    }

    /// Builds a set from the single-URL and list forms found in configuration.
    ///
    /// A non-empty list wins; otherwise a non-empty single URL becomes a
    /// one-item set; otherwise the set is empty.
    pub fn normalize(single: Option<&str>, many: &[String]) -> Self {
        if !many.is_empty() {
            return Self::new(many.to_vec());
        }
        match single {
            Some(url) if !url.is_empty() => Self::new(vec![url.to_string()]),
            _ => Self::default(),
        }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.urls.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// More than one item: navigation and auto-advance apply
    pub fn is_gallery(&self) -> bool {
        self.urls.len() > 1
    }

    /// Kind of the item at `index` (placeholder when out of range)
    pub fn kind_at(&self, index: usize) -> MediaKind {
        MediaKind::from_url(self.get(index))
    }

    /// Counts items per kind as `(images, animated, videos)`
    pub fn kind_counts(&self) -> (usize, usize, usize) {
        self.urls
            .iter()
            .fold((0, 0, 0), |(i, a, v), url| match MediaKind::from_url(Some(url)) {
                MediaKind::Video => (i, a, v + 1),
                MediaKind::AnimatedImage => (i, a + 1, v),
                _ => (i + 1, a, v),
            })
    }
}
