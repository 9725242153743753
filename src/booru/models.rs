// Data models — the typed records the rest of the application works with.
//
// Upstream guarantees nothing about which fields a record carries, so every
// field has an explicit default. Unknown keys are ignored. These types are
// separate from the client so other modules can use them without touching
// the HTTP layer.

use serde::{Deserialize, Serialize};

/// A single post as returned by the posts endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub file_url: String,
    #[serde(default)]
    pub preview_url: String,
    #[serde(default)]
    pub sample_url: String,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub rating: String,
    /// Space-separated tag string, exactly as upstream sends it.
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub source: String,
}

impl Post {
    /// Media kind, derived from the file URL extension.
    pub fn media_type(&self) -> MediaType {
        MediaType::from_url(&self.file_url)
    }

    /// The URL to send when showing the full media. Videos and gifs must
    /// use the original file; for images the sample rendition is preferred
    /// when upstream provides one.
    pub fn display_url(&self) -> &str {
        match self.media_type() {
            MediaType::Video | MediaType::Gif => &self.file_url,
            MediaType::Image => {
                if self.sample_url.is_empty() {
                    &self.file_url
                } else {
                    &self.sample_url
                }
            }
        }
    }

    /// Thumbnail URL, falling back to the full file when no preview exists.
    pub fn preview(&self) -> &str {
        if self.preview_url.is_empty() {
            &self.file_url
        } else {
            &self.preview_url
        }
    }
}

/// Media kind derived from a file URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Gif,
    Video,
}

impl MediaType {
    /// Derive the media kind from the extension after the last dot.
    /// URLs without a dot (or empty URLs) default to `Image`.
    pub fn from_url(url: &str) -> Self {
        if !url.contains('.') {
            return MediaType::Image;
        }
        let ext = url.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
        match ext.as_str() {
            "mp4" => MediaType::Video,
            "gif" => MediaType::Gif,
            _ => MediaType::Image,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Gif => "gif",
            MediaType::Video => "video",
        }
    }
}

/// A tag record from the tags endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    /// How many posts carry this tag.
    #[serde(default)]
    pub count: Option<u64>,
    /// Upstream tag category (artist, character, ...), numeric on the wire.
    #[serde(default, rename = "type")]
    pub tag_type: Option<i64>,
}

/// A comment on a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub post_id: Option<u64>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub created_at: String,
}
