use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:https://music\.apple\.com/)(?:.+)?(artist|album|music-video|playlist)/([\w\-\.]+(/)+[\w\-\.]+|[^&]+)/([\w\-\.]+(/)+[\w\-\.]+|[^&]+)",
    )
    .expect("URL pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Artist,
    Album,
    Playlist,
    MusicVideo,
}

impl ResourceKind {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "artist" => Some(Self::Artist),
            "album" => Some(Self::Album),
            "playlist" => Some(Self::Playlist),
            "music-video" => Some(Self::MusicVideo),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Album => "album",
            Self::Playlist => "playlist",
            Self::MusicVideo => "music-video",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: String,
}

/// Whether `input` looks like an Apple Music catalog URL rather than a search term.
pub fn check(input: &str) -> bool {
    URL_PATTERN.is_match(input)
}

pub fn classify(input: &str) -> Option<ResourceKind> {
    let caps = URL_PATTERN.captures(input)?;
    ResourceKind::from_keyword(caps.get(1)?.as_str())
}

/// Last non-empty path segment, ignoring query string and fragment.
pub fn resource_id(input: &str) -> Option<String> {
    let parsed = url::Url::parse(input).ok()?;
    parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}

pub fn parse(input: &str) -> Option<ResourceRef> {
    Some(ResourceRef {
        kind: classify(input)?,
        id: resource_id(input)?,
    })
}
