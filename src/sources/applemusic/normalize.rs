use serde_json::Value;

use super::catalog::{non_empty, RawTrack};
use super::SOURCE_NAME;
use crate::error::{ResolveError, ResolveResult};
use crate::models::{Track, TrackInfo, UNKNOWN_ARTIST};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageSize {
    fn default() -> Self {
        Self {
            width: 900,
            height: 500,
        }
    }
}

/// Substitutes the `{w}` and `{h}` placeholders of an artwork template.
pub fn artwork_url(template: &str, size: ImageSize) -> String {
    template
        .replace("{w}", &size.width.to_string())
        .replace("{h}", &size.height.to_string())
}

/// Converts a raw catalog record into a track the host can queue.
///
/// Fails only when the record itself is absent; every missing attribute
/// falls back to a default.
pub fn build_unresolved(
    record: Option<RawTrack>,
    requester: &Value,
    size: ImageSize,
) -> ResolveResult<Track> {
    let record = record.ok_or(ResolveError::InvalidInput)?;
    let attributes = record.attributes().cloned().unwrap_or_default();

    let author = non_empty(&attributes.composer_name)
        .or_else(|| record.label())
        .unwrap_or(UNKNOWN_ARTIST)
        .to_string();

    let image = attributes
        .artwork
        .and_then(|a| a.url)
        .map(|template| artwork_url(&template, size));

    Ok(Track {
        track: String::new(),
        info: TrackInfo {
            source_name: SOURCE_NAME.to_string(),
            identifier: record.song().id.clone().unwrap_or_default(),
            is_seekable: true,
            author,
            length: attributes.duration_in_millis.unwrap_or(0),
            is_stream: false,
            title: attributes.name.unwrap_or_default(),
            uri: attributes.url.unwrap_or_default(),
            image,
            requester: requester.clone(),
        },
    })
}
