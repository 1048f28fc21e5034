use serde::Serialize;
use serde_json::Value;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// A track that is known by metadata only. The playback host fills in the
/// encoded track data once it actually loads the audio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub track: String,
    pub info: TrackInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInfo {
    pub source_name: String,
    pub identifier: String,
    pub is_seekable: bool,
    pub author: String,
    /// Milliseconds.
    pub length: u64,
    pub is_stream: bool,
    pub title: String,
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub requester: Value,
}

impl Track {
    /// Duration formatted as `m:ss`.
    pub fn display_length(&self) -> String {
        let secs = self.info.length / 1000;
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadType {
    TrackLoaded,
    PlaylistLoaded,
    SearchResult,
    NoMatches,
    LoadFailed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaylistInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Common,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackException {
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResult {
    pub load_type: LoadType,
    pub tracks: Vec<Track>,
    pub playlist_info: PlaylistInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<TrackException>,
}

impl LoadResult {
    /// Builds the envelope handed back to the host.
    ///
    /// An exception is attached iff `load_type` is [`LoadType::LoadFailed`]:
    /// a failure without a message gets a generic one, and a message passed
    /// with any other load type is dropped.
    pub fn build(
        load_type: LoadType,
        tracks: Vec<Track>,
        playlist_name: Option<String>,
        exception_msg: Option<String>,
    ) -> Self {
        let exception = match load_type {
            LoadType::LoadFailed => Some(TrackException {
                message: exception_msg.unwrap_or_else(|| "Unknown error".to_string()),
                severity: Severity::Common,
            }),
            _ => None,
        };

        Self {
            load_type,
            tracks,
            playlist_info: PlaylistInfo {
                name: playlist_name.filter(|n| !n.is_empty()),
            },
            exception,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::build(LoadType::LoadFailed, Vec::new(), None, Some(message.into()))
    }

    pub fn no_matches() -> Self {
        Self::build(LoadType::NoMatches, Vec::new(), None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_track() -> Track {
        Track {
            track: String::new(),
            info: TrackInfo {
                source_name: "applemusic".to_string(),
                identifier: "1".to_string(),
                is_seekable: true,
                author: "Rick Astley".to_string(),
                length: 213_000,
                is_stream: false,
                title: "Never Gonna Give You Up".to_string(),
                uri: "https://music.apple.com/us/song/1".to_string(),
                image: None,
                requester: Value::Null,
            },
        }
    }

    #[test]
    fn test_failed_envelope_shape() {
        let result = LoadResult::failed("oops");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "loadType": "LOAD_FAILED",
                "tracks": [],
                "playlistInfo": {},
                "exception": { "message": "oops", "severity": "COMMON" }
            })
        );
    }

    #[test]
    fn test_playlist_name_present_only_when_resolved() {
        let named = LoadResult::build(
            LoadType::PlaylistLoaded,
            vec![],
            Some("Whenever You Need Somebody".to_string()),
            None,
        );
        assert_eq!(
            serde_json::to_value(&named).unwrap()["playlistInfo"],
            json!({ "name": "Whenever You Need Somebody" })
        );

        let unnamed = LoadResult::build(LoadType::PlaylistLoaded, vec![], None, None);
        assert_eq!(serde_json::to_value(&unnamed).unwrap()["playlistInfo"], json!({}));
    }

    #[test]
    fn test_exception_only_for_load_failed() {
        let result = LoadResult::build(
            LoadType::TrackLoaded,
            vec![sample_track()],
            None,
            Some("ignored".to_string()),
        );
        assert!(result.exception.is_none());

        let result = LoadResult::build(LoadType::LoadFailed, vec![], None, None);
        assert_eq!(result.exception.unwrap().message, "Unknown error");
    }

    #[test]
    fn test_build_is_idempotent() {
        let a = LoadResult::build(
            LoadType::TrackLoaded,
            vec![sample_track()],
            Some("x".to_string()),
            None,
        );
        let b = LoadResult::build(
            LoadType::TrackLoaded,
            vec![sample_track()],
            Some("x".to_string()),
            None,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_track_info_serializes_camel_case() {
        let value = serde_json::to_value(sample_track()).unwrap();
        assert_eq!(value["track"], "");
        assert_eq!(value["info"]["sourceName"], "applemusic");
        assert_eq!(value["info"]["isSeekable"], true);
        assert_eq!(value["info"]["isStream"], false);
        assert!(value["info"].get("image").is_none());
    }

    #[test]
    fn test_display_length() {
        assert_eq!(sample_track().display_length(), "3:33");
    }
}
