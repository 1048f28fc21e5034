//! Response shapes of the Apple Music catalog API.
//!
//! Only the fields the normalizer reads are modelled, and all of them are
//! optional so that a sparse record never fails deserialization.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ResolveError, ResolveResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Song {
    pub id: Option<String>,
    pub attributes: Option<SongAttributes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongAttributes {
    pub name: Option<String>,
    pub url: Option<String>,
    pub duration_in_millis: Option<u64>,
    pub composer_name: Option<String>,
    pub record_label: Option<String>,
    pub artist_name: Option<String>,
    pub artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Artwork {
    /// Template containing `{w}` and `{h}` placeholders.
    pub url: Option<String>,
}

/// A track record tagged with the endpoint it came from.
#[derive(Debug, Clone)]
pub enum RawTrack {
    Search(Song),
    AlbumTrack {
        song: Song,
        /// Record label of the enclosing album.
        album_label: Option<String>,
    },
    PlaylistTrack(Song),
    TopSong(Song),
}

impl RawTrack {
    pub fn song(&self) -> &Song {
        match self {
            Self::Search(song)
            | Self::AlbumTrack { song, .. }
            | Self::PlaylistTrack(song)
            | Self::TopSong(song) => song,
        }
    }

    pub fn attributes(&self) -> Option<&SongAttributes> {
        self.song().attributes.as_ref()
    }

    pub fn label(&self) -> Option<&str> {
        let own = self.attributes().and_then(|a| non_empty(&a.record_label));
        match self {
            Self::AlbumTrack { album_label, .. } => own.or_else(|| non_empty(album_label)),
            _ => own,
        }
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Raw track list plus the collection name, if the endpoint has one.
/// `None` entries are `null` records in the upstream list.
#[derive(Debug, Default)]
pub struct Extracted {
    pub tracks: Vec<Option<RawTrack>>,
    pub name: Option<String>,
}

#[derive(Deserialize)]
struct SongList {
    data: Option<Vec<Option<Song>>>,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Option<SearchResults>,
}

#[derive(Deserialize)]
struct SearchResults {
    songs: Option<SongList>,
}

#[derive(Deserialize)]
struct CollectionResponse {
    data: Option<Vec<Collection>>,
}

#[derive(Deserialize)]
struct Collection {
    attributes: Option<CollectionAttributes>,
    relationships: Option<Relationships>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionAttributes {
    name: Option<String>,
    record_label: Option<String>,
}

#[derive(Deserialize)]
struct Relationships {
    tracks: Option<SongList>,
}

pub fn extract_search(body: Value) -> ResolveResult<Extracted> {
    let resp: SearchResponse = serde_json::from_value(body)?;
    let songs = resp
        .results
        .and_then(|r| r.songs)
        .and_then(|s| s.data)
        .ok_or(ResolveError::MissingField("results.songs.data"))?;

    Ok(Extracted {
        tracks: songs.into_iter().map(|s| s.map(RawTrack::Search)).collect(),
        name: None,
    })
}

fn first_collection(
    body: Value,
) -> ResolveResult<(Option<CollectionAttributes>, Vec<Option<Song>>)> {
    let resp: CollectionResponse = serde_json::from_value(body)?;
    let collection = resp
        .data
        .and_then(|d| d.into_iter().next())
        .ok_or(ResolveError::MissingField("data[0]"))?;
    let songs = collection
        .relationships
        .and_then(|r| r.tracks)
        .and_then(|t| t.data)
        .ok_or(ResolveError::MissingField("data[0].relationships.tracks.data"))?;
    Ok((collection.attributes, songs))
}

pub fn extract_album(body: Value) -> ResolveResult<Extracted> {
    let (attributes, songs) = first_collection(body)?;
    let (name, album_label) = match attributes {
        Some(a) => (a.name, a.record_label),
        None => (None, None),
    };

    Ok(Extracted {
        tracks: songs
            .into_iter()
            .map(|s| {
                s.map(|song| RawTrack::AlbumTrack {
                    song,
                    album_label: album_label.clone(),
                })
            })
            .collect(),
        name,
    })
}

pub fn extract_playlist(body: Value) -> ResolveResult<Extracted> {
    let (attributes, songs) = first_collection(body)?;

    Ok(Extracted {
        tracks: songs
            .into_iter()
            .map(|s| s.map(RawTrack::PlaylistTrack))
            .collect(),
        name: attributes.and_then(|a| a.name),
    })
}

pub fn extract_top_songs(body: Value) -> ResolveResult<Extracted> {
    let list: SongList = serde_json::from_value(body)?;
    let songs = list.data.ok_or(ResolveError::MissingField("data"))?;

    let name = songs
        .iter()
        .flatten()
        .next()
        .and_then(|s| s.attributes.as_ref())
        .and_then(|a| non_empty(&a.artist_name))
        .map(|artist| format!("{artist}'s top songs"));

    Ok(Extracted {
        tracks: songs.into_iter().map(|s| s.map(RawTrack::TopSong)).collect(),
        name,
    })
}
