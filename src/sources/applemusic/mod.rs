pub mod catalog;
pub mod client;
pub mod normalize;
pub mod resource;

use rayon::prelude::*;
use serde_json::Value;

use crate::error::{ConfigError, FetchError, ResolveError, ResolveResult};
use crate::models::{LoadResult, LoadType, Track};
use crate::sources::{Delegate, ResolveRequest, Resolver};
use catalog::Extracted;
use client::{CatalogClient, Transport};
use normalize::ImageSize;
use resource::ResourceKind;

pub const SOURCE_NAME: &str = "applemusic";
pub const DEFAULT_FALLBACK_SOURCE: &str = "ytsearch";

#[derive(Debug, Clone, Default)]
pub struct AppleMusicOptions {
    /// Two-letter storefront, e.g. `us`.
    pub storefront_code: Option<String>,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    /// Source handed to the host for queries that are not ours.
    pub default_source: Option<String>,
}

/// Resolves search terms and catalog URLs against the Apple Music catalog.
pub struct AppleMusic {
    client: CatalogClient,
    image_size: ImageSize,
    default_source: String,
}

impl AppleMusic {
    pub fn new(
        options: &AppleMusicOptions,
        token: &str,
        transport: Box<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        let storefront = options
            .storefront_code
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingStorefront)?;

        let defaults = ImageSize::default();
        Ok(Self {
            client: CatalogClient::new(storefront, token, transport),
            image_size: ImageSize {
                width: options.image_width.unwrap_or(defaults.width),
                height: options.image_height.unwrap_or(defaults.height),
            },
            default_source: options
                .default_source
                .clone()
                .unwrap_or_else(|| DEFAULT_FALLBACK_SOURCE.to_string()),
        })
    }

    pub fn check(&self, query: &str) -> bool {
        resource::check(query)
    }

    pub fn search_song(&self, query: &str, requester: &Value) -> LoadResult {
        let path = format!("/search?types=songs&term={}", urlencoding::encode(query));
        self.run("search", LoadType::TrackLoaded, requester, || {
            catalog::extract_search(self.client.fetch(&path)?)
        })
    }

    pub fn fetch_album(&self, url: &str, requester: &Value) -> LoadResult {
        self.run("album", LoadType::PlaylistLoaded, requester, || {
            let id = Self::id_of(url)?;
            catalog::extract_album(self.client.fetch(&format!("/albums/{id}"))?)
        })
    }

    pub fn fetch_playlist(&self, url: &str, requester: &Value) -> LoadResult {
        self.run("playlist", LoadType::PlaylistLoaded, requester, || {
            let id = Self::id_of(url)?;
            catalog::extract_playlist(self.client.fetch(&format!("/playlists/{id}"))?)
        })
    }

    pub fn fetch_artist(&self, url: &str, requester: &Value) -> LoadResult {
        self.run("artist", LoadType::PlaylistLoaded, requester, || {
            let id = Self::id_of(url)?;
            catalog::extract_top_songs(
                self.client
                    .fetch(&format!("/artists/{id}/view/top-songs"))?,
            )
        })
    }

    fn id_of(url: &str) -> ResolveResult<String> {
        resource::resource_id(url).ok_or_else(|| ResolveError::MissingId(url.to_string()))
    }

    /// Shared tail of every pipeline: fetch and extract, normalize all tracks in
    /// parallel, wrap the outcome. Errors never leave this function.
    fn run<F>(
        &self,
        pipeline: &str,
        load_type: LoadType,
        requester: &Value,
        fetch: F,
    ) -> LoadResult
    where
        F: FnOnce() -> ResolveResult<Extracted>,
    {
        let outcome = fetch().and_then(|extracted| {
            let tracks = self.build_tracks(extracted.tracks, requester)?;
            Ok((tracks, extracted.name))
        });

        match outcome {
            Ok((tracks, name)) => {
                log::info!("{pipeline}: resolved {} tracks", tracks.len());
                LoadResult::build(load_type, tracks, name, None)
            }
            Err(e) => {
                match &e {
                    ResolveError::Fetch(FetchError {
                        status: Some(status),
                        ..
                    }) => log::warn!("{pipeline}: HTTP {status}: {e}"),
                    _ => log::warn!("{pipeline}: {e}"),
                }
                LoadResult::failed(e.to_string())
            }
        }
    }

    fn build_tracks(
        &self,
        records: Vec<Option<catalog::RawTrack>>,
        requester: &Value,
    ) -> ResolveResult<Vec<Track>> {
        records
            .into_par_iter()
            .map(|record| normalize::build_unresolved(record, requester, self.image_size))
            .collect()
    }
}

impl Resolver for AppleMusic {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn resolve(&self, request: &ResolveRequest, delegate: &dyn Delegate) -> Option<LoadResult> {
        let ResolveRequest {
            query,
            source,
            requester,
        } = request;
        let is_url = self.check(query);

        if source.eq_ignore_ascii_case(SOURCE_NAME) && !is_url {
            return Some(self.search_song(query, requester));
        }

        if !is_url {
            log::debug!(
                "{query:?} is not an Apple Music URL, delegating to {}",
                self.default_source
            );
            let fallback =
                ResolveRequest::new(query.clone(), self.default_source.clone(), requester.clone());
            return Some(delegate.delegate(&fallback));
        }

        match resource::classify(query)? {
            ResourceKind::Album => Some(self.fetch_album(query, requester)),
            ResourceKind::Playlist => Some(self.fetch_playlist(query, requester)),
            ResourceKind::Artist => Some(self.fetch_artist(query, requester)),
            ResourceKind::MusicVideo => {
                log::debug!("No pipeline for music-video {query}");
                None
            }
        }
    }
}
