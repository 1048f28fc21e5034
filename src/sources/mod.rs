pub mod applemusic;

use serde_json::Value;

use crate::models::LoadResult;

/// One resolution request as handed over by the playback host.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveRequest {
    pub query: String,
    /// Source the caller asked for, e.g. `applemusic` or `ytsearch`.
    pub source: String,
    /// Opaque caller context, copied into every resolved track.
    pub requester: Value,
}

impl ResolveRequest {
    pub fn new(query: impl Into<String>, source: impl Into<String>, requester: Value) -> Self {
        Self {
            query: query.into(),
            source: source.into(),
            requester,
        }
    }
}

/// The host's own resolution, used for input no registered backend claims.
pub trait Delegate: Send + Sync {
    fn delegate(&self, request: &ResolveRequest) -> LoadResult;
}

/// A track resolution backend.
/// Catalog sources such as Apple Music are abstracted behind this trait.
pub trait Resolver: Send + Sync {
    fn name(&self) -> &str;

    /// Resolves `request`, or returns `None` when the input is not understood.
    /// Backends may hand input they do not own to `delegate`.
    fn resolve(&self, request: &ResolveRequest, delegate: &dyn Delegate) -> Option<LoadResult>;
}

/// Host-side composition: resolvers are tried in registration order and the
/// default delegate runs when none of them produced a result.
pub struct ResolverChain {
    resolvers: Vec<Box<dyn Resolver>>,
    default: Box<dyn Delegate>,
}

impl ResolverChain {
    pub fn new(default: Box<dyn Delegate>) -> Self {
        Self {
            resolvers: Vec::new(),
            default,
        }
    }

    pub fn register(&mut self, resolver: Box<dyn Resolver>) {
        log::info!("Registered resolver {}", resolver.name());
        self.resolvers.push(resolver);
    }

    pub fn names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    pub fn resolve(&self, request: &ResolveRequest) -> LoadResult {
        for resolver in &self.resolvers {
            if let Some(result) = resolver.resolve(request, self.default.as_ref()) {
                return result;
            }
            log::debug!("{} did not resolve {:?}", resolver.name(), request.query);
        }
        self.default.delegate(request)
    }
}

/// Default delegate of the standalone CLI, which has no host chain behind it.
pub struct NoMatches;

impl Delegate for NoMatches {
    fn delegate(&self, request: &ResolveRequest) -> LoadResult {
        log::info!(
            "No resolver for {:?} (source {}), reporting no matches",
            request.query,
            request.source
        );
        LoadResult::no_matches()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoadType;

    struct Fixed(&'static str, Option<LoadType>);

    impl Resolver for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn resolve(&self, _: &ResolveRequest, _: &dyn Delegate) -> Option<LoadResult> {
            self.1.map(|load_type| {
                LoadResult::build(load_type, vec![], Some(self.0.to_string()), None)
            })
        }
    }

    #[test]
    fn test_chain_tries_resolvers_in_order() {
        let mut chain = ResolverChain::new(Box::new(NoMatches));
        chain.register(Box::new(Fixed("first", None)));
        chain.register(Box::new(Fixed("second", Some(LoadType::PlaylistLoaded))));
        chain.register(Box::new(Fixed("third", Some(LoadType::TrackLoaded))));

        assert_eq!(chain.names(), vec!["first", "second", "third"]);

        let result = chain.resolve(&ResolveRequest::new("q", "x", Value::Null));
        assert_eq!(result.load_type, LoadType::PlaylistLoaded);
        assert_eq!(result.playlist_info.name.as_deref(), Some("second"));
    }

    #[test]
    fn test_chain_falls_back_to_default() {
        let mut chain = ResolverChain::new(Box::new(NoMatches));
        chain.register(Box::new(Fixed("never", None)));

        let result = chain.resolve(&ResolveRequest::new("q", "x", Value::Null));
        assert_eq!(result.load_type, LoadType::NoMatches);
    }
}
