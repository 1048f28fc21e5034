use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("[applemusic] storefront_code must be set, for example \"us\"")]
    MissingStorefront,
}

/// Failure of a single catalog request.
///
/// Covers transport errors, non-2xx responses and bodies that are not JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub status: Option<u16>,
    /// Message reported by the catalog itself, if the body carried one.
    pub upstream_message: Option<String>,
    pub message: String,
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            upstream_message: None,
            message: message.into(),
        }
    }

    /// Upstream message when present, otherwise the generic one.
    pub fn best_message(&self) -> &str {
        self.upstream_message.as_deref().unwrap_or(&self.message)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.best_message())
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Missing field in catalog response: {0}")]
    MissingField(&'static str),

    #[error("The Apple Music track object was not provided")]
    InvalidInput,

    #[error("Malformed catalog response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Could not extract a resource id from {0}")]
    MissingId(String),
}

pub type ResolveResult<T> = Result<T, ResolveError>;
