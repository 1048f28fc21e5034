use serde_json::Value;

use crate::error::FetchError;

pub const CATALOG_BASE: &str = "https://amp-api.music.apple.com/v1/catalog";
pub const ORIGIN: &str = "https://music.apple.com";

/// Status and raw body of one HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Issues a GET request. Only transport-level failures are errors here;
/// status handling belongs to the caller.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| FetchError::transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError> {
        let mut req = self.client.get(url);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let resp = req
            .send()
            .map_err(|e| FetchError::transport(format!("Request to Apple Music failed: {e}")))?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| FetchError {
            status: Some(status),
            upstream_message: None,
            message: format!("Failed to read Apple Music response: {e}"),
        })?;

        Ok(HttpResponse { status, body })
    }
}

/// Authenticated access to one storefront of the catalog.
pub struct CatalogClient {
    fetch_url: String,
    authorization: String,
    transport: Box<dyn Transport>,
}

impl CatalogClient {
    pub fn new(storefront: &str, token: &str, transport: Box<dyn Transport>) -> Self {
        Self {
            fetch_url: format!("{CATALOG_BASE}/{storefront}"),
            authorization: format!("Bearer {token}"),
            transport,
        }
    }

    /// GETs `path` (starting with `/`) relative to the storefront and parses the body.
    pub fn fetch(&self, path: &str) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.fetch_url, path);
        log::debug!("GET {url}");

        let resp = self.transport.get(
            &url,
            &[("Authorization", self.authorization.as_str()), ("Origin", ORIGIN)],
        )?;
        let parsed = serde_json::from_str::<Value>(&resp.body);

        if !(200..300).contains(&resp.status) {
            return Err(FetchError {
                status: Some(resp.status),
                upstream_message: parsed.ok().as_ref().and_then(upstream_message),
                message: format!("Apple Music responded with HTTP {}", resp.status),
            });
        }

        parsed.map_err(|e| FetchError {
            status: Some(resp.status),
            upstream_message: None,
            message: format!("Apple Music returned invalid JSON: {e}"),
        })
    }
}

/// Error text embedded in a catalog error body, if any.
fn upstream_message(body: &Value) -> Option<String> {
    let text = |v: &Value| v.as_str().filter(|s| !s.is_empty()).map(str::to_string);

    body.pointer("/error/message")
        .and_then(text)
        .or_else(|| body.pointer("/errors/0/detail").and_then(text))
        .or_else(|| body.pointer("/errors/0/title").and_then(text))
}
