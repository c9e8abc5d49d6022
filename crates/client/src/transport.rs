use crate::error::Result;
use crate::query::Params;
use async_trait::async_trait;

/// One GET request for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Path relative to the transport's base URL for the first page, or the
    /// absolute continuation URL for every page after that.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}
impl Request {
    pub fn new(path: impl Into<String>, params: &impl Params) -> Self {
        Self {
            path: path.into(),
            query: params.query(),
            headers: params.headers(),
        }
    }

    /// Follow-up request for a continuation cursor. Cursor URLs already
    /// encode the original query, so only the headers are carried over.
    pub fn cursor(&self, url: impl Into<String>) -> Self {
        Self {
            path: url.into(),
            query: Vec::new(),
            headers: self.headers.clone(),
        }
    }
}

/// Raw response to a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}
impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The network, as far as the collector is concerned.
///
/// Implementations own everything about actually talking to an API: base
/// URLs, authentication and token refresh, retries with back-off, rate
/// limiting. The paginator treats any `Err` (and any non-2xx [`Response`]) as
/// final for the listing it belongs to.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Name of the API this transport talks to (used for logging only).
    fn name(&self) -> &str;

    async fn get(&self, request: &Request) -> Result<Response>;
}
