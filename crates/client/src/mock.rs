//! In-memory transport for testing.

use crate::error::{ErrorKind, Result};
use crate::transport::{Request, Response, Transport};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone)]
enum Reply {
    Respond(Response),
    Fail(String),
    Pending,
}

/// Build a page body holding `items`, optionally pointing at a next page.
pub fn page(items: impl IntoIterator<Item = Value>, next_link: Option<&str>) -> Value {
    let items: Vec<Value> = items.into_iter().collect();
    match next_link {
        Some(next) => json!({"value": items, "@odata.nextLink": next}),
        None => json!({"value": items}),
    }
}

/// In-memory transport for testing.
///
/// Replies are keyed by [`Request::path`]: the relative path for a first
/// page, the full cursor URL for the pages after it. The same reply is given
/// every time a path is requested; anything without a reply gets a `404`.
/// Every request is logged and can be inspected with
/// [`requests()`](Self::requests).
///
/// # Examples
///
/// ```
/// use cirrus_client::mock::{MockTransport, page};
/// use serde_json::json;
///
/// let transport = MockTransport::default()
///     .with_page("/v1.0/users", page([json!({"id": "u-1"})], Some("https://graph/users?page=2")))
///     .with_page("https://graph/users?page=2", page([json!({"id": "u-2"})], None))
///     .with_failure("/v1.0/groups", "connection reset");
/// ```
#[derive(Debug)]
pub struct MockTransport {
    name: String,
    replies: HashMap<String, Reply>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    /// Change the name of the mock transport.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Answer `path` with a `200` and the given JSON body.
    pub fn with_page(self, path: impl Into<String>, body: Value) -> Self {
        self.with_response(path, 200, body.to_string().into_bytes())
    }

    /// Answer `path` with an arbitrary status and body.
    pub fn with_response(mut self, path: impl Into<String>, status: u16, body: Vec<u8>) -> Self {
        self.replies.insert(path.into(), Reply::Respond(Response { status, body }));
        self
    }

    /// Fail requests for `path` at the transport level.
    pub fn with_failure(mut self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.replies.insert(path.into(), Reply::Fail(message.into()));
        self
    }

    /// Never answer requests for `path`.
    pub fn with_pending(mut self, path: impl Into<String>) -> Self {
        self.replies.insert(path.into(), Reply::Pending);
        self
    }

    /// Every request made so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
impl Default for MockTransport {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            replies: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, request: &Request) -> Result<Response> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request.clone());
        match self.replies.get(&request.path).cloned() {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(message)) => exn::bail!(ErrorKind::Transport(message)),
            Some(Reply::Pending) => std::future::pending().await,
            None => Ok(Response { status: 404, body: br#"{"error":{"code":"NotFound"}}"#.to_vec() }),
        }
    }
}
