use crate::TransportHandle;
use crate::error::{ErrorKind, Result};
use crate::transport::{Request, Response};
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::pin::Pin;
use tokio_util::sync::CancellationToken;

/// Boxed stream of listing results, owned and sendable so it can be drained
/// from any task.
pub type ResultStream<T> = Pin<Box<dyn Stream<Item = Result<T>> + Send>>;

/// One page of a listing.
///
/// Directory APIs put the cursor in `@odata.nextLink`, resource-management
/// APIs in `nextLink`; either is accepted.
#[derive(Debug, Deserialize)]
struct Page {
    value: Vec<Value>,
    #[serde(default, rename = "@odata.nextLink", alias = "nextLink")]
    next_link: Option<String>,
}

fn decode_page(response: Response) -> Result<Page> {
    if !response.is_success() {
        exn::bail!(ErrorKind::Status(response.status));
    }
    serde_json::from_slice(&response.body).or_raise(|| ErrorKind::InvalidBody)
}

/// Drive one logical listing from its first page to its last.
///
/// Yields one item per element, in page order. Elements that fail to decode
/// into `T` are yielded as [`InvalidItem`](ErrorKind::InvalidItem) errors
/// and the listing continues. A failed request (transport error, non-2xx
/// status, body that isn't a page) is yielded as a single error, after which
/// the stream ends; retrying is the transport's job, not this one.
///
/// The token is checked before every request and before every item. Once it
/// is cancelled the stream ends without an error, abandoning any request
/// still in flight.
pub fn paginate<T>(transport: TransportHandle, token: CancellationToken, request: Request) -> ResultStream<T>
where
    T: DeserializeOwned + Send + 'static,
{
    Box::pin(stream!({
        let mut next = Some(request);
        let mut pages = 0u64;
        while let Some(request) = next.take() {
            if token.is_cancelled() {
                return;
            }
            tracing::trace!(transport = transport.name(), path = %request.path, page = pages, "Requesting page");
            let response = tokio::select! {
                biased;
                () = token.cancelled() => return,
                response = transport.get(&request) => response,
            };
            let page = match response.and_then(decode_page) {
                Ok(page) => page,
                Err(e) => {
                    yield Err(e);
                    return;
                },
            };
            pages += 1;
            for item in page.value {
                if token.is_cancelled() {
                    return;
                }
                yield serde_json::from_value::<T>(item).or_raise(|| ErrorKind::InvalidItem);
            }
            next = page.next_link.filter(|url| !url.is_empty()).map(|url| request.cursor(url));
        }
        tracing::trace!(transport = transport.name(), pages, "Listing exhausted");
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockTransport, page};
    use crate::query::GraphParams;
    use futures::StreamExt;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Item {
        id: String,
    }

    fn request() -> Request {
        Request::new("/v1.0/things", &GraphParams::default().with_top(2))
    }

    fn ids(results: &[Result<Item>]) -> Vec<Option<&str>> {
        results.iter().map(|r| r.as_ref().ok().map(|i| i.id.as_str())).collect()
    }

    #[tokio::test]
    async fn test_follows_cursor_across_pages() {
        let transport = Arc::new(
            MockTransport::default()
                .with_page("/v1.0/things", page([json!({"id": "a"}), json!({"id": "b"})], Some("https://next/2")))
                .with_page("https://next/2", page([json!({"id": "c"})], None)),
        );
        let results: Vec<Result<Item>> =
            paginate(transport.clone(), CancellationToken::new(), request()).collect().await;
        assert_eq!(ids(&results), vec![Some("a"), Some("b"), Some("c")]);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].query, vec![("$top".to_string(), "2".to_string())]);
        // Cursor URLs are self-contained; the original query is not re-sent.
        assert!(requests[1].query.is_empty());
    }

    #[tokio::test]
    async fn test_failed_second_page_ends_with_one_error() {
        let transport = Arc::new(
            MockTransport::default()
                .with_page("/v1.0/things", page([json!({"id": "a"}), json!({"id": "b"})], Some("https://next/2")))
                .with_failure("https://next/2", "connection reset"),
        );
        let results: Vec<Result<Item>> = paginate(transport, CancellationToken::new(), request()).collect().await;
        assert_eq!(ids(&results), vec![Some("a"), Some("b"), None]);
        let err = results.into_iter().last().unwrap().unwrap_err();
        assert_eq!(*err, ErrorKind::Transport("connection reset".to_string()));
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let transport = Arc::new(MockTransport::default().with_response("/v1.0/things", 403, br#"{"error":{}}"#.to_vec()));
        let results: Vec<Result<Item>> = paginate(transport, CancellationToken::new(), request()).collect().await;
        assert_eq!(results.len(), 1);
        assert_eq!(**results[0].as_ref().unwrap_err(), ErrorKind::Status(403));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let transport = Arc::new(MockTransport::default());
        let results: Vec<Result<Item>> = paginate(transport, CancellationToken::new(), request()).collect().await;
        assert_eq!(results.len(), 1);
        assert!(matches!(**results[0].as_ref().unwrap_err(), ErrorKind::Status(404)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let transport = Arc::new(MockTransport::default().with_response("/v1.0/things", 200, b"<html>".to_vec()));
        let results: Vec<Result<Item>> = paginate(transport, CancellationToken::new(), request()).collect().await;
        assert_eq!(results.len(), 1);
        assert!(matches!(**results[0].as_ref().unwrap_err(), ErrorKind::InvalidBody));
    }

    #[tokio::test]
    async fn test_bad_item_is_skipped_not_fatal() {
        let transport = Arc::new(MockTransport::default().with_page(
            "/v1.0/things",
            page([json!({"id": "a"}), json!({"name": "no id"}), json!({"id": "c"})], None),
        ));
        let results: Vec<Result<Item>> = paginate(transport, CancellationToken::new(), request()).collect().await;
        assert_eq!(ids(&results), vec![Some("a"), None, Some("c")]);
        assert!(matches!(**results[1].as_ref().unwrap_err(), ErrorKind::InvalidItem));
    }

    #[tokio::test]
    async fn test_empty_cursor_ends_listing() {
        let transport = Arc::new(MockTransport::default().with_page("/v1.0/things", page([json!({"id": "a"})], Some(""))));
        let results: Vec<Result<Item>> =
            paginate(transport.clone(), CancellationToken::new(), request()).collect().await;
        assert_eq!(results.len(), 1);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_makes_no_request() {
        let transport = Arc::new(MockTransport::default().with_page("/v1.0/things", page([json!({"id": "a"})], None)));
        let token = CancellationToken::new();
        token.cancel();
        let results: Vec<Result<Item>> = paginate(transport.clone(), token, request()).collect().await;
        assert!(results.is_empty());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_stops_between_items() {
        let transport = Arc::new(
            MockTransport::default()
                .with_page("/v1.0/things", page([json!({"id": "a"}), json!({"id": "b"})], Some("https://next/2")))
                .with_page("https://next/2", page([json!({"id": "c"})], None)),
        );
        let token = CancellationToken::new();
        let mut stream = paginate::<Item>(transport.clone(), token.clone(), request());
        assert_eq!(stream.next().await.unwrap().unwrap().id, "a");
        token.cancel();
        assert!(stream.next().await.is_none());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_abandons_request_in_flight() {
        let transport = Arc::new(MockTransport::default().with_pending("/v1.0/things"));
        let token = CancellationToken::new();
        let mut stream = paginate::<Item>(transport, token.clone(), request());
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });
        let next = tokio::time::timeout(Duration::from_secs(5), stream.next()).await;
        assert!(matches!(next, Ok(None)));
    }
}
