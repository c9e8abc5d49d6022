use futures::Stream;
use futures::stream::FusedStream;
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

pin_project! {
    /// Stream returned by [`or_done`].
    #[must_use = "streams do nothing unless polled"]
    pub struct OrDone<S> {
        #[pin]
        inner: S,
        #[pin]
        cancelled: WaitForCancellationFutureOwned,
        done: bool,
    }
}

/// Relay every item of `inner` until it is exhausted or `token` is cancelled.
///
/// Cancellation is checked before the inner stream on every poll, so items
/// already buffered upstream are *not* drained once the token fires. The
/// inner stream is simply dropped along with the adapter; any producer
/// feeding it notices through its own channel or token.
pub fn or_done<S: Stream>(token: &CancellationToken, inner: S) -> OrDone<S> {
    OrDone {
        inner,
        cancelled: token.clone().cancelled_owned(),
        done: false,
    }
}

impl<S: Stream> Stream for OrDone<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.done {
            return Poll::Ready(None);
        }
        if this.cancelled.poll(cx).is_ready() {
            *this.done = true;
            return Poll::Ready(None);
        }
        match this.inner.poll_next(cx) {
            Poll::Ready(None) => {
                *this.done = true;
                Poll::Ready(None)
            },
            other => other,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done { (0, Some(0)) } else { (0, self.inner.size_hint().1) }
    }
}

impl<S: Stream> FusedStream for OrDone<S> {
    fn is_terminated(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::time::Duration;

    #[tokio::test]
    async fn test_relays_everything_without_cancellation() {
        let token = CancellationToken::new();
        let items: Vec<_> = or_done(&token, futures::stream::iter(1..=5)).collect().await;
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_buffered_items_are_not_drained_after_cancel() {
        let token = CancellationToken::new();
        let stream = or_done(&token, futures::stream::iter(1..=5));
        futures::pin_mut!(stream);
        assert_eq!(stream.next().await, Some(1));
        token.cancel();
        assert_eq!(stream.next().await, None);
        assert!(stream.is_terminated());
    }

    #[tokio::test]
    async fn test_pending_input_ends_when_cancelled() {
        let token = CancellationToken::new();
        let stream = or_done(&token, futures::stream::pending::<u32>());
        futures::pin_mut!(stream);
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });
        let next = tokio::time::timeout(Duration::from_secs(5), stream.next()).await;
        assert_eq!(next.ok(), Some(None));
    }

    #[tokio::test]
    async fn test_already_cancelled_yields_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let items: Vec<_> = or_done(&token, futures::stream::iter(1..=3)).collect().await;
        assert!(items.is_empty());
    }
}
