use crate::or_done;
use futures::future::select_all;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio_util::sync::CancellationToken;

/// Capacity of each sibling channel. A single slot means the distributor is
/// never more than one element ahead of any worker.
const SIBLING_CAPACITY: usize = 1;

/// Split `input` into `n` sibling channels (at least one).
///
/// A background task reads `input` and hands every element to exactly one
/// sibling: whichever has free capacity first. Ties are broken by rotating
/// the starting sibling after each delivery, so a sibling with room is never
/// starved while others are busy. Elements are never duplicated; on
/// cancellation the element in hand is dropped and every sibling closes.
///
/// A sibling whose receiver is dropped is removed from rotation and the
/// element it was offered goes to another sibling instead. Once every
/// receiver is gone the distributor stops reading `input`.
///
/// Must be called from within a Tokio runtime.
pub fn demux<S>(token: &CancellationToken, input: S, n: usize) -> Vec<Receiver<S::Item>>
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
{
    let (senders, receivers): (Vec<_>, Vec<_>) = (0..n.max(1)).map(|_| mpsc::channel(SIBLING_CAPACITY)).unzip();
    tokio::spawn(distribute(token.clone(), input, senders));
    receivers
}

async fn distribute<S>(token: CancellationToken, input: S, mut senders: Vec<Sender<S::Item>>)
where
    S: Stream + Send,
    S::Item: Send,
{
    let input = or_done(&token, input);
    futures::pin_mut!(input);
    let mut next = 0usize;
    let mut delivered = 0u64;

    'items: while let Some(item) = input.next().await {
        loop {
            if senders.is_empty() {
                tracing::debug!(delivered, "All fan-out siblings closed; distributor stopping early");
                break 'items;
            }
            let start = next % senders.len();
            let reservations = (0..senders.len()).map(|offset| {
                let index = (start + offset) % senders.len();
                let sender = &senders[index];
                Box::pin(async move { (index, sender.reserve().await) })
            });
            let closed = tokio::select! {
                biased;
                () = token.cancelled() => break 'items,
                ((index, reserved), _, _) = select_all(reservations) => match reserved {
                    Ok(permit) => {
                        permit.send(item);
                        delivered += 1;
                        next = index + 1;
                        continue 'items;
                    },
                    Err(_) => index,
                },
            };
            senders.swap_remove(closed);
        }
    }
    tracing::trace!(delivered, "Fan-out distributor finished");
}
