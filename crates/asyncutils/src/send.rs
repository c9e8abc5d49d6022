use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;

/// Deliver `value` into `tx`, waiting for capacity if the channel is full.
///
/// Returns `false` when `token` is cancelled before the value could be
/// delivered, or when the receiving half has been dropped. Either way the
/// caller should stop producing: treat `false` as "abort this loop now".
pub async fn send<T>(token: &CancellationToken, tx: &Sender<T>, value: T) -> bool {
    tokio::select! {
        biased;
        () = token.cancelled() => false,
        sent = tx.send(value) => sent.is_ok(),
    }
}
