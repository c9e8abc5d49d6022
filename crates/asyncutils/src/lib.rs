//! Cancellable stream plumbing shared by every collection stage.
//!
//! Three small operators, all of which take the run's [`CancellationToken`]
//! so that nothing built on top of them can block forever once a run is
//! cancelled:
//!
//! - [`or_done`] relays a stream until it ends or the token fires, whichever
//!   comes first.
//! - [`send`] delivers one value into a bounded channel, giving up (and
//!   returning `false`) if the token fires first or the receiver is gone.
//! - [`demux`] splits one stream into `n` sibling channels so a pool of
//!   workers can consume it in parallel.

mod demux;
mod or_done;
mod send;

pub use self::demux::demux;
pub use self::or_done::{OrDone, or_done};
pub use self::send::send;
pub use tokio_util::sync::CancellationToken;
