//! Concurrent collection stages.
//!
//! Every stage takes a [`Context`] and returns an [`EnvelopeStream`]. Root
//! stages ([`directory::groups365`], [`resource::subscriptions`], ...) drain
//! a single listing. Pool stages take their parents' stream as input and fan
//! out to `ctx.workers` workers, one child listing per parent:
//!
//! ```no_run
//! # use cirrus_collect::{Context, directory};
//! # fn example(ctx: &Context) {
//! let members = directory::group365_members(ctx, directory::groups365(ctx));
//! # }
//! ```
//!
//! Streams close on their own once their listings are exhausted, or soon
//! after `ctx.token` is cancelled.

mod context;
pub mod directory;
pub mod error;
mod fault;
mod ledger;
pub mod resource;
mod stage;

pub use crate::context::Context;
pub use crate::fault::{OnFault, spawn_guarded};
pub use crate::ledger::Ledger;
pub use crate::stage::EnvelopeStream;
