//! Cloud estate enumeration.
//!
//! Crawls a tenant's directory and resource-management APIs and emits every
//! object found as a tagged [`Envelope`]. Pick a [`Collection`], build a
//! [`Context`] from a [`Config`] and a [`Client`], then [`run`] it into a
//! [`Sink`]:
//!
//! ```no_run
//! # async fn example(client: cirrus::Client) -> cirrus::error::Result<()> {
//! use cirrus::{Collection, Config, Context, JsonLinesSink, run};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = Config::default();
//! let ctx = Context::new(client, CancellationToken::new(), &config);
//! let mut sink = JsonLinesSink::new(tokio::io::stdout());
//! let summary = run(&ctx, &Collection::from_name("group365-members", None)?, &mut sink).await?;
//! eprintln!("{} objects collected", summary.total());
//! # Ok(())
//! # }
//! ```
//!
//! The network lives behind the [`Transport`] trait: authentication, retries
//! and rate limiting are the transport's business.

mod collection;
pub mod error;
mod output;
mod run;

pub use crate::collection::Collection;
pub use crate::output::{JsonLinesSink, Sink};
pub use crate::run::{Summary, cancel_on_interrupt, run};
pub use cirrus_client::{Client, Transport, TransportHandle};
pub use cirrus_collect::{Context, EnvelopeStream};
pub use cirrus_config::Config;
pub use cirrus_models::{Envelope, Kind};
