//! Paginated listings over the directory and resource-management APIs.
//!
//! The network itself lives behind the [`Transport`] trait: authentication,
//! retries and rate limiting are the transport's problem. This crate turns
//! cursor-paginated responses into plain streams of `Result<T>` items with
//! [`paginate`], and [`Client`] wires one such stream per API relationship.

mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod paginate;
pub mod query;
mod transport;

pub use crate::client::{Client, DEFAULT_PAGE_SIZE};
pub use crate::paginate::{ResultStream, paginate};
pub use crate::transport::{Request, Response, Transport};
use std::sync::Arc;

pub type TransportHandle = Arc<dyn Transport + Send + Sync>;
