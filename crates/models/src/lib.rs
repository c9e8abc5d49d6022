//! Object shapes for everything the collector can discover.
//!
//! - [`azure`] holds the objects exactly as the directory and
//!   resource-management APIs return them.
//! - [`Tenanted`], [`InSubscription`] and [`InResourceGroup`] attach the
//!   context a record was discovered in (the tenant, the parent subscription,
//!   or both plus the resource group).
//! - [`Group365Members`], [`Group365Owners`] and [`UserInteractions`] are
//!   aggregates: every child of one parent, gathered into a single record.
//! - [`Envelope`] is the closed set of everything that leaves the pipeline,
//!   tagged with its [`Kind`].

mod aggregate;
pub mod azure;
mod envelope;
mod kind;
mod record;

pub use self::aggregate::{Group365Member, Group365Members, Group365Owner, Group365Owners};
pub use self::aggregate::{UserInteraction, UserInteractions};
pub use self::envelope::Envelope;
pub use self::kind::Kind;
pub use self::record::{InResourceGroup, InSubscription, Tenanted};
