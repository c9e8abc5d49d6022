//! Objects as returned by the remote APIs.
//!
//! Only the fields the collector cares about are named; everything else the
//! API sends back is kept verbatim in `extra` so nothing is lost on the way to
//! ingestion. Which fields are present at all depends on the `$select` list a
//! listing was made with, hence almost everything is optional.

mod directory;
mod network;
mod resource;

pub use self::directory::{Group, Group365, O365Group, Tenant, User};
pub use self::network::{NetworkSecurityGroup, NetworkSecurityGroupProperties, ResourceReference};
pub use self::network::{SecurityRule, SecurityRuleProperties};
pub use self::resource::{Resource, Subscription, VirtualMachineScaleSet};

/// Fields returned by the API that have no dedicated struct field.
pub type Extra = serde_json::Map<String, serde_json::Value>;
