use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Discriminator carried by every [`Envelope`](crate::Envelope).
///
/// The names are the node kinds downstream graph ingestion expects, which is
/// why they are spelled the way they are.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    #[display("AZGroup")]
    #[serde(rename = "AZGroup")]
    Group,
    #[display("AZGroup365")]
    #[serde(rename = "AZGroup365")]
    Group365,
    #[display("AZGroup365Member")]
    #[serde(rename = "AZGroup365Member")]
    Group365Member,
    #[display("AZGroup365Owner")]
    #[serde(rename = "AZGroup365Owner")]
    Group365Owner,
    #[display("AZO365Group")]
    #[serde(rename = "AZO365Group")]
    O365Group,
    #[display("AZUser")]
    #[serde(rename = "AZUser")]
    User,
    #[display("AZUserInteraction")]
    #[serde(rename = "AZUserInteraction")]
    UserInteraction,
    #[display("AZSubscription")]
    #[serde(rename = "AZSubscription")]
    Subscription,
    #[display("AZNetworkSecurityGroup")]
    #[serde(rename = "AZNetworkSecurityGroup")]
    NetworkSecurityGroup,
    #[display("AZVMScaleSet")]
    #[serde(rename = "AZVMScaleSet")]
    VmScaleSet,
}
