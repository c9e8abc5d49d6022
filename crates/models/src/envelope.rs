use crate::azure::{Group, Group365, NetworkSecurityGroup, O365Group, Subscription, User, VirtualMachineScaleSet};
use crate::{Group365Members, Group365Owners, InResourceGroup, InSubscription, Kind, Tenanted, UserInteractions};
use derive_more::From;
use serde::{Deserialize, Serialize};

/// A discovered object on its way out of the pipeline.
///
/// The variant *is* the kind: every consumer matches on the variant (or on
/// [`kind()`](Self::kind)) and gets a statically-typed payload, there is no
/// "any" payload to downcast. On the wire it is written as
/// `{"kind": "AZUser", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, From, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum Envelope {
    #[serde(rename = "AZGroup")]
    Group(Tenanted<Group>),
    #[serde(rename = "AZGroup365")]
    Group365(Tenanted<Group365>),
    #[serde(rename = "AZGroup365Member")]
    Group365Members(Group365Members),
    #[serde(rename = "AZGroup365Owner")]
    Group365Owners(Group365Owners),
    #[serde(rename = "AZO365Group")]
    O365Group(Tenanted<O365Group>),
    #[serde(rename = "AZUser")]
    User(Tenanted<User>),
    #[serde(rename = "AZUserInteraction")]
    UserInteractions(UserInteractions),
    #[serde(rename = "AZSubscription")]
    Subscription(Tenanted<Subscription>),
    #[serde(rename = "AZNetworkSecurityGroup")]
    NetworkSecurityGroup(InSubscription<NetworkSecurityGroup>),
    #[serde(rename = "AZVMScaleSet")]
    VmScaleSet(InResourceGroup<VirtualMachineScaleSet>),
}

impl Envelope {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Group(_) => Kind::Group,
            Self::Group365(_) => Kind::Group365,
            Self::Group365Members(_) => Kind::Group365Member,
            Self::Group365Owners(_) => Kind::Group365Owner,
            Self::O365Group(_) => Kind::O365Group,
            Self::User(_) => Kind::User,
            Self::UserInteractions(_) => Kind::UserInteraction,
            Self::Subscription(_) => Kind::Subscription,
            Self::NetworkSecurityGroup(_) => Kind::NetworkSecurityGroup,
            Self::VmScaleSet(_) => Kind::VmScaleSet,
        }
    }

    /// Identifier of the object this envelope describes. For aggregates,
    /// that's the parent the children were gathered for.
    pub fn id(&self) -> &str {
        match self {
            Self::Group(g) => &g.id,
            Self::Group365(g) => &g.id,
            Self::Group365Members(m) => &m.group_id,
            Self::Group365Owners(o) => &o.group_id,
            Self::O365Group(g) => &g.id,
            Self::User(u) => &u.id,
            Self::UserInteractions(i) => &i.user_id,
            Self::Subscription(s) => &s.subscription_id,
            Self::NetworkSecurityGroup(n) => &n.id,
            Self::VmScaleSet(v) => &v.id,
        }
    }
}
