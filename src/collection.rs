use crate::error::{ErrorKind, Result};
use cirrus_collect::{Context, EnvelopeStream, directory, resource};
use derive_more::Display;

/// Every pipeline that can be run, wired stage to stage.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Collection {
    #[display("groups365")]
    Groups365,
    #[display("group365-members")]
    Group365Members,
    #[display("group365-owners")]
    Group365Owners,
    /// Registered domains, listed as Office 365 groups.
    #[display("o365-groups")]
    O365Groups,
    #[display("users")]
    Users,
    #[display("users-interactions")]
    UserInteractions,
    /// The groups that the members of one group belong to.
    #[display("groups-of-member")]
    GroupsOfMember { group_id: String },
    #[display("subscriptions")]
    Subscriptions,
    #[display("network-security-groups")]
    NetworkSecurityGroups,
    #[display("vm-scale-sets")]
    VmScaleSets,
}

impl Collection {
    pub const NAMES: [&'static str; 10] = [
        "groups365",
        "group365-members",
        "group365-owners",
        "o365-groups",
        "users",
        "users-interactions",
        "groups-of-member",
        "subscriptions",
        "network-security-groups",
        "vm-scale-sets",
    ];

    /// Look a collection up by name. `group_id` is only used (and then
    /// required) by `groups-of-member`.
    pub fn from_name(name: &str, group_id: Option<&str>) -> Result<Self> {
        Ok(match name {
            "groups365" => Self::Groups365,
            "group365-members" => Self::Group365Members,
            "group365-owners" => Self::Group365Owners,
            "o365-groups" => Self::O365Groups,
            "users" => Self::Users,
            "users-interactions" => Self::UserInteractions,
            "groups-of-member" => match group_id.filter(|id| !id.is_empty()) {
                Some(group_id) => Self::GroupsOfMember { group_id: group_id.to_string() },
                None => exn::bail!(ErrorKind::MissingArgument("group id")),
            },
            "subscriptions" => Self::Subscriptions,
            "network-security-groups" => Self::NetworkSecurityGroups,
            "vm-scale-sets" => Self::VmScaleSets,
            other => exn::bail!(ErrorKind::UnknownCollection(other.to_string())),
        })
    }

    /// Start every stage of the pipeline, returning its final output.
    pub fn start(&self, ctx: &Context) -> EnvelopeStream {
        match self {
            Self::Groups365 => directory::groups365(ctx),
            Self::Group365Members => directory::group365_members(ctx, directory::groups365(ctx)),
            Self::Group365Owners => directory::group365_owners(ctx, directory::groups365(ctx)),
            Self::O365Groups => directory::o365_groups(ctx),
            Self::Users => directory::users(ctx),
            Self::UserInteractions => directory::user_interactions(ctx, directory::users(ctx)),
            Self::GroupsOfMember { group_id } => {
                directory::groups_of_member(ctx, directory::group_members(ctx, group_id))
            },
            Self::Subscriptions => resource::subscriptions(ctx),
            Self::NetworkSecurityGroups => resource::network_security_groups(ctx, resource::subscriptions(ctx)),
            Self::VmScaleSets => resource::vm_scale_sets(ctx, resource::subscriptions(ctx)),
        }
    }
}
