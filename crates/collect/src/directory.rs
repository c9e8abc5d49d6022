//! Directory stages: groups, users, and the relationships between them.

use crate::context::Context;
use crate::ledger::Ledger;
use crate::stage::{EnvelopeStream, pool, root};
use cirrus_client::query::GraphParams;
use cirrus_models::{Group365Members, Group365Owners, Kind, Tenanted, UserInteractions};
use std::sync::Arc;

/// Only Microsoft 365 groups carry `Unified` in their group types.
const UNIFIED_GROUPS: &str = "groupTypes/any(g:g eq 'Unified')";

/// Every Microsoft 365 group in the tenant.
pub fn groups365(ctx: &Context) -> EnvelopeStream {
    let tenant = ctx.client.tenant().clone();
    let listing = ctx.client.list_groups365(&ctx.token, GraphParams::default().with_filter(UNIFIED_GROUPS));
    root(ctx, "groups365", listing, move |group| Tenanted::new(group, &tenant).into())
}

/// Fields requested for every Office 365 group.
const O365_GROUP_FIELDS: [&str; 11] = [
    "authenticationType",
    "availabilityStatus",
    "id",
    "isAdminManaged",
    "isDefault",
    "isInitial",
    "isRoot",
    "isVerified",
    "passwordValidityPeriodInDays",
    "passwordNotificationWindowInDays",
    "state",
];

/// Every Office 365 group (registered domain) in the tenant.
pub fn o365_groups(ctx: &Context) -> EnvelopeStream {
    let tenant = ctx.client.tenant().clone();
    let listing = ctx.client.list_o365_groups(&ctx.token, GraphParams::default().with_select(O365_GROUP_FIELDS));
    root(ctx, "o365_groups", listing, move |group| Tenanted::new(group, &tenant).into())
}

/// Every user in the tenant.
pub fn users(ctx: &Context) -> EnvelopeStream {
    let tenant = ctx.client.tenant().clone();
    let listing = ctx.client.list_users(&ctx.token, GraphParams::default());
    root(ctx, "users", listing, move |user| Tenanted::new(user, &tenant).into())
}

/// The user members of one group.
pub fn group_members(ctx: &Context, group_id: &str) -> EnvelopeStream {
    let tenant = ctx.client.tenant().clone();
    let listing = ctx.client.list_group_members(&ctx.token, group_id, GraphParams::default());
    root(ctx, "group_members", listing, move |user| Tenanted::new(user, &tenant).into())
}

/// One [`Group365Members`] aggregate per Microsoft 365 group.
pub fn group365_members(ctx: &Context, groups: EnvelopeStream) -> EnvelopeStream {
    let params = GraphParams::default().with_select(&ctx.select.group365_members);
    pool(ctx, "group365_members", Kind::Group365, groups, move |ctx, group_id, output| {
        let listing = ctx.client.list_group365_members(&ctx.token, &group_id, params.clone());
        async move {
            let members = Group365Members::new(group_id.as_str());
            output.aggregate(&group_id, listing, members, Group365Members::push).await
        }
    })
}

/// One [`Group365Owners`] aggregate per Microsoft 365 group.
pub fn group365_owners(ctx: &Context, groups: EnvelopeStream) -> EnvelopeStream {
    pool(ctx, "group365_owners", Kind::Group365, groups, |ctx, group_id, output| {
        let listing = ctx.client.list_group365_owners(&ctx.token, &group_id, GraphParams::default());
        async move {
            let owners = Group365Owners::new(group_id.as_str());
            output.aggregate(&group_id, listing, owners, Group365Owners::push).await
        }
    })
}

/// One [`UserInteractions`] aggregate per user.
pub fn user_interactions(ctx: &Context, users: EnvelopeStream) -> EnvelopeStream {
    let params = GraphParams::default().with_select(&ctx.select.user_interactions);
    pool(ctx, "user_interactions", Kind::User, users, move |ctx, user_id, output| {
        let listing = ctx.client.list_user_interactions(&ctx.token, &user_id, params.clone());
        async move {
            let interactions = UserInteractions::new(user_id.as_str());
            output.aggregate(&user_id, listing, interactions, UserInteractions::push).await
        }
    })
}

/// Every group that at least one of `users` is a direct member of.
///
/// Users commonly share groups; each group is emitted once per invocation no
/// matter how many users list it.
pub fn groups_of_member(ctx: &Context, users: EnvelopeStream) -> EnvelopeStream {
    let params = GraphParams::default().with_select(&ctx.select.groups_of_member);
    let ledger = Arc::new(Ledger::default());
    pool(ctx, "groups_of_member", Kind::User, users, move |ctx, user_id, output| {
        let listing = ctx.client.list_groups_of_member(&ctx.token, &user_id, params.clone());
        let (ledger, tenant) = (ledger.clone(), ctx.client.tenant().clone());
        async move {
            output.each(Some(&user_id), listing, Some(&ledger), |group| Tenanted::new(group, &tenant).into()).await
        }
    })
}
