//! Resource-management stages: subscriptions and what lives in them.

use crate::context::Context;
use crate::stage::{EnvelopeStream, pool, root};
use cirrus_models::{InResourceGroup, InSubscription, Kind, Tenanted};

/// Every subscription the run's credentials can see.
pub fn subscriptions(ctx: &Context) -> EnvelopeStream {
    let tenant = ctx.client.tenant().clone();
    let listing = ctx.client.list_subscriptions(&ctx.token);
    root(ctx, "subscriptions", listing, move |subscription| Tenanted::new(subscription, &tenant).into())
}

/// Every network security group, in every subscription.
pub fn network_security_groups(ctx: &Context, subscriptions: EnvelopeStream) -> EnvelopeStream {
    pool(ctx, "network_security_groups", Kind::Subscription, subscriptions, |ctx, subscription_id, output| {
        let listing = ctx.client.list_network_security_groups(&ctx.token, &subscription_id);
        async move {
            let parent = subscription_id.as_str();
            output.each(Some(parent), listing, None, |nsg| InSubscription::new(nsg, parent).into()).await
        }
    })
}

/// Every virtual machine scale set, in every subscription. Each record is
/// placed in its resource group and tenant.
pub fn vm_scale_sets(ctx: &Context, subscriptions: EnvelopeStream) -> EnvelopeStream {
    pool(ctx, "vm_scale_sets", Kind::Subscription, subscriptions, |ctx, subscription_id, output| {
        let listing = ctx.client.list_vm_scale_sets(&ctx.token, &subscription_id);
        let tenant = ctx.client.tenant().clone();
        async move {
            let parent = subscription_id.as_str();
            output.each(Some(parent), listing, None, |vmss| InResourceGroup::new(vmss, parent, &tenant).into()).await
        }
    })
}
