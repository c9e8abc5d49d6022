use crate::azure::{Resource, Tenant};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A tenant-scoped object together with the tenant it was discovered in.
///
/// The tenant fields are written alongside the object's own fields (not
/// nested), which is the shape downstream ingestion expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenanted<T> {
    #[serde(flatten)]
    pub inner: T,
    pub tenant_id: String,
    pub tenant_name: String,
}
impl<T> Tenanted<T> {
    pub fn new(inner: T, tenant: &Tenant) -> Self {
        Self {
            inner,
            tenant_id: tenant.tenant_id.clone(),
            tenant_name: tenant.display_name.clone(),
        }
    }
}
impl<T> Deref for Tenanted<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// A resource discovered by listing one subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InSubscription<T> {
    #[serde(flatten)]
    pub inner: T,
    pub subscription_id: String,
}
impl<T> InSubscription<T> {
    pub fn new(inner: T, subscription_id: impl Into<String>) -> Self {
        Self { inner, subscription_id: subscription_id.into() }
    }
}
impl<T> Deref for InSubscription<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// A resource located by subscription and resource group, in the tenant it
/// was discovered in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InResourceGroup<T> {
    #[serde(flatten)]
    pub inner: T,
    /// `/subscriptions/{subscriptionId}`.
    pub subscription_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group_id: Option<String>,
    pub tenant_id: String,
}
impl<T: Resource> InResourceGroup<T> {
    pub fn new(inner: T, subscription_id: &str, tenant: &Tenant) -> Self {
        let resource_group_id = inner.resource_group_id().map(str::to_string);
        Self {
            inner,
            subscription_id: format!("/subscriptions/{subscription_id}"),
            resource_group_id,
            tenant_id: tenant.tenant_id.clone(),
        }
    }
}
impl<T> Deref for InResourceGroup<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
