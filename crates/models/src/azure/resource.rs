use super::Extra;
use serde::{Deserialize, Serialize};

/// A resource-management subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Fully-qualified resource id, e.g. `/subscriptions/{subscriptionId}`.
    pub id: String,
    pub subscription_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A virtual machine scale set. Its `properties` are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineScaleSet {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub properties: serde_json::Value,
    #[serde(flatten)]
    pub extra: Extra,
}

/// An object addressed by a fully-qualified resource id.
pub trait Resource {
    fn resource_id(&self) -> &str;

    /// The `/subscriptions/{id}/resourceGroups/{name}` prefix of the resource
    /// id, when the resource lives in a resource group.
    fn resource_group_id(&self) -> Option<&str> {
        resource_group_id(self.resource_id())
    }
}
impl Resource for VirtualMachineScaleSet {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

fn resource_group_id(resource_id: &str) -> Option<&str> {
    let segments: Vec<&str> = resource_id.splitn(6, '/').collect();
    match segments[..] {
        ["", subscriptions, subscription, resource_groups, group, ..]
            if subscriptions.eq_ignore_ascii_case("subscriptions")
                && resource_groups.eq_ignore_ascii_case("resourceGroups")
                && !subscription.is_empty()
                && !group.is_empty() =>
        {
            // Four separators join the five leading segments.
            let end = segments[..5].iter().map(|segment| segment.len()).sum::<usize>() + 4;
            Some(&resource_id[..end])
        }
        _ => None,
    }
}
