//! Per-parent aggregates.
//!
//! Some relationships are emitted as one record per parent ("every member of
//! group G") rather than one record per child. The child payloads are kept as
//! raw JSON because their shape depends on the directory object type (users,
//! service principals, devices, ...) and on the `$select` list.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Serialize a raw JSON payload with empty top-level fields dropped.
///
/// `null`, `""`, `[]` and `{}` carry no information for ingestion and the
/// directory APIs return a lot of them.
fn omit_empty<S: Serializer>(value: &Value, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Value::Object(map) => serializer.collect_map(map.iter().filter(|(_, v)| !is_empty(v))),
        other => other.serialize(serializer),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group365Member {
    #[serde(serialize_with = "omit_empty")]
    pub member: Value,
    pub group_id: String,
}

/// Every member of one Microsoft 365 group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group365Members {
    pub group_id: String,
    pub members: Vec<Group365Member>,
}
impl Group365Members {
    pub fn new(group_id: impl Into<String>) -> Self {
        Self { group_id: group_id.into(), members: Vec::new() }
    }

    pub fn push(&mut self, member: Value) {
        self.members.push(Group365Member { member, group_id: self.group_id.clone() });
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group365Owner {
    #[serde(serialize_with = "omit_empty")]
    pub owner: Value,
    pub group_id: String,
}

/// Every owner of one Microsoft 365 group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group365Owners {
    pub group_id: String,
    pub owners: Vec<Group365Owner>,
}
impl Group365Owners {
    pub fn new(group_id: impl Into<String>) -> Self {
        Self { group_id: group_id.into(), owners: Vec::new() }
    }

    pub fn push(&mut self, owner: Value) {
        self.owners.push(Group365Owner { owner, group_id: self.group_id.clone() });
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInteraction {
    #[serde(serialize_with = "omit_empty")]
    pub user: Value,
    pub user_id: String,
}

/// The people one user interacts with the most.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInteractions {
    pub user_id: String,
    pub users: Vec<UserInteraction>,
}
impl UserInteractions {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), users: Vec::new() }
    }

    pub fn push(&mut self, user: Value) {
        self.users.push(UserInteraction { user, user_id: self.user_id.clone() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(null), true)]
    #[case(json!(""), true)]
    #[case(json!([]), true)]
    #[case(json!({}), true)]
    #[case(json!(false), false)]
    #[case(json!(0), false)]
    #[case(json!("x"), false)]
    #[case(json!([null]), false)]
    fn test_is_empty(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_empty(&value), expected);
    }

    #[test]
    fn test_member_payload_omits_empty_fields() {
        let mut members = Group365Members::new("g-1");
        members.push(json!({
            "id": "u-1",
            "displayName": "Ada",
            "mail": null,
            "businessPhones": [],
            "jobTitle": "",
            "accountEnabled": false,
        }));
        assert_eq!(
            serde_json::to_value(&members).unwrap(),
            json!({
                "groupId": "g-1",
                "members": [{
                    "groupId": "g-1",
                    "member": {"id": "u-1", "displayName": "Ada", "accountEnabled": false},
                }],
            })
        );
    }

    #[test]
    fn test_push_stamps_parent_id() {
        let mut interactions = UserInteractions::new("u-1");
        interactions.push(json!({"id": "u-2"}));
        interactions.push(json!({"id": "u-3"}));
        assert_eq!(interactions.users.len(), 2);
        assert!(interactions.users.iter().all(|u| u.user_id == "u-1"));
    }
}
