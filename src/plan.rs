//! Schema-driven planning.
//!
//! The Infinity API has no dry-run mode, so plans are computed locally from
//! the resource schema: defaults fill in unset optional attributes, values
//! the server computed are carried over from prior state, and every
//! configurable attribute whose value differs becomes an [`AttributeChange`].
//! A change to a `force_new` attribute turns the plan into a replacement.

use serde_json::{Map, Value};

use crate::schema::{Attribute, AttributeType, BlockNestingMode, Schema};
use crate::types::{AttributeChange, PlanResult};

/// Plan the transition from `prior` to `proposed`.
///
/// * No prior state plans a create: every configured attribute is an
///   `added` change.
/// * A null `proposed` plans a destroy: every known attribute is a
///   `removed` change and the planned state is null.
/// * On replacement, computed-only attributes are cleared in the planned
///   state since the server will assign new ones.
pub fn plan_resource(schema: &Schema, prior: Option<&Value>, proposed: &Value) -> PlanResult {
    let prior = prior.filter(|p| !p.is_null());

    if proposed.is_null() {
        return plan_destroy(schema, prior);
    }

    let mut planned = match proposed {
        Value::Object(map) => map.clone(),
        other => return PlanResult::no_change(other.clone()),
    };
    let prior_obj = prior.and_then(Value::as_object);

    let mut names: Vec<&String> = schema.block.attributes.keys().collect();
    names.sort();

    let mut changes = Vec::new();
    let mut requires_replace = false;

    for name in names {
        let attr = &schema.block.attributes[name];
        fill_unset(&mut planned, name, attr, prior_obj);

        if attr.is_computed_only() {
            continue;
        }

        let before = prior_obj.and_then(|p| known(p.get(name)));
        let after = known(planned.get(name));
        let unordered = matches!(attr.attr_type, AttributeType::Set(_));
        if let Some(change) = diff(name, before, after, unordered) {
            if prior_obj.is_some() && attr.force_new {
                requires_replace = true;
            }
            changes.push(change);
        }
    }

    let mut block_names: Vec<&String> = schema.block.blocks.keys().collect();
    block_names.sort();
    for name in block_names {
        let before = prior_obj.and_then(|p| known(p.get(name)));
        let after = known(planned.get(name));
        let unordered = schema.block.blocks[name].nesting_mode == BlockNestingMode::Set;
        if let Some(change) = diff(name, before, after, unordered) {
            changes.push(change);
        }
    }

    if requires_replace {
        for (name, attr) in &schema.block.attributes {
            if attr.is_computed_only() {
                planned.insert(name.clone(), Value::Null);
            }
        }
    }

    PlanResult::with_changes(Value::Object(planned), changes, requires_replace)
}

fn plan_destroy(schema: &Schema, prior: Option<&Value>) -> PlanResult {
    let Some(prior_obj) = prior.and_then(Value::as_object) else {
        return PlanResult::no_change(Value::Null);
    };

    let mut names: Vec<&String> = schema.block.attributes.keys().collect();
    names.sort();
    let changes = names
        .into_iter()
        .filter_map(|name| {
            known(prior_obj.get(name)).map(|v| AttributeChange::removed(name.clone(), v.clone()))
        })
        .collect();

    PlanResult::with_changes(Value::Null, changes, false)
}

/// Give an unset attribute its default, or its prior value when the server
/// computes it.
fn fill_unset(
    planned: &mut Map<String, Value>,
    name: &str,
    attr: &Attribute,
    prior: Option<&Map<String, Value>>,
) {
    if known(planned.get(name)).is_some() {
        return;
    }
    if let Some(default) = &attr.default {
        planned.insert(name.to_string(), default.clone());
    } else if attr.flags.computed {
        if let Some(value) = prior.and_then(|p| known(p.get(name))) {
            planned.insert(name.to_string(), value.clone());
        }
    }
}

fn known(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn diff(
    name: &str,
    before: Option<&Value>,
    after: Option<&Value>,
    unordered: bool,
) -> Option<AttributeChange> {
    match (before, after) {
        (None, None) => None,
        (Some(b), Some(a)) if b == a => None,
        (Some(b), Some(a)) if unordered && same_members(b, a) => None,
        (None, Some(a)) => Some(AttributeChange::added(name, a.clone())),
        (Some(b), None) => Some(AttributeChange::removed(name, b.clone())),
        (Some(b), Some(a)) => Some(AttributeChange::modified(name, b.clone(), a.clone())),
    }
}

/// Set equality for arrays, counting duplicates.
fn same_members(before: &Value, after: &Value) -> bool {
    let (Value::Array(before), Value::Array(after)) = (before, after) else {
        return false;
    };
    if before.len() != after.len() {
        return false;
    }
    let mut unmatched: Vec<&Value> = after.iter().collect();
    before.iter().all(|item| {
        match unmatched.iter().position(|candidate| *candidate == item) {
            Some(idx) => {
                unmatched.swap_remove(idx);
                true
            }
            None => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AttributeFlags;
    use serde_json::json;

    fn syslog_schema() -> Schema {
        Schema::v0()
            .with_attribute("id", Attribute::computed_string())
            .with_attribute("resource_id", Attribute::computed_int64())
            .with_attribute("address", Attribute::required_string())
            .with_attribute("port", Attribute::optional_int64().with_default(json!(514)))
            .with_attribute("description", Attribute::optional_computed_string())
            .with_attribute("password", Attribute::optional_string().sensitive())
    }

    fn licence_schema() -> Schema {
        Schema::v0()
            .with_attribute("fingerprint", Attribute::computed_string())
            .with_attribute("entitlement_id", Attribute::required_string().with_force_new())
            .with_attribute("offline_mode", Attribute::optional_bool().with_default(json!(false)))
    }

    #[test]
    fn test_create_applies_defaults_and_adds_configured() {
        let plan = plan_resource(&syslog_schema(), None, &json!({"address": "10.0.0.5"}));

        assert_eq!(plan.planned_state["port"], 514);
        assert!(plan.planned_state["id"].is_null());
        assert!(!plan.requires_replace);

        let paths: Vec<_> = plan.changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["address", "port"]);
        assert!(plan.changes.iter().all(|c| c.before.is_none()));
    }

    #[test]
    fn test_update_carries_computed_from_prior() {
        let prior = json!({
            "id": "/api/admin/configuration/v1/syslog_server/3/",
            "resource_id": 3,
            "address": "10.0.0.5",
            "port": 514,
            "description": "",
        });
        let proposed = json!({"address": "10.0.0.5"});

        let plan = plan_resource(&syslog_schema(), Some(&prior), &proposed);

        assert!(!plan.has_changes(), "{:?}", plan.changes);
        assert_eq!(plan.planned_state["id"], prior["id"]);
        assert_eq!(plan.planned_state["resource_id"], 3);
        assert_eq!(plan.planned_state["description"], "");
    }

    #[test]
    fn test_update_records_modified_attribute() {
        let prior = json!({"id": "x", "resource_id": 1, "address": "1.1.1.1", "port": 514});
        let proposed = json!({"address": "8.8.8.8", "port": 6514});

        let plan = plan_resource(&syslog_schema(), Some(&prior), &proposed);

        assert_eq!(
            plan.changes,
            vec![
                AttributeChange::modified("address", json!("1.1.1.1"), json!("8.8.8.8")),
                AttributeChange::modified("port", json!(514), json!(6514)),
            ]
        );
        assert!(!plan.requires_replace);
        assert_eq!(plan.planned_state["id"], "x");
    }

    #[test]
    fn test_removing_optional_value_is_a_change() {
        let prior = json!({"address": "1.1.1.1", "port": 514, "password": "old"});
        let plan = plan_resource(&syslog_schema(), Some(&prior), &json!({"address": "1.1.1.1"}));

        assert_eq!(
            plan.changes,
            vec![AttributeChange::removed("password", json!("old"))]
        );
    }

    #[test]
    fn test_force_new_change_requires_replace() {
        let prior = json!({"fingerprint": "ABC", "entitlement_id": "e-1", "offline_mode": false});
        let plan = plan_resource(&licence_schema(), Some(&prior), &json!({"entitlement_id": "e-2"}));

        assert!(plan.requires_replace);
        assert!(plan.planned_state["fingerprint"].is_null());
    }

    #[test]
    fn test_force_new_does_not_replace_on_create() {
        let plan = plan_resource(&licence_schema(), None, &json!({"entitlement_id": "e-1"}));
        assert!(!plan.requires_replace);
        assert_eq!(plan.planned_state["offline_mode"], false);
    }

    fn location_schema() -> Schema {
        Schema::v0()
            .with_attribute("name", Attribute::required_string())
            .with_attribute("dns_servers", Attribute::optional_computed_string_set())
            .with_attribute(
                "ports",
                Attribute::new(
                    AttributeType::list(AttributeType::Int64),
                    AttributeFlags::optional(),
                ),
            )
    }

    #[test]
    fn test_reordered_set_is_not_a_change() {
        let prior = json!({"name": "London", "dns_servers": ["/a/", "/b/"]});
        let proposed = json!({"name": "London", "dns_servers": ["/b/", "/a/"]});

        let plan = plan_resource(&location_schema(), Some(&prior), &proposed);

        assert!(!plan.has_changes(), "{:?}", plan.changes);
    }

    #[test]
    fn test_set_membership_change_is_a_change() {
        let prior = json!({"name": "London", "dns_servers": ["/a/", "/a/"]});
        let proposed = json!({"name": "London", "dns_servers": ["/a/", "/b/"]});

        let plan = plan_resource(&location_schema(), Some(&prior), &proposed);

        assert_eq!(
            plan.changes,
            vec![AttributeChange::modified(
                "dns_servers",
                json!(["/a/", "/a/"]),
                json!(["/a/", "/b/"])
            )]
        );
    }

    #[test]
    fn test_reordered_list_is_a_change() {
        let prior = json!({"name": "London", "ports": [5060, 5061]});
        let proposed = json!({"name": "London", "ports": [5061, 5060]});

        let plan = plan_resource(&location_schema(), Some(&prior), &proposed);

        assert_eq!(plan.changes.len(), 1);
        assert_eq!(plan.changes[0].path, "ports");
    }

    #[test]
    fn test_destroy() {
        let prior = json!({"id": "x", "address": "1.1.1.1", "port": 514});
        let plan = plan_resource(&syslog_schema(), Some(&prior), &Value::Null);

        assert!(plan.planned_state.is_null());
        let paths: Vec<_> = plan.changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["address", "id", "port"]);
        assert!(plan.changes.iter().all(|c| c.after.is_none()));

        let nothing = plan_resource(&syslog_schema(), None, &Value::Null);
        assert!(!nothing.has_changes());
    }
}
