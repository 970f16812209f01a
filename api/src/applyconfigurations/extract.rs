//! Rebuilds the apply configuration owned by a field manager from an object's
//! `metadata.managedFields`.
//!
//! Supports an extract, modify in place, apply workflow. An extracted
//! configuration holds fewer fields than the manager last applied when another
//! manager has since taken ownership of some of them.

use crate::applyconfigurations::operator::v1::KubeControllerManagerApplyConfiguration;
use crate::applyconfigurations::operator::v1alpha1::ImageContentSourcePolicyApplyConfiguration;
use crate::constants::{
    IMAGE_CONTENT_SOURCE_POLICY_API_VERSION, IMAGE_CONTENT_SOURCE_POLICY_KIND,
    KUBE_CONTROLLER_MANAGER_API_VERSION, KUBE_CONTROLLER_MANAGER_KIND, STATUS_SUBRESOURCE,
};
use crate::operator::v1::KubeControllerManager;
use crate::operator::v1alpha1::ImageContentSourcePolicy;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ManagedFieldsEntry;
use kube::{Resource, ResourceExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

const APPLY_OPERATION: &str = "Apply";
const FIELDS_V1: &str = "FieldsV1";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("object is missing a name")]
    MissingName,
    #[error("failed to convert object to JSON: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("managed fields of {manager:?} do not fit the apply configuration: {source}")]
    Deserialize {
        manager: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("managed fields of {manager:?} use unsupported fields type {fields_type:?}")]
    UnsupportedFieldsType {
        manager: String,
        fields_type: String,
    },
}

/// Extracts the `KubeControllerManager` fields applied by `field_manager`.
pub fn extract_kube_controller_manager(
    object: &KubeControllerManager,
    field_manager: &str,
) -> Result<KubeControllerManagerApplyConfiguration, ExtractError> {
    extract_kube_controller_manager_subresource(object, field_manager, None)
}

/// Same as [`extract_kube_controller_manager`] for the status subresource.
pub fn extract_kube_controller_manager_status(
    object: &KubeControllerManager,
    field_manager: &str,
) -> Result<KubeControllerManagerApplyConfiguration, ExtractError> {
    extract_kube_controller_manager_subresource(object, field_manager, Some(STATUS_SUBRESOURCE))
}

fn extract_kube_controller_manager_subresource(
    object: &KubeControllerManager,
    field_manager: &str,
    subresource: Option<&str>,
) -> Result<KubeControllerManagerApplyConfiguration, ExtractError> {
    let name = object.metadata.name.clone().ok_or(ExtractError::MissingName)?;
    let extracted: KubeControllerManagerApplyConfiguration =
        extract_into(object, field_manager, subresource)?;

    Ok(extracted
        .with_name(name)
        .with_kind(KUBE_CONTROLLER_MANAGER_KIND)
        .with_api_version(KUBE_CONTROLLER_MANAGER_API_VERSION))
}

/// Extracts the `ImageContentSourcePolicy` fields applied by `field_manager`.
pub fn extract_image_content_source_policy(
    object: &ImageContentSourcePolicy,
    field_manager: &str,
) -> Result<ImageContentSourcePolicyApplyConfiguration, ExtractError> {
    extract_image_content_source_policy_subresource(object, field_manager, None)
}

/// Same as [`extract_image_content_source_policy`] for the status subresource.
pub fn extract_image_content_source_policy_status(
    object: &ImageContentSourcePolicy,
    field_manager: &str,
) -> Result<ImageContentSourcePolicyApplyConfiguration, ExtractError> {
    extract_image_content_source_policy_subresource(
        object,
        field_manager,
        Some(STATUS_SUBRESOURCE),
    )
}

fn extract_image_content_source_policy_subresource(
    object: &ImageContentSourcePolicy,
    field_manager: &str,
    subresource: Option<&str>,
) -> Result<ImageContentSourcePolicyApplyConfiguration, ExtractError> {
    let name = object.metadata.name.clone().ok_or(ExtractError::MissingName)?;
    let extracted: ImageContentSourcePolicyApplyConfiguration =
        extract_into(object, field_manager, subresource)?;

    Ok(extracted
        .with_name(name)
        .with_kind(IMAGE_CONTENT_SOURCE_POLICY_KIND)
        .with_api_version(IMAGE_CONTENT_SOURCE_POLICY_API_VERSION))
}

/// Projects `object` onto the field set applied by `field_manager` and decodes it as `A`.
///
/// Only `Apply` entries of the given subresource count. The object itself is
/// the main resource when `subresource` is `None`.
pub fn extract_into<K, A>(
    object: &K,
    field_manager: &str,
    subresource: Option<&str>,
) -> Result<A, ExtractError>
where
    K: Resource + Serialize,
    A: DeserializeOwned + Default,
{
    let mut owned = Map::new();
    for entry in object
        .managed_fields()
        .iter()
        .filter(|entry| is_applied_by(entry, field_manager, subresource))
    {
        if let Some(fields_type) = entry.fields_type.as_deref().filter(|t| *t != FIELDS_V1) {
            return Err(ExtractError::UnsupportedFieldsType {
                manager: field_manager.to_string(),
                fields_type: fields_type.to_string(),
            });
        }
        if let Some(Value::Object(fields)) = entry.fields_v1.as_ref().map(|f| &f.0) {
            union_into(&mut owned, fields);
        }
    }

    if owned.is_empty() {
        return Ok(A::default());
    }

    let value = serde_json::to_value(object).map_err(ExtractError::Serialize)?;
    let mut projected = project(&value, &owned).unwrap_or(Value::Object(Map::new()));

    // identity is re-applied by the caller
    if let Value::Object(root) = &mut projected {
        root.remove("kind");
        root.remove("apiVersion");
    }

    serde_json::from_value(projected).map_err(|source| ExtractError::Deserialize {
        manager: field_manager.to_string(),
        source,
    })
}

fn is_applied_by(entry: &ManagedFieldsEntry, field_manager: &str, subresource: Option<&str>) -> bool {
    let entry_subresource = entry.subresource.as_deref().filter(|s| !s.is_empty());
    entry.manager.as_deref() == Some(field_manager)
        && entry.operation.as_deref() == Some(APPLY_OPERATION)
        && entry_subresource == subresource
}

fn union_into(target: &mut Map<String, Value>, fields: &Map<String, Value>) {
    for (key, child) in fields {
        match (target.get_mut(key), child) {
            (Some(Value::Object(existing)), Value::Object(child)) => union_into(existing, child),
            (Some(_), _) => {}
            (None, _) => {
                target.insert(key.clone(), child.clone());
            }
        }
    }
}

/// A field set with no children besides `.` owns the whole value.
fn owns_whole_value(fields: &Value) -> bool {
    fields
        .as_object()
        .is_none_or(|fields| fields.keys().all(|key| key == "."))
}

fn project_child(value: &Value, fields: &Value) -> Option<Value> {
    if owns_whole_value(fields) {
        return Some(value.clone());
    }
    fields.as_object().and_then(|fields| project(value, fields))
}

fn project(value: &Value, fields: &Map<String, Value>) -> Option<Value> {
    match value {
        Value::Object(object) => {
            let projected = fields
                .iter()
                .filter_map(|(key, child_fields)| {
                    let name = key.strip_prefix("f:")?;
                    let child = object.get(name)?;
                    project_child(child, child_fields).map(|v| (name.to_string(), v))
                })
                .collect::<Map<_, _>>();
            Some(Value::Object(projected))
        }
        Value::Array(items) => {
            let projected = items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| project_list_item(index, item, fields))
                .collect::<Vec<_>>();
            Some(Value::Array(projected))
        }
        scalar => Some(scalar.clone()),
    }
}

fn project_list_item(index: usize, item: &Value, fields: &Map<String, Value>) -> Option<Value> {
    fields.iter().find_map(|(key, child_fields)| {
        if let Some(keys) = key.strip_prefix("k:") {
            let keys = serde_json::from_str::<Map<String, Value>>(keys).ok()?;
            if !keys.iter().all(|(k, v)| item.get(k) == Some(v)) {
                return None;
            }
            let mut projected = project_child(item, child_fields)?;
            // list keys always travel with their entry
            if let Value::Object(projected) = &mut projected {
                for (k, v) in keys {
                    projected.entry(k).or_insert(v);
                }
            }
            Some(projected)
        } else if let Some(set_value) = key.strip_prefix("v:") {
            let set_value = serde_json::from_str::<Value>(set_value).ok()?;
            (item == &set_value).then(|| item.clone())
        } else if let Some(position) = key.strip_prefix("i:") {
            (position.parse::<usize>().ok()? == index)
                .then(|| project_child(item, child_fields))
                .flatten()
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::v1::ConditionStatus;
    use assertables::{assert_err, assert_ok, assert_some};
    use serde_json::json;

    fn kube_controller_manager() -> KubeControllerManager {
        assert_ok!(serde_json::from_value(json!({
            "apiVersion": "operator.openshift.io/v1",
            "kind": "KubeControllerManager",
            "metadata": {
                "name": "cluster",
                "labels": { "owner": "installer", "team": "network" },
                "managedFields": [
                    {
                        "manager": "netobserve-control-plane",
                        "operation": "Apply",
                        "apiVersion": "operator.openshift.io/v1",
                        "fieldsType": "FieldsV1",
                        "fieldsV1": {
                            "f:metadata": { "f:labels": { "f:team": {} } },
                            "f:spec": { "f:observedConfig": {} }
                        }
                    },
                    {
                        "manager": "netobserve-control-plane",
                        "operation": "Apply",
                        "apiVersion": "operator.openshift.io/v1",
                        "subresource": "status",
                        "fieldsType": "FieldsV1",
                        "fieldsV1": {
                            "f:status": {
                                "f:conditions": {
                                    "k:{\"type\":\"NetworkObserverDegraded\"}": {
                                        ".": {},
                                        "f:status": {},
                                        "f:message": {}
                                    }
                                }
                            }
                        }
                    },
                    {
                        "manager": "cluster-kube-controller-manager-operator",
                        "operation": "Update",
                        "apiVersion": "operator.openshift.io/v1",
                        "fieldsType": "FieldsV1",
                        "fieldsV1": {
                            "f:spec": { "f:logLevel": {}, "f:managementState": {} }
                        }
                    }
                ]
            },
            "spec": {
                "managementState": "Managed",
                "logLevel": "Debug",
                "observedConfig": {
                    "extendedArguments": { "cluster-cidr": ["10.128.0.0/14"] }
                }
            },
            "status": {
                "readyReplicas": 3,
                "conditions": [
                    {
                        "type": "Available",
                        "status": "True"
                    },
                    {
                        "type": "NetworkObserverDegraded",
                        "status": "True",
                        "reason": "Observed",
                        "message": "invalid node port range"
                    }
                ]
            }
        })))
    }

    #[test]
    fn test_extract_main_resource_fields() {
        let extracted = assert_ok!(extract_kube_controller_manager(
            &kube_controller_manager(),
            "netobserve-control-plane"
        ));

        assert_eq!(extracted.name(), Some("cluster"));
        assert_eq!(
            extracted.type_meta.kind.as_deref(),
            Some("KubeControllerManager")
        );

        let labels = extracted.metadata.and_then(|m| m.labels);
        let labels = assert_some!(labels);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels.get("team").map(String::as_str), Some("network"));

        let spec = assert_some!(extracted.spec);
        assert_eq!(
            spec.observed_config,
            Some(json!({ "extendedArguments": { "cluster-cidr": ["10.128.0.0/14"] } }))
        );
        assert_eq!(spec.log_level, None);
        assert_eq!(spec.management_state, None);
        assert_eq!(extracted.status, None);
    }

    #[test]
    fn test_extract_status_subresource_fields() {
        let extracted = assert_ok!(extract_kube_controller_manager_status(
            &kube_controller_manager(),
            "netobserve-control-plane"
        ));

        assert_eq!(extracted.spec, None);
        let status = assert_some!(extracted.status);
        assert_eq!(status.ready_replicas, None);
        assert_eq!(status.conditions.len(), 1);

        let condition = &status.conditions[0];
        assert_eq!(condition.type_.as_deref(), Some("NetworkObserverDegraded"));
        assert_eq!(condition.status, Some(ConditionStatus::True));
        assert_eq!(condition.message.as_deref(), Some("invalid node port range"));
        assert_eq!(condition.reason, None);
    }

    #[test]
    fn test_extract_for_unknown_manager_only_sets_identity() {
        let extracted = assert_ok!(extract_kube_controller_manager(
            &kube_controller_manager(),
            "someone-else"
        ));

        assert_eq!(
            assert_ok!(serde_json::to_value(&extracted)),
            json!({
                "kind": "KubeControllerManager",
                "apiVersion": "operator.openshift.io/v1",
                "metadata": { "name": "cluster" }
            })
        );
    }

    #[test]
    fn test_update_operations_are_not_extracted() {
        let extracted = assert_ok!(extract_kube_controller_manager(
            &kube_controller_manager(),
            "cluster-kube-controller-manager-operator"
        ));
        assert_eq!(extracted.spec, None);
    }

    #[test]
    fn test_extract_set_and_index_list_entries() {
        let policy: ImageContentSourcePolicy = assert_ok!(serde_json::from_value(json!({
            "apiVersion": "operator.openshift.io/v1alpha1",
            "kind": "ImageContentSourcePolicy",
            "metadata": {
                "name": "mirrors",
                "managedFields": [{
                    "manager": "mirror-admin",
                    "operation": "Apply",
                    "fieldsType": "FieldsV1",
                    "fieldsV1": {
                        "f:spec": {
                            "f:repositoryDigestMirrors": {
                                "i:1": { "f:source": {}, "f:mirrors": { "v:\"mirror.example.com/b\"": {} } }
                            }
                        }
                    }
                }]
            },
            "spec": {
                "repositoryDigestMirrors": [
                    { "source": "quay.io/a", "mirrors": ["mirror.example.com/a"] },
                    { "source": "quay.io/b", "mirrors": ["other.example.com/b", "mirror.example.com/b"] }
                ]
            }
        })));

        let extracted = assert_ok!(extract_image_content_source_policy(&policy, "mirror-admin"));
        let spec = assert_some!(extracted.spec);

        assert_eq!(spec.repository_digest_mirrors.len(), 1);
        assert_eq!(
            spec.repository_digest_mirrors[0].source.as_deref(),
            Some("quay.io/b")
        );
        assert_eq!(
            spec.repository_digest_mirrors[0].mirrors,
            ["mirror.example.com/b"]
        );

        let status = assert_ok!(extract_image_content_source_policy_status(
            &policy,
            "mirror-admin"
        ));
        assert_eq!(status.spec, None);
    }

    #[test]
    fn test_unsupported_fields_type_is_an_error() {
        let policy: ImageContentSourcePolicy = assert_ok!(serde_json::from_value(json!({
            "apiVersion": "operator.openshift.io/v1alpha1",
            "kind": "ImageContentSourcePolicy",
            "metadata": {
                "name": "mirrors",
                "managedFields": [{
                    "manager": "mirror-admin",
                    "operation": "Apply",
                    "fieldsType": "FieldsV2"
                }]
            },
            "spec": {}
        })));

        let err = assert_err!(extract_image_content_source_policy(&policy, "mirror-admin"));
        assert!(matches!(err, ExtractError::UnsupportedFieldsType { .. }));
    }

    #[test]
    fn test_missing_name_is_an_error() {
        let policy = ImageContentSourcePolicy::default();
        let err = assert_err!(extract_image_content_source_policy(&policy, "mirror-admin"));
        assert!(matches!(err, ExtractError::MissingName));
    }
}
