use crate::applyconfigurations::{ApplyConfigurationError, KeyedEntry, append_keyed, is_unset};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMetaApplyConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetaApplyConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<Time>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<Time>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_grace_period_seconds: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_references: Vec<OwnerReferenceApplyConfiguration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub finalizers: Vec<String>,
}

impl ObjectMetaApplyConfiguration {
    pub(crate) fn merge_labels<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        merge_into(&mut self.labels, entries);
    }

    pub(crate) fn merge_annotations<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        merge_into(&mut self.annotations, entries);
    }

    pub(crate) fn append_owner_references(
        &mut self,
        values: impl IntoIterator<Item = OwnerReferenceApplyConfiguration>,
    ) -> Result<(), ApplyConfigurationError> {
        append_keyed(&mut self.owner_references, "ownerReferences", values)
    }
}

fn merge_into<K, V>(
    map: &mut Option<BTreeMap<String, String>>,
    entries: impl IntoIterator<Item = (K, V)>,
) where
    K: Into<String>,
    V: Into<String>,
{
    let mut entries = entries.into_iter().peekable();
    if entries.peek().is_none() {
        return;
    }
    map.get_or_insert_with(BTreeMap::new)
        .extend(entries.map(|(k, v)| (k.into(), v.into())));
}

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReferenceApplyConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_owner_deletion: Option<bool>,
}

pub fn owner_reference() -> OwnerReferenceApplyConfiguration {
    OwnerReferenceApplyConfiguration::default()
}

impl OwnerReferenceApplyConfiguration {
    pub fn with_api_version(mut self, value: impl Into<String>) -> Self {
        self.api_version = Some(value.into());
        self
    }

    pub fn with_kind(mut self, value: impl Into<String>) -> Self {
        self.kind = Some(value.into());
        self
    }

    pub fn with_name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn with_uid(mut self, value: impl Into<String>) -> Self {
        self.uid = Some(value.into());
        self
    }

    pub fn with_controller(mut self, value: bool) -> Self {
        self.controller = Some(value);
        self
    }

    pub fn with_block_owner_deletion(mut self, value: bool) -> Self {
        self.block_owner_deletion = Some(value);
        self
    }
}

impl KeyedEntry for OwnerReferenceApplyConfiguration {
    fn missing_key(&self) -> Option<&'static str> {
        is_unset(self.uid.as_ref()).then_some("uid")
    }
}

/// Generates the type and object metadata setters of a root apply configuration.
///
/// The root type must have `type_meta: TypeMetaApplyConfiguration` and
/// `metadata: Option<ObjectMetaApplyConfiguration>` fields.
macro_rules! object_meta_setters {
    () => {
        pub fn with_kind(mut self, value: impl Into<String>) -> Self {
            self.type_meta.kind = Some(value.into());
            self
        }

        pub fn with_api_version(mut self, value: impl Into<String>) -> Self {
            self.type_meta.api_version = Some(value.into());
            self
        }

        pub fn with_name(mut self, value: impl Into<String>) -> Self {
            self.metadata_mut().name = Some(value.into());
            self
        }

        pub fn with_generate_name(mut self, value: impl Into<String>) -> Self {
            self.metadata_mut().generate_name = Some(value.into());
            self
        }

        pub fn with_namespace(mut self, value: impl Into<String>) -> Self {
            self.metadata_mut().namespace = Some(value.into());
            self
        }

        pub fn with_uid(mut self, value: impl Into<String>) -> Self {
            self.metadata_mut().uid = Some(value.into());
            self
        }

        pub fn with_resource_version(mut self, value: impl Into<String>) -> Self {
            self.metadata_mut().resource_version = Some(value.into());
            self
        }

        pub fn with_generation(mut self, value: i64) -> Self {
            self.metadata_mut().generation = Some(value);
            self
        }

        pub fn with_creation_timestamp(
            mut self,
            value: k8s_openapi::apimachinery::pkg::apis::meta::v1::Time,
        ) -> Self {
            self.metadata_mut().creation_timestamp = Some(value);
            self
        }

        pub fn with_deletion_timestamp(
            mut self,
            value: k8s_openapi::apimachinery::pkg::apis::meta::v1::Time,
        ) -> Self {
            self.metadata_mut().deletion_timestamp = Some(value);
            self
        }

        pub fn with_deletion_grace_period_seconds(mut self, value: i64) -> Self {
            self.metadata_mut().deletion_grace_period_seconds = Some(value);
            self
        }

        pub fn with_labels<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
        where
            K: Into<String>,
            V: Into<String>,
        {
            self.metadata_mut().merge_labels(entries);
            self
        }

        pub fn with_annotations<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
        where
            K: Into<String>,
            V: Into<String>,
        {
            self.metadata_mut().merge_annotations(entries);
            self
        }

        pub fn with_owner_references(
            mut self,
            values: impl IntoIterator<
                Item = $crate::applyconfigurations::meta::OwnerReferenceApplyConfiguration,
            >,
        ) -> Result<Self, $crate::applyconfigurations::ApplyConfigurationError> {
            self.metadata_mut().append_owner_references(values)?;
            Ok(self)
        }

        pub fn with_finalizers(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
            self.metadata_mut()
                .finalizers
                .extend(values.into_iter().map(Into::into));
            self
        }

        /// The name set on the metadata, if any.
        pub fn name(&self) -> Option<&str> {
            self.metadata.as_ref().and_then(|m| m.name.as_deref())
        }

        fn metadata_mut(&mut self) -> &mut $crate::applyconfigurations::meta::ObjectMetaApplyConfiguration {
            self.metadata.get_or_insert_with(Default::default)
        }
    };
}

pub(crate) use object_meta_setters;
