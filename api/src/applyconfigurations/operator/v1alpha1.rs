use crate::applyconfigurations::meta::{
    ObjectMetaApplyConfiguration, TypeMetaApplyConfiguration, object_meta_setters,
};
use crate::applyconfigurations::{ApplyConfigurationError, KeyedEntry, append_keyed, is_unset};
use crate::constants::{IMAGE_CONTENT_SOURCE_POLICY_API_VERSION, IMAGE_CONTENT_SOURCE_POLICY_KIND};
use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDigestMirrorsApplyConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mirrors: Vec<String>,
}

pub fn repository_digest_mirrors() -> RepositoryDigestMirrorsApplyConfiguration {
    RepositoryDigestMirrorsApplyConfiguration::default()
}

impl RepositoryDigestMirrorsApplyConfiguration {
    pub fn with_source(mut self, value: impl Into<String>) -> Self {
        self.source = Some(value.into());
        self
    }

    pub fn with_mirrors(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.mirrors.extend(values.into_iter().map(Into::into));
        self
    }
}

impl KeyedEntry for RepositoryDigestMirrorsApplyConfiguration {
    fn missing_key(&self) -> Option<&'static str> {
        is_unset(self.source.as_ref()).then_some("source")
    }
}

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContentSourcePolicySpecApplyConfiguration {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repository_digest_mirrors: Vec<RepositoryDigestMirrorsApplyConfiguration>,
}

pub fn image_content_source_policy_spec() -> ImageContentSourcePolicySpecApplyConfiguration {
    ImageContentSourcePolicySpecApplyConfiguration::default()
}

impl ImageContentSourcePolicySpecApplyConfiguration {
    pub fn with_repository_digest_mirrors(
        mut self,
        values: impl IntoIterator<Item = RepositoryDigestMirrorsApplyConfiguration>,
    ) -> Result<Self, ApplyConfigurationError> {
        append_keyed(
            &mut self.repository_digest_mirrors,
            "repositoryDigestMirrors",
            values,
        )?;
        Ok(self)
    }
}

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageContentSourcePolicyApplyConfiguration {
    #[serde(flatten)]
    pub type_meta: TypeMetaApplyConfiguration,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMetaApplyConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ImageContentSourcePolicySpecApplyConfiguration>,
}

/// Starts an apply configuration for the `ImageContentSourcePolicy` named `name`.
pub fn image_content_source_policy(
    name: impl Into<String>,
) -> ImageContentSourcePolicyApplyConfiguration {
    ImageContentSourcePolicyApplyConfiguration::default()
        .with_name(name)
        .with_kind(IMAGE_CONTENT_SOURCE_POLICY_KIND)
        .with_api_version(IMAGE_CONTENT_SOURCE_POLICY_API_VERSION)
}

impl ImageContentSourcePolicyApplyConfiguration {
    object_meta_setters!();

    pub fn with_spec(mut self, value: ImageContentSourcePolicySpecApplyConfiguration) -> Self {
        self.spec = Some(value);
        self
    }
}
