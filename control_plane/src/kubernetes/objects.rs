use getset::Getters;
use kube::{Resource, ResourceExt};
use std::collections::HashMap;
use std::fmt::{Display, Formatter, Write};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;
use typed_builder::TypedBuilder;

#[derive(Error, Debug)]
pub enum ObjectRefError {
    #[error("Object is missing a name")]
    MissingName,
}

#[derive(TypedBuilder, Getters, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    #[getset(get = "pub")]
    #[builder(setter(into))]
    kind: String,

    #[getset(get = "pub")]
    #[builder(default, setter(into))]
    group: Option<String>,

    #[getset(get = "pub")]
    #[builder(default, setter(into))]
    namespace: Option<String>,

    #[getset(get = "pub")]
    #[builder(setter(into))]
    name: String,
}

impl Display for ObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.kind.to_lowercase())?;
        if let Some(group) = self.group() {
            f.write_char('.')?;
            f.write_str(group)?;
        }
        f.write_char('/')?;
        if let Some(namespace) = self.namespace() {
            f.write_str(namespace)?;
            f.write_char('/')?;
        }
        f.write_str(self.name())
    }
}

impl ObjectRef {
    /// A reference to the object of kind `K` named `name` in `namespace`.
    pub fn of_kind<K: Resource>(namespace: Option<&str>, name: &str) -> Self
    where
        K::DynamicType: Default,
    {
        let dynamic_type = K::DynamicType::default();
        let group = K::group(&dynamic_type);

        ObjectRef::builder()
            .kind(K::kind(&dynamic_type))
            .group((!group.is_empty()).then(|| group.to_string()))
            .namespace(namespace.map(ToString::to_string))
            .name(name)
            .build()
    }

    pub fn for_object<K: Resource>(object: &K) -> Result<Self, ObjectRefError>
    where
        K::DynamicType: Default,
    {
        let name = object
            .meta()
            .name
            .as_deref()
            .ok_or(ObjectRefError::MissingName)?;

        Ok(Self::of_kind::<K>(object.meta().namespace.as_deref(), name))
    }
}

/// Snapshot of the watched objects of one kind, keyed by reference.
#[derive(Clone, Debug)]
pub struct Objects<K: Resource> {
    by_ref: HashMap<ObjectRef, Arc<K>>,
}

impl<K: Resource> Default for Objects<K> {
    fn default() -> Self {
        Self {
            by_ref: HashMap::new(),
        }
    }
}

// Compares by identity and resource version, which is what a watch reports as a change.
impl<K: Resource> PartialEq for Objects<K> {
    fn eq(&self, other: &Self) -> bool {
        self.by_ref.len() == other.by_ref.len()
            && self.by_ref.iter().all(|(object_ref, object)| {
                other.by_ref.get(object_ref).is_some_and(|other| {
                    object.meta().uid == other.meta().uid
                        && object.meta().resource_version == other.meta().resource_version
                })
            })
    }
}

impl<K: Resource> Objects<K>
where
    K::DynamicType: Default,
{
    pub fn size(&self) -> usize {
        self.by_ref.len()
    }

    pub fn insert(&mut self, object: Arc<K>) -> Result<(), ObjectRefError> {
        let object_ref = ObjectRef::for_object(object.as_ref())?;
        self.by_ref.insert(object_ref, object);
        Ok(())
    }

    pub fn get_by_ref(&self, object_ref: &ObjectRef) -> Option<Arc<K>> {
        self.by_ref.get(object_ref).cloned()
    }
}

impl<K: Resource + ResourceExt> FromIterator<Arc<K>> for Objects<K>
where
    K::DynamicType: Default,
{
    fn from_iter<I: IntoIterator<Item = Arc<K>>>(iter: I) -> Self {
        let mut objects = Objects::default();
        for object in iter {
            if let Err(e) = objects.insert(object.clone()) {
                warn!("Skipping object: object.uid={:?} error={}", object.uid(), e);
            }
        }
        objects
    }
}
