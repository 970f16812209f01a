use crate::kubernetes::objects::{ObjectRef, Objects};
use netobserve_api::config::v1::Network;
use std::sync::Arc;

/// Read access to the cluster scoped `Network` objects known to this process.
pub trait NetworkLister {
    fn get(&self, name: &str) -> Option<Arc<Network>>;
}

impl NetworkLister for Objects<Network> {
    fn get(&self, name: &str) -> Option<Arc<Network>> {
        self.get_by_ref(&ObjectRef::of_kind::<Network>(None, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netobserve_api::config::v1::NetworkSpec;
    use rstest::rstest;

    fn objects(names: &[&str]) -> Objects<Network> {
        names
            .iter()
            .map(|name| Arc::new(Network::new(name, NetworkSpec::default())))
            .collect()
    }

    #[rstest]
    #[case::single(&["cluster"], "cluster", true)]
    #[case::among_others(&["other", "cluster"], "cluster", true)]
    #[case::missing(&["other"], "cluster", false)]
    #[case::empty(&[], "cluster", false)]
    fn test_get_by_name(#[case] names: &[&str], #[case] name: &str, #[case] found: bool) {
        let lister = objects(names);

        let network = lister.get(name);
        assert_eq!(network.is_some(), found);
        if let Some(network) = network {
            assert_eq!(network.metadata.name.as_deref(), Some(name));
        }
    }
}
