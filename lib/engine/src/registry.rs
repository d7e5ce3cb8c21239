use crate::services::{auth, dataset, sparql};
use crate::ServiceDescriptor;

/// The set of services hosted by a server.
#[derive(Clone, Debug)]
pub struct ServiceRegistry {
    services: Vec<&'static ServiceDescriptor>,
}

impl ServiceRegistry {
    /// Creates a registry from the given descriptors.
    pub fn new(services: impl IntoIterator<Item = &'static ServiceDescriptor>) -> Self {
        Self {
            services: services.into_iter().collect(),
        }
    }

    /// The registry with every built-in service.
    pub fn standard() -> Self {
        Self::new([
            &dataset::DATASET_CREATE,
            &dataset::DATASET_READ,
            &dataset::DATASET_DELETE,
            &auth::AUTH_REGISTRAR_USER,
            &auth::AUTH_LISTER,
            &sparql::SPARQL,
        ])
    }

    pub fn get(&self, name: &str) -> Option<&'static ServiceDescriptor> {
        self.services
            .iter()
            .find(|service| service.name == name)
            .copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static ServiceDescriptor> + '_ {
        self.services.iter().copied()
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_services_are_registered() {
        let registry = ServiceRegistry::standard();
        assert!(registry.get("dataset/create").is_some());
        assert!(registry.get("auth/registrar/user").is_some());
        assert!(registry.get("ontology/create").is_none());
    }

    #[test]
    fn every_service_can_resolve_its_default_version() {
        for service in ServiceRegistry::standard().iter() {
            assert!(
                service.versions().contains(&service.default_version),
                "{} does not declare its default version",
                service.name
            );
            assert!(
                !service.representations.is_empty(),
                "{} has no representations",
                service.name
            );
            assert!(crate::resolve("", "", service).is_ok());
        }
    }
}
