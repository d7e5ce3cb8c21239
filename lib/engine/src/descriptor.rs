use crate::services::{auth, dataset};
use osfws_model::{ErrorCatalog, HttpMethod, Representation};

/// The concrete implementation a source interface is bound to.
///
/// Each variant is one (interface, version) implementation. The executor dispatches on this enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    DatasetCreate,
    /// Dataset creation as done by interface version 1.0, which does not record a creation date.
    DatasetCreateLegacy,
    DatasetRead,
    /// Dataset reading as done by interface version 1.0, which only reports the title and the
    /// description.
    DatasetReadLegacy,
    DatasetDelete,
    AuthRegistrarUser,
    AuthLister,
    SparqlQuery,
}

impl Operation {
    /// The cache regions that must be invalidated after the operation succeeded.
    pub fn invalidated_regions(self) -> &'static [&'static str] {
        match self {
            Operation::DatasetCreate
            | Operation::DatasetCreateLegacy
            | Operation::DatasetDelete => &[dataset::READ_CACHE_REGION, auth::LISTER_DATASET_REGION],
            Operation::AuthRegistrarUser => &auth::MEMBERSHIP_CACHE_REGIONS,
            Operation::DatasetRead
            | Operation::DatasetReadLegacy
            | Operation::AuthLister
            | Operation::SparqlQuery => &[],
        }
    }
}

/// A source interface implementation and the single version it is compatible with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterfaceDeclaration {
    pub name: &'static str,
    pub compatible_with: &'static str,
    pub operation: Operation,
}

/// The static description of a web service.
#[derive(Debug)]
pub struct ServiceDescriptor {
    /// The name of the service, e.g., `dataset/create`. It is also the path of its endpoint.
    pub name: &'static str,
    /// The only HTTP method the service accepts.
    pub method: HttpMethod,
    /// The version used when a request does not specify one.
    pub default_version: &'static str,
    pub interfaces: &'static [InterfaceDeclaration],
    /// The supported representations, in order of preference.
    pub representations: &'static [Representation],
    pub errors: &'static ErrorCatalog,
}

impl ServiceDescriptor {
    /// The versions any of the interfaces is compatible with, in declaration order.
    pub fn versions(&self) -> Vec<&'static str> {
        let mut versions = Vec::new();
        for declaration in self.interfaces {
            if !versions.contains(&declaration.compatible_with) {
                versions.push(declaration.compatible_with);
            }
        }
        versions
    }

    /// The names of the interfaces, in declaration order.
    pub fn interface_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        for declaration in self.interfaces {
            if !names.contains(&declaration.name) {
                names.push(declaration.name);
            }
        }
        names
    }
}
