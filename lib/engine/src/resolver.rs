use crate::{Operation, ServiceDescriptor};
use osfws_model::{CatalogEntry, ServiceError, Severity, DEFAULT_INTERFACE};
use tracing::debug;

const UNKNOWN_INTERFACE: CatalogEntry = CatalogEntry {
    code: "_001",
    status: 400,
    name: "Source interface not existing",
    description: "The source interface you requested is not existing for this web service endpoint.",
    level: Severity::Warning,
};

const UNSUPPORTED_INTERFACE_VERSION: CatalogEntry = CatalogEntry {
    code: "_002",
    status: 400,
    name: "Source interface version not compatible",
    description: "The version of the source interface you requested is not compatible with the version of the source interface currently hosted on the system. Please make sure that your tool gets upgraded for using this current version of the endpoint.",
    level: Severity::Warning,
};

/// A source interface selected for a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterfaceBinding {
    pub service: &'static str,
    pub interface: &'static str,
    pub version: &'static str,
    pub operation: Operation,
}

/// An error raised while resolving a source interface.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("The source interface '{interface}' does not exist for {service}")]
    UnknownInterface {
        service: &'static str,
        interface: String,
    },
    #[error("The source interface '{interface}' of {service} is not compatible with version '{version}'")]
    UnsupportedInterfaceVersion {
        service: &'static str,
        interface: String,
        version: String,
    },
}

impl From<ResolveError> for ServiceError {
    fn from(error: ResolveError) -> Self {
        let (service, entry) = match &error {
            ResolveError::UnknownInterface { service, .. } => (*service, &UNKNOWN_INTERFACE),
            ResolveError::UnsupportedInterfaceVersion { service, .. } => {
                (*service, &UNSUPPORTED_INTERFACE_VERSION)
            }
        };
        ServiceError::from_entry(service, entry, Some(error.to_string()))
    }
}

/// Selects the implementation of `interface` that is compatible with `version`.
///
/// An empty version selects the default version of the service. An empty interface, or
/// `"default"`, selects the default interface. Compatibility is an exact match of the version
/// string. This function never touches the store.
pub fn resolve(
    interface: &str,
    version: &str,
    descriptor: &ServiceDescriptor,
) -> Result<InterfaceBinding, ResolveError> {
    let interface = if interface.is_empty() || interface.eq_ignore_ascii_case(DEFAULT_INTERFACE) {
        DEFAULT_INTERFACE
    } else {
        interface
    };
    let version = if version.is_empty() {
        descriptor.default_version
    } else {
        version
    };

    let mut candidates = descriptor
        .interfaces
        .iter()
        .filter(|declaration| declaration.name == interface)
        .peekable();
    if candidates.peek().is_none() {
        return Err(ResolveError::UnknownInterface {
            service: descriptor.name,
            interface: interface.to_owned(),
        });
    }

    let declaration = candidates
        .find(|declaration| declaration.compatible_with == version)
        .ok_or_else(|| ResolveError::UnsupportedInterfaceVersion {
            service: descriptor.name,
            interface: interface.to_owned(),
            version: version.to_owned(),
        })?;

    debug!(
        service = descriptor.name,
        interface = declaration.name,
        version = declaration.compatible_with,
        "Resolved source interface"
    );
    Ok(InterfaceBinding {
        service: descriptor.name,
        interface: declaration.name,
        version: declaration.compatible_with,
        operation: declaration.operation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InterfaceDeclaration;
    use osfws_model::{ErrorCatalog, HttpMethod, RDF_DOCUMENTS};

    static ERRORS: ErrorCatalog = ErrorCatalog::new("dataset/read", &[]);

    static DESCRIPTOR: ServiceDescriptor = ServiceDescriptor {
        name: "dataset/read",
        method: HttpMethod::Get,
        default_version: "3.0",
        interfaces: &[
            InterfaceDeclaration {
                name: "default",
                compatible_with: "3.0",
                operation: Operation::DatasetRead,
            },
            InterfaceDeclaration {
                name: "default",
                compatible_with: "1.0",
                operation: Operation::DatasetReadLegacy,
            },
            InterfaceDeclaration {
                name: "compact",
                compatible_with: "1.0",
                operation: Operation::DatasetReadLegacy,
            },
        ],
        representations: RDF_DOCUMENTS,
        errors: &ERRORS,
    };

    #[test]
    fn empty_version_binds_default_version() {
        let binding = resolve("default", "", &DESCRIPTOR).unwrap();
        assert_eq!(binding.version, "3.0");
        assert_eq!(binding.operation, Operation::DatasetRead);
    }

    #[test]
    fn empty_interface_binds_default_interface() {
        let binding = resolve("", "1.0", &DESCRIPTOR).unwrap();
        assert_eq!(binding.interface, "default");
        assert_eq!(binding.operation, Operation::DatasetReadLegacy);
    }

    #[test]
    fn named_interface_with_exact_version() {
        let binding = resolve("compact", "1.0", &DESCRIPTOR).unwrap();
        assert_eq!(binding.interface, "compact");
    }

    #[test]
    fn version_must_match_exactly() {
        for version in ["3", "3.0.0", "2.0", "1.0 "] {
            assert_eq!(
                resolve("default", version, &DESCRIPTOR),
                Err(ResolveError::UnsupportedInterfaceVersion {
                    service: "dataset/read",
                    interface: "default".to_owned(),
                    version: version.to_owned(),
                })
            );
        }
    }

    #[test]
    fn named_interface_does_not_fall_back_to_default_version_of_other_interfaces() {
        assert!(matches!(
            resolve("compact", "", &DESCRIPTOR),
            Err(ResolveError::UnsupportedInterfaceVersion { .. })
        ));
    }

    #[test]
    fn unknown_interface() {
        let error = resolve("virtuoso", "3.0", &DESCRIPTOR).unwrap_err();
        assert!(matches!(error, ResolveError::UnknownInterface { .. }));

        let error = ServiceError::from(error);
        assert_eq!(error.status, 400);
        assert_eq!(error.id, "WS-DATASET-READ-_001");
    }

    #[test]
    fn unsupported_version_renders_as_service_error() {
        let error = ServiceError::from(resolve("default", "9.9", &DESCRIPTOR).unwrap_err());
        assert_eq!(error.code(), "_002");
        assert!(error.debug_info.unwrap().contains("9.9"));
    }
}
