//! Contains the versioned source interfaces of the OSF web services and the operations they run
//! against the triple store.
//!
//! A request is bound to an operation in two steps. The [`resolve`] function picks the
//! [`InterfaceBinding`] of a [`ServiceDescriptor`] for the requested interface and version. The
//! [`execute`] function then runs the bound operation within a [`ServiceContext`].

mod audit;
mod cache;
mod context;
mod descriptor;
mod executor;
pub mod query;
mod registry;
mod resolver;
pub mod services;

pub use audit::{AuditEntry, AuditLog, MemoryAuditLog, TracingAuditLog};
pub use cache::{RegionCache, DEFAULT_REGION_CAPACITY};
pub use context::{Graphs, ServiceContext};
pub use descriptor::{InterfaceDeclaration, Operation, ServiceDescriptor};
pub use executor::execute;
pub use registry::ServiceRegistry;
pub use resolver::{resolve, InterfaceBinding, ResolveError};
