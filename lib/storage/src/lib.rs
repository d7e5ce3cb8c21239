//! Contains the access layer to the triple store that backs the OSF web services.
//!
//! Every store call returns an explicit [`Result`]. There is no error flag that has to be polled
//! after a call.

mod error;
mod memory_store;
mod sparql_endpoint;
mod store;

pub use error::StoreError;
pub use memory_store::MemoryStore;
pub use sparql_endpoint::SparqlEndpointStore;
pub use store::{QueryKind, StoreResults, TripleStore};
