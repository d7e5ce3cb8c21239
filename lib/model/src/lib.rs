//! Contains the data model shared by the OSF web services: the normalized request, the outcome of
//! content negotiation, the result of a service operation, and the static error catalogs.

mod error;
mod negotiation;
mod payload;
mod representation;
mod request;
pub mod vocab;

pub use error::*;
pub use negotiation::*;
pub use payload::*;
pub use representation::*;
pub use request::*;

// Re-export some oxrdf types.
pub use oxrdf::{
    BlankNode, IriParseError, Literal, LiteralRef, NamedNode, NamedNodeRef, Subject, Term,
    TermRef, Triple, TripleRef, Variable, VariableRef,
};
