use crate::ServiceError;
use oxrdf::{Term, Triple, Variable};

/// The outcome of a service operation: exactly one of a payload or a structured error.
pub type OperationResult = Result<Payload, ServiceError>;

/// The data a successful service operation returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// A set of triples describing one or more resources.
    Graph(Vec<Triple>),
    /// A table of bindings.
    Solutions(Solutions),
    /// The answer of an `ASK` query.
    Boolean(bool),
    /// The operation has nothing to report.
    Empty,
}

/// A table of solutions, e.g., returned by a `SELECT` query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solutions {
    pub variables: Vec<Variable>,
    /// Each row holds one entry per variable. Unbound variables are `None`.
    pub rows: Vec<Vec<Option<Term>>>,
}

impl Solutions {
    pub fn new(variables: Vec<Variable>) -> Self {
        Self {
            variables,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the bound values of `variable`.
    pub fn column<'a>(&'a self, variable: &str) -> impl Iterator<Item = &'a Term> + 'a {
        let index = self.variables.iter().position(|v| v.as_str() == variable);
        self.rows
            .iter()
            .filter_map(move |row| index.and_then(|i| row.get(i)).and_then(Option::as_ref))
    }
}
