use crate::StoreError;
use async_trait::async_trait;
use osfws_model::{Payload, Solutions, Triple};
use spargebra::Query;

/// The results of a query sent to a [`TripleStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreResults {
    Solutions(Solutions),
    Boolean(bool),
    Graph(Vec<Triple>),
}

impl From<StoreResults> for Payload {
    fn from(value: StoreResults) -> Self {
        match value {
            StoreResults::Solutions(solutions) => Payload::Solutions(solutions),
            StoreResults::Boolean(value) => Payload::Boolean(value),
            StoreResults::Graph(triples) => Payload::Graph(triples),
        }
    }
}

/// The shape of the results a query produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryKind {
    Select,
    Ask,
    Construct,
    Describe,
}

impl QueryKind {
    pub fn of(query: &Query) -> Self {
        match query {
            Query::Select { .. } => QueryKind::Select,
            Query::Ask { .. } => QueryKind::Ask,
            Query::Construct { .. } => QueryKind::Construct,
            Query::Describe { .. } => QueryKind::Describe,
        }
    }

    /// Whether the query returns triples instead of a table.
    pub fn returns_graph(self) -> bool {
        matches!(self, QueryKind::Construct | QueryKind::Describe)
    }
}

/// The external RDF triple store the services run their statements against.
///
/// Implementations must be safe to share between concurrently running requests. Conflicting
/// writes are serialized by the store itself.
#[async_trait]
pub trait TripleStore: Send + Sync {
    /// Evaluates a SPARQL query.
    async fn query(&self, query: &str) -> Result<StoreResults, StoreError>;

    /// Executes a SPARQL update.
    async fn update(&self, update: &str) -> Result<(), StoreError>;

    /// Evaluates an `ASK` query.
    async fn ask(&self, query: &str) -> Result<bool, StoreError> {
        match self.query(query).await? {
            StoreResults::Boolean(value) => Ok(value),
            _ => Err(StoreError::UnexpectedResults {
                expected: "boolean",
            }),
        }
    }

    /// Evaluates a `SELECT` query.
    async fn select(&self, query: &str) -> Result<Solutions, StoreError> {
        match self.query(query).await? {
            StoreResults::Solutions(solutions) => Ok(solutions),
            _ => Err(StoreError::UnexpectedResults {
                expected: "solution",
            }),
        }
    }

    /// Evaluates a `CONSTRUCT` or `DESCRIBE` query.
    async fn construct(&self, query: &str) -> Result<Vec<Triple>, StoreError> {
        match self.query(query).await? {
            StoreResults::Graph(triples) => Ok(triples),
            _ => Err(StoreError::UnexpectedResults { expected: "graph" }),
        }
    }
}
