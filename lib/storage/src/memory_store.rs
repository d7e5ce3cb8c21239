use crate::{StoreError, StoreResults, TripleStore};
use async_trait::async_trait;
use osfws_model::Solutions;
use oxigraph::sparql::{EvaluationError, Query, QueryResults, Update};
use oxigraph::store::Store;

/// An in-memory triple store backed by Oxigraph.
///
/// Used when no remote SPARQL endpoint is configured and in tests. Evaluation runs on the blocking
/// thread pool of Tokio.
#[derive(Clone)]
pub struct MemoryStore {
    store: Store,
}

impl MemoryStore {
    /// Creates a new, empty store.
    pub fn new() -> Result<Self, StoreError> {
        let store = Store::new().map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(Self { store })
    }

    /// Returns the number of quads in the store.
    pub fn len(&self) -> Result<usize, StoreError> {
        self.store
            .len()
            .map_err(|e| StoreError::Internal(e.to_string()))
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.store
            .is_empty()
            .map_err(|e| StoreError::Internal(e.to_string()))
    }
}

#[async_trait]
impl TripleStore for MemoryStore {
    async fn query(&self, query: &str) -> Result<StoreResults, StoreError> {
        let query =
            Query::parse(query, None).map_err(|e| StoreError::Syntax(e.to_string()))?;
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || evaluate_query(&store, query))
            .await
            .map_err(|e| StoreError::Internal(e.to_string()))?
    }

    async fn update(&self, update: &str) -> Result<(), StoreError> {
        let update =
            Update::parse(update, None).map_err(|e| StoreError::Syntax(e.to_string()))?;
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.update(update).map_err(evaluation_error))
            .await
            .map_err(|e| StoreError::Internal(e.to_string()))?
    }
}

fn evaluate_query(store: &Store, query: Query) -> Result<StoreResults, StoreError> {
    match store.query(query).map_err(evaluation_error)? {
        QueryResults::Solutions(solutions) => {
            let mut table = Solutions::new(solutions.variables().to_vec());
            for solution in solutions {
                let solution = solution.map_err(evaluation_error)?;
                table.rows.push(solution.values().to_vec());
            }
            Ok(StoreResults::Solutions(table))
        }
        QueryResults::Boolean(value) => Ok(StoreResults::Boolean(value)),
        QueryResults::Graph(triples) => Ok(StoreResults::Graph(
            triples.collect::<Result<Vec<_>, _>>().map_err(evaluation_error)?,
        )),
    }
}

fn evaluation_error(error: EvaluationError) -> StoreError {
    StoreError::Evaluation(error.to_string())
}
