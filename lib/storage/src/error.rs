/// An error reported by the triple store.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The store rejected the statement as malformed.
    #[error("The statement is not valid SPARQL: {0}")]
    Syntax(String),
    /// The store failed while evaluating the statement.
    #[error("The store failed to evaluate the statement: {0}")]
    Evaluation(String),
    /// The remote endpoint could not be reached.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The remote endpoint answered with an error status.
    #[error("The SPARQL endpoint answered with status {status}: {body}")]
    Endpoint { status: u16, body: String },
    /// The response of the store could not be understood.
    #[error("The response of the store could not be parsed: {0}")]
    Protocol(String),
    /// The statement returned a different kind of result than the caller expected.
    #[error("Expected {expected} results from the store")]
    UnexpectedResults { expected: &'static str },
    #[error("An internal error occurred in the store layer: {0}")]
    Internal(String),
}

impl StoreError {
    /// Whether the store rejected the statement itself, as opposed to failing while running it.
    pub fn is_syntax(&self) -> bool {
        matches!(self, StoreError::Syntax(_))
    }
}
