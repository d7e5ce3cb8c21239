use crate::{QueryKind, StoreError, StoreResults, TripleStore};
use async_trait::async_trait;
use osfws_model::{Solutions, Triple};
use oxrdfio::{RdfFormat, RdfParser};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use sparesults::{QueryResultsFormat, QueryResultsParser, ReaderQueryResultsParserOutput};
use spargebra::Query;
use tracing::debug;
use url::Url;

/// A triple store reached over the SPARQL 1.1 protocol, e.g., a Virtuoso server.
///
/// Queries and updates are sent as form-encoded `POST` requests. `SELECT` and `ASK` results are
/// requested as SPARQL JSON, graphs as N-Triples.
#[derive(Clone, Debug)]
pub struct SparqlEndpointStore {
    client: reqwest::Client,
    query_endpoint: Url,
    update_endpoint: Url,
}

impl SparqlEndpointStore {
    /// Creates a store that sends queries and updates to `endpoint`.
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            update_endpoint: endpoint.clone(),
            query_endpoint: endpoint,
        }
    }

    /// Sends updates to a different endpoint than queries.
    #[must_use]
    pub fn with_update_endpoint(mut self, endpoint: Url) -> Self {
        self.update_endpoint = endpoint;
        self
    }

    pub fn query_endpoint(&self) -> &Url {
        &self.query_endpoint
    }

    pub fn update_endpoint(&self) -> &Url {
        &self.update_endpoint
    }

    async fn post(
        &self,
        endpoint: &Url,
        field: &str,
        statement: &str,
        accept: &str,
    ) -> Result<Vec<u8>, StoreError> {
        debug!(%endpoint, field, "Sending statement to SPARQL endpoint");
        let response = self
            .client
            .post(endpoint.clone())
            .header(ACCEPT, accept)
            .form(&[(field, statement)])
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();
        if status.is_success() {
            return Ok(body);
        }

        let body = String::from_utf8_lossy(&body).into_owned();
        if status == StatusCode::BAD_REQUEST {
            Err(StoreError::Syntax(body))
        } else {
            Err(StoreError::Endpoint {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl TripleStore for SparqlEndpointStore {
    async fn query(&self, query: &str) -> Result<StoreResults, StoreError> {
        let kind = Query::parse(query, None)
            .map(|query| QueryKind::of(&query))
            .map_err(|e| StoreError::Syntax(e.to_string()))?;

        if kind.returns_graph() {
            let body = self
                .post(&self.query_endpoint, "query", query, "application/n-triples")
                .await?;
            parse_graph(&body).map(StoreResults::Graph)
        } else {
            let body = self
                .post(
                    &self.query_endpoint,
                    "query",
                    query,
                    "application/sparql-results+json",
                )
                .await?;
            parse_results(&body)
        }
    }

    async fn update(&self, update: &str) -> Result<(), StoreError> {
        self.post(&self.update_endpoint, "update", update, "*/*")
            .await
            .map(|_| ())
    }
}

fn parse_results(body: &[u8]) -> Result<StoreResults, StoreError> {
    let parser = QueryResultsParser::from_format(QueryResultsFormat::Json);
    match parser
        .for_reader(body)
        .map_err(|e| StoreError::Protocol(e.to_string()))?
    {
        ReaderQueryResultsParserOutput::Solutions(solutions) => {
            let mut table = Solutions::new(solutions.variables().to_vec());
            for solution in solutions {
                let solution = solution.map_err(|e| StoreError::Protocol(e.to_string()))?;
                table.rows.push(solution.values().to_vec());
            }
            Ok(StoreResults::Solutions(table))
        }
        ReaderQueryResultsParserOutput::Boolean(value) => Ok(StoreResults::Boolean(value)),
    }
}

fn parse_graph(body: &[u8]) -> Result<Vec<Triple>, StoreError> {
    RdfParser::from_format(RdfFormat::NTriples)
        .for_reader(body)
        .map(|quad| quad.map(Triple::from))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StoreError::Protocol(e.to_string()))
}
