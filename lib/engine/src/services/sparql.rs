//! The read-only SPARQL endpoint.

use super::{optional_iri, store_failure};
use crate::{InterfaceDeclaration, Operation, ServiceContext, ServiceDescriptor};
use osfws_model::{
    CatalogEntry, ErrorCatalog, HttpMethod, OperationResult, Payload, Representation,
    RequestParams, Severity,
};
use spargebra::algebra::QueryDataset;
use spargebra::{Query, Update};

pub static SPARQL_ERRORS: ErrorCatalog = ErrorCatalog::new(
    "sparql",
    &[
        CatalogEntry {
            code: "_200",
            status: 400,
            name: "No query specified",
            description: "No SPARQL query has been defined for this request",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_201",
            status: 400,
            name: "Invalid SPARQL query",
            description: "The SPARQL query is malformed",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_202",
            status: 400,
            name: "SPARQL updates are not accepted",
            description: "This endpoint only answers read-only SPARQL queries",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_203",
            status: 400,
            name: "Invalid default graph URI",
            description: "The default-graph-uri parameter is not a valid IRI",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_300",
            status: 500,
            name: "Can't evaluate the query",
            description: "An error occurred when we tried to evaluate the SPARQL query",
            level: Severity::Fatal,
        },
    ],
);

pub static SPARQL: ServiceDescriptor = ServiceDescriptor {
    name: "sparql",
    method: HttpMethod::Get,
    default_version: "3.0",
    interfaces: &[InterfaceDeclaration {
        name: "default",
        compatible_with: "3.0",
        operation: Operation::SparqlQuery,
    }],
    representations: &[
        Representation::SparqlResultsJson,
        Representation::SparqlResultsXml,
        Representation::Json,
        Representation::Csv,
        Representation::Tsv,
        Representation::RdfXml,
        Representation::Turtle,
        Representation::N3,
        Representation::NTriples,
    ],
    errors: &SPARQL_ERRORS,
};

/// Evaluates a read-only SPARQL query.
///
/// `default-graph-uri` replaces the dataset of the query with the given default graph.
pub async fn query(params: &RequestParams, context: &ServiceContext) -> OperationResult {
    let errors = &SPARQL_ERRORS;
    let text = params.get_or_empty("query");
    if text.trim().is_empty() {
        return Err(errors.error("_200"));
    }

    let mut query = match Query::parse(text, None) {
        Ok(query) => query,
        Err(_) if Update::parse(text, None).is_ok() => return Err(errors.error("_202")),
        Err(e) => return Err(errors.error_with_debug("_201", e.to_string())),
    };

    if let Some(graph) = optional_iri(params, "default-graph-uri", errors, "_203")? {
        let dataset = match &mut query {
            Query::Select { dataset, .. }
            | Query::Construct { dataset, .. }
            | Query::Describe { dataset, .. }
            | Query::Ask { dataset, .. } => dataset,
        };
        *dataset = Some(QueryDataset {
            default: vec![graph],
            named: None,
        });
    }

    let results = context
        .store
        .query(&query.to_string())
        .await
        .map_err(|e| {
            if e.is_syntax() {
                errors.error_with_debug("_201", e.to_string())
            } else {
                store_failure(errors, "_300")(e)
            }
        })?;
    Ok(Payload::from(results))
}
