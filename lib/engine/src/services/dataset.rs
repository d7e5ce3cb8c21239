//! The dataset management services: create, read and delete dataset descriptions.

use super::{optional_iri, required_iri, store_failure};
use crate::query::{insert_data, literal, normalize_whitespace, parse_iri};
use crate::{InterfaceDeclaration, Operation, ServiceContext, ServiceDescriptor};
use osfws_model::vocab::{dcterms, rdf, void, xsd};
use osfws_model::{
    CatalogEntry, ErrorCatalog, HttpMethod, Literal, OperationResult, Payload, RequestParams,
    Severity, Triple, RDF_DOCUMENTS,
};
use time::OffsetDateTime;
use tracing::info;

/// The cache region holding the results of `dataset/read`.
pub const READ_CACHE_REGION: &str = "dataset-read";

/// The value of `uri` that makes `dataset/read` list every dataset.
pub const ALL_DATASETS: &str = "all";

pub static CREATE_ERRORS: ErrorCatalog = ErrorCatalog::new(
    "dataset/create",
    &[
        CatalogEntry {
            code: "_200",
            status: 400,
            name: "No unique identifier specified for this dataset",
            description: "No URI defined for this new dataset",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_201",
            status: 400,
            name: "Invalid dataset URI",
            description: "The URI of the dataset is not a valid IRI",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_202",
            status: 400,
            name: "Invalid creator URI",
            description: "The URI of the creator of the dataset is not a valid IRI",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_300",
            status: 500,
            name: "Can't check if the dataset is existing",
            description: "An error occurred when we tried to check if the dataset was existing",
            level: Severity::Fatal,
        },
        CatalogEntry {
            code: "_301",
            status: 500,
            name: "Can't create the dataset",
            description: "An error occurred when we tried to create the new dataset",
            level: Severity::Fatal,
        },
        CatalogEntry {
            code: "_302",
            status: 400,
            name: "Dataset already existing",
            description: "This dataset is already existing in this web services network",
            level: Severity::Warning,
        },
    ],
);

pub static READ_ERRORS: ErrorCatalog = ErrorCatalog::new(
    "dataset/read",
    &[
        CatalogEntry {
            code: "_200",
            status: 400,
            name: "No dataset URI specified",
            description: "No dataset URI has been defined for this query. Use 'all' to list every dataset",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_201",
            status: 400,
            name: "Invalid dataset URI",
            description: "The URI of the dataset is not a valid IRI",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_300",
            status: 500,
            name: "Can't read the dataset",
            description: "An error occurred when we tried to get the description of the dataset",
            level: Severity::Fatal,
        },
        CatalogEntry {
            code: "_301",
            status: 404,
            name: "Dataset not existing",
            description: "The target dataset is not existing in this web services network",
            level: Severity::Warning,
        },
    ],
);

pub static DELETE_ERRORS: ErrorCatalog = ErrorCatalog::new(
    "dataset/delete",
    &[
        CatalogEntry {
            code: "_200",
            status: 400,
            name: "No dataset URI specified",
            description: "No URI defined for the dataset to delete",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_201",
            status: 400,
            name: "Invalid dataset URI",
            description: "The URI of the dataset is not a valid IRI",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_300",
            status: 500,
            name: "Can't check if the dataset is existing",
            description: "An error occurred when we tried to check if the dataset was existing",
            level: Severity::Fatal,
        },
        CatalogEntry {
            code: "_301",
            status: 500,
            name: "Can't delete the dataset",
            description: "An error occurred when we tried to delete the dataset",
            level: Severity::Fatal,
        },
        CatalogEntry {
            code: "_302",
            status: 404,
            name: "Dataset not existing",
            description: "The target dataset is not existing in this web services network",
            level: Severity::Warning,
        },
    ],
);

pub static DATASET_CREATE: ServiceDescriptor = ServiceDescriptor {
    name: "dataset/create",
    method: HttpMethod::Post,
    default_version: "3.0",
    interfaces: &[
        InterfaceDeclaration {
            name: "default",
            compatible_with: "3.0",
            operation: Operation::DatasetCreate,
        },
        InterfaceDeclaration {
            name: "default",
            compatible_with: "1.0",
            operation: Operation::DatasetCreateLegacy,
        },
    ],
    representations: RDF_DOCUMENTS,
    errors: &CREATE_ERRORS,
};

pub static DATASET_READ: ServiceDescriptor = ServiceDescriptor {
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
    ],
    representations: RDF_DOCUMENTS,
    errors: &READ_ERRORS,
};

pub static DATASET_DELETE: ServiceDescriptor = ServiceDescriptor {
    name: "dataset/delete",
    method: HttpMethod::Get,
    default_version: "3.0",
    interfaces: &[InterfaceDeclaration {
        name: "default",
        compatible_with: "3.0",
        operation: Operation::DatasetDelete,
    }],
    representations: RDF_DOCUMENTS,
    errors: &DELETE_ERRORS,
};

/// Registers a new dataset.
///
/// Absent `title` and `description` are recorded as empty literals. Unless `legacy` is set, the
/// current date is recorded as the creation date. Returns the description that was stored.
pub async fn create(
    params: &RequestParams,
    context: &ServiceContext,
    legacy: bool,
) -> OperationResult {
    let errors = &CREATE_ERRORS;
    let dataset = required_iri(params, "uri", errors, "_200", "_201")?;
    let creator = optional_iri(params, "creator", errors, "_202")?;
    let graph = &context.graphs.datasets;

    let exists = context
        .store
        .ask(&format!(
            "ASK {{ GRAPH {graph} {{ {dataset} a {} }} }}",
            void::DATASET
        ))
        .await
        .map_err(store_failure(errors, "_300"))?;
    if exists {
        return Err(errors.error_with_debug("_302", dataset.as_str()));
    }

    let mut description = vec![
        Triple::new(dataset.clone(), rdf::TYPE, void::DATASET.into_owned()),
        Triple::new(
            dataset.clone(),
            dcterms::TITLE,
            literal(params.get_or_empty("title")),
        ),
        Triple::new(
            dataset.clone(),
            dcterms::DESCRIPTION,
            literal(params.get_or_empty("description")),
        ),
    ];
    if let Some(creator) = creator {
        description.push(Triple::new(dataset.clone(), dcterms::CREATOR, creator));
    }
    if !legacy {
        let today = OffsetDateTime::now_utc().date();
        description.push(Triple::new(
            dataset.clone(),
            dcterms::CREATED,
            Literal::new_typed_literal(today.to_string(), xsd::DATE),
        ));
    }

    context
        .store
        .update(&insert_data(graph, &description))
        .await
        .map_err(store_failure(errors, "_301"))?;

    info!(dataset = dataset.as_str(), "Dataset created");
    Ok(Payload::Graph(description))
}

/// Describes one dataset, or all of them when `uri` is `all`.
///
/// Results are cached in [`READ_CACHE_REGION`]. With `legacy` set, only the type, the title and
/// the description of the datasets are returned.
pub async fn read(params: &RequestParams, context: &ServiceContext, legacy: bool) -> OperationResult {
    let errors = &READ_ERRORS;
    let uri = normalize_whitespace(params.get_or_empty("uri"));
    if uri.is_empty() {
        return Err(errors.error("_200"));
    }

    let cache_key = format!("{}|{uri}", if legacy { "1.0" } else { "3.0" });
    if let Some(payload) = context.cache.get(READ_CACHE_REGION, &cache_key) {
        return Ok(payload);
    }
    let generation = context.cache.generation(READ_CACHE_REGION);

    let selection = if uri == ALL_DATASETS {
        String::new()
    } else {
        let dataset = parse_iri(&uri).map_err(|e| errors.error_with_debug("_201", e.to_string()))?;
        format!("VALUES ?dataset {{ {dataset} }}")
    };
    let filter = if legacy {
        format!(
            "FILTER(?p IN ({}, {}, {}))",
            rdf::TYPE,
            dcterms::TITLE,
            dcterms::DESCRIPTION
        )
    } else {
        String::new()
    };
    let query = format!(
        "CONSTRUCT {{ ?dataset ?p ?o }} WHERE {{ GRAPH {} {{ {selection} ?dataset a {} ; ?p ?o . {filter} }} }}",
        context.graphs.datasets,
        void::DATASET,
    );

    let mut triples = context
        .store
        .construct(&query)
        .await
        .map_err(store_failure(errors, "_300"))?;
    if triples.is_empty() && uri != ALL_DATASETS {
        return Err(errors.error_with_debug("_301", uri));
    }
    triples.sort_by_cached_key(ToString::to_string);

    let payload = Payload::Graph(triples);
    context
        .cache
        .insert(READ_CACHE_REGION, generation, cache_key, payload.clone());
    Ok(payload)
}

/// Deletes the description of a dataset and the graph holding its records.
pub async fn delete(params: &RequestParams, context: &ServiceContext) -> OperationResult {
    let errors = &DELETE_ERRORS;
    let dataset = required_iri(params, "uri", errors, "_200", "_201")?;
    let graph = &context.graphs.datasets;

    let exists = context
        .store
        .ask(&format!(
            "ASK {{ GRAPH {graph} {{ {dataset} a {} }} }}",
            void::DATASET
        ))
        .await
        .map_err(store_failure(errors, "_300"))?;
    if !exists {
        return Err(errors.error_with_debug("_302", dataset.as_str()));
    }

    context
        .store
        .update(&format!(
            "DELETE WHERE {{ GRAPH {graph} {{ {dataset} ?p ?o }} }} ;\nDROP SILENT GRAPH {dataset}"
        ))
        .await
        .map_err(store_failure(errors, "_301"))?;

    info!(dataset = dataset.as_str(), "Dataset deleted");
    Ok(Payload::Empty)
}
