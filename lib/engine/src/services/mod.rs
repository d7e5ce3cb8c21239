//! The web services hosted by the platform.
//!
//! Every service declares a static [`ServiceDescriptor`](crate::ServiceDescriptor) and an
//! [`ErrorCatalog`] next to the operations of its source interfaces.

pub mod auth;
pub mod dataset;
pub mod sparql;

use crate::query::{normalize_whitespace, parse_iri};
use osfws_model::{ErrorCatalog, NamedNode, RequestParams, ServiceError};
use osfws_storage::StoreError;
use tracing::warn;

/// Reads the identifier `name`. Fails with `missing` when it is absent or blank, and with
/// `invalid` when it is not an IRI.
fn required_iri(
    params: &RequestParams,
    name: &str,
    errors: &ErrorCatalog,
    missing: &str,
    invalid: &str,
) -> Result<NamedNode, ServiceError> {
    optional_iri(params, name, errors, invalid)?.ok_or_else(|| errors.error(missing))
}

/// Reads the identifier `name`, if present. Fails with `invalid` when it is not an IRI.
fn optional_iri(
    params: &RequestParams,
    name: &str,
    errors: &ErrorCatalog,
    invalid: &str,
) -> Result<Option<NamedNode>, ServiceError> {
    let value = normalize_whitespace(params.get_or_empty(name));
    if value.is_empty() {
        return Ok(None);
    }
    parse_iri(&value)
        .map(Some)
        .map_err(|e| errors.error_with_debug(invalid, format!("{name}: {e}")))
}

/// Maps a store failure to the catalog entry `code`, keeping the store's diagnostic.
fn store_failure<'a>(
    errors: &'a ErrorCatalog,
    code: &'a str,
) -> impl Fn(StoreError) -> ServiceError + 'a {
    move |error| {
        warn!(service = errors.service(), code, %error, "Triple store call failed");
        errors.error_with_debug(code, error.to_string())
    }
}
