use crate::services::{auth, dataset, sparql};
use crate::{InterfaceBinding, Operation, ServiceContext};
use osfws_model::{OperationResult, RequestParams};
use tracing::{debug, error, info};

/// Runs the operation `binding` is bound to.
///
/// Store failures never escape as faults: they are turned into the structured errors of the
/// service's catalog. After a successful operation, the cache regions declared by
/// [`Operation::invalidated_regions`] are invalidated.
pub async fn execute(
    binding: &InterfaceBinding,
    params: &RequestParams,
    context: &ServiceContext,
) -> OperationResult {
    debug!(
        service = binding.service,
        version = binding.version,
        operation = ?binding.operation,
        "Executing operation"
    );

    let result = match binding.operation {
        Operation::DatasetCreate => dataset::create(params, context, false).await,
        Operation::DatasetCreateLegacy => dataset::create(params, context, true).await,
        Operation::DatasetRead => dataset::read(params, context, false).await,
        Operation::DatasetReadLegacy => dataset::read(params, context, true).await,
        Operation::DatasetDelete => dataset::delete(params, context).await,
        Operation::AuthRegistrarUser => auth::registrar_user(params, context).await,
        Operation::AuthLister => auth::lister(params, context).await,
        Operation::SparqlQuery => sparql::query(params, context).await,
    };

    match &result {
        Ok(_) => {
            for region in binding.operation.invalidated_regions() {
                context.cache.invalidate(region);
            }
        }
        Err(e) if e.status >= 500 => {
            error!(service = binding.service, error = %e, debug_info = ?e.debug_info, "Operation failed");
        }
        Err(e) => {
            info!(service = binding.service, error = %e, "Operation rejected the request");
        }
    }
    result
}
