use crate::error::OsfServerError;
use crate::negotiation::negotiate;
use crate::normalizer::{http_method, normalize};
use crate::serializer::{serialize, ResponseEnvelope};
use crate::AppState;
use axum::body::Body;
use axum::extract::Request;
use axum::http::header::ACCEPT;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use osfws_engine::{execute, resolve, AuditEntry, ServiceDescriptor};
use osfws_model::{RequestParams, ServiceError};
use std::sync::Arc;
use std::time::Instant;
use time::OffsetDateTime;
use tracing::{debug, error};

/// Serves one request of `service`.
///
/// The request goes through the method check, the normalizer, content negotiation, interface
/// resolution, the operation and the serializer, in this order. A failed step ends the pipeline.
/// Once the response is built, the request is handed to the audit log on a separate task.
pub async fn handle_service_request(
    service: &'static ServiceDescriptor,
    state: AppState,
    request: Request,
) -> Response {
    let started_at = OffsetDateTime::now_utc();
    let timer = Instant::now();
    let (parts, body) = request.into_parts();

    let (params, response) = match accept_request(service, &parts, body).await {
        Ok(params) => {
            let response = match respond(service, &state, &params).await {
                Ok(envelope) => envelope.into_response(),
                Err(e) => rejected(service, e),
            };
            (Some(params), response)
        }
        Err(e) => (None, rejected(service, e)),
    };

    let entry = AuditEntry {
        operation: service.name.to_owned(),
        requester_ip: params
            .as_ref()
            .map(|p| p.requester_ip().to_owned())
            .unwrap_or_default(),
        parameters: params.as_ref().map(RequestParams::summary).unwrap_or_default(),
        accept: parts
            .headers
            .get(ACCEPT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned(),
        started_at,
        elapsed: timer.elapsed(),
        status: response.status().as_u16(),
        user_agent: params
            .as_ref()
            .map(|p| p.user_agent().to_owned())
            .unwrap_or_default(),
    };
    let audit = Arc::clone(&state.audit);
    tokio::spawn(async move { audit.record(entry).await });

    response
}

/// Checks the method, then reads the parameters of the request.
async fn accept_request(
    service: &'static ServiceDescriptor,
    parts: &Parts,
    body: Body,
) -> Result<RequestParams, OsfServerError> {
    match http_method(&parts.method) {
        Some(method) if method == service.method => normalize(parts, body, method).await,
        _ => Err(OsfServerError::MethodNotAllowed {
            method: parts.method.to_string(),
            allowed: service.method,
        }),
    }
}

async fn respond(
    service: &'static ServiceDescriptor,
    state: &AppState,
    params: &RequestParams,
) -> Result<ResponseEnvelope, OsfServerError> {
    let negotiated = negotiate(params.headers(), service.representations)?;

    let result = match resolve(params.interface(), params.version(), service) {
        Ok(binding) => {
            let limit = state.execution_time_limit;
            tokio::time::timeout(limit, execute(&binding, params, &state.context))
                .await
                .map_err(|_| {
                    OsfServerError::Fatal(format!(
                        "The {} web service did not complete within {} seconds",
                        service.name,
                        limit.as_secs_f64()
                    ))
                })?
        }
        Err(e) => {
            debug!(service = service.name, error = %e, "Interface resolution failed");
            Err(ServiceError::from(e))
        }
    };
    Ok(serialize(&result, &negotiated))
}

fn rejected(service: &'static ServiceDescriptor, e: OsfServerError) -> Response {
    if e.status().is_server_error() {
        error!(service = service.name, error = %e, "Request failed");
    } else {
        debug!(service = service.name, error = %e, "Request rejected");
    }
    e.into_response()
}
