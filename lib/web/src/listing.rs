use crate::AppState;
use axum::extract::State;
use axum::Json;
use osfws_engine::ServiceDescriptor;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ServiceListing {
    pub services: Vec<ServiceSummary>,
}

#[derive(Debug, Serialize)]
pub struct ServiceSummary {
    pub name: &'static str,
    pub endpoint: String,
    pub method: &'static str,
    pub default_version: &'static str,
    pub versions: Vec<&'static str>,
    pub interfaces: Vec<&'static str>,
    pub representations: Vec<&'static str>,
}

impl From<&ServiceDescriptor> for ServiceSummary {
    fn from(service: &ServiceDescriptor) -> Self {
        Self {
            name: service.name,
            endpoint: format!("/ws/{}/", service.name),
            method: service.method.as_str(),
            default_version: service.default_version,
            versions: service.versions(),
            interfaces: service.interface_names(),
            representations: service
                .representations
                .iter()
                .map(|representation| representation.media_type())
                .collect(),
        }
    }
}

/// Describes every hosted service.
pub async fn list_services(State(state): State<AppState>) -> Json<ServiceListing> {
    Json(ServiceListing {
        services: state.registry.iter().map(ServiceSummary::from).collect(),
    })
}
