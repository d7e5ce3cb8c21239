//! The HTTP binding of the OSF web services.
//!
//! Every registered service is served at `/ws/<service>/`. A request runs through
//! [`pipeline`](crate::pipeline): method check, request normalization, content negotiation,
//! interface resolution, operation and serialization.

use axum::extract::{Request, State};
use axum::routing::{any, get};
use axum::Router;
use osfws_engine::{RegionCache, ServiceContext};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;
mod error;
mod listing;
mod negotiation;
mod normalizer;
mod pipeline;
mod serializer;
mod state;

pub use config::{ServerConfig, DEFAULT_EXECUTION_TIME_LIMIT, MAX_BODY_SIZE};
pub use error::OsfServerError;
pub use negotiation::negotiate;
pub use serializer::{serialize, ResponseEnvelope};
pub use state::AppState;

/// Creates the routes of every service of `state.registry`, and the service listing at `/ws`.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/ws", get(listing::list_services))
        .route("/ws/", get(listing::list_services));

    for service in state.registry.iter() {
        let handler = move |State(state): State<AppState>, request: Request| {
            pipeline::handle_service_request(service, state, request)
        };
        router = router
            .route(&format!("/ws/{}/", service.name), any(handler))
            .route(&format!("/ws/{}", service.name), any(handler));
    }

    router.with_state(state).layer(TraceLayer::new_for_http())
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from_str(&config.bind)?;

    let context = ServiceContext::new(config.store)
        .with_graphs(config.graphs)
        .with_cache(Arc::new(RegionCache::with_capacity(config.cache_capacity)));
    let state = AppState::new(context).with_execution_time_limit(config.execution_time_limit);
    let app = create_router(state);

    let app = if config.cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
