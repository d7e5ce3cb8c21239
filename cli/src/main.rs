use crate::cli::{Args, Command};
use anyhow::Context;
use clap::Parser;
use osfws_engine::Graphs;
use osfws_model::NamedNode;
use osfws_storage::{MemoryStore, SparqlEndpointStore, TripleStore};
use osfws_web::ServerConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use url::Url;

mod cli;

const DEFAULT_LOG_FILTER: &str = "osfws=info,tower_http=info";

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let matches = Args::parse();
    init_tracing();
    match matches.command {
        Command::Serve {
            bind,
            cors,
            store_endpoint,
            update_endpoint,
            execution_time_limit,
            cache_capacity,
            auth_graph,
        } => {
            let store = open_store(store_endpoint, update_endpoint)?;
            let graphs = Graphs {
                auth: NamedNode::new(&auth_graph)
                    .with_context(|| format!("Invalid auth graph IRI '{auth_graph}'"))?,
                ..Graphs::default()
            };
            osfws_web::serve(ServerConfig {
                store,
                bind,
                cors,
                execution_time_limit: Duration::from_secs(execution_time_limit),
                graphs,
                cache_capacity,
            })
            .await
        }
    }
}

/// Logs to stderr, filtered by `RUST_LOG` when it is set.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_store(
    store_endpoint: Option<Url>,
    update_endpoint: Option<Url>,
) -> anyhow::Result<Arc<dyn TripleStore>> {
    let Some(endpoint) = store_endpoint else {
        info!("Using an in-memory triple store");
        return Ok(Arc::new(
            MemoryStore::new().context("Failed to open the in-memory store")?,
        ));
    };

    let mut store = SparqlEndpointStore::new(endpoint);
    if let Some(update_endpoint) = update_endpoint {
        store = store.with_update_endpoint(update_endpoint);
    }
    info!(
        query = %store.query_endpoint(),
        update = %store.update_endpoint(),
        "Using a remote SPARQL endpoint"
    );
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_cmd::Command;
    use predicates::prelude::*;

    fn cli_command() -> Command {
        let mut command = Command::new(env!("CARGO"));
        command.arg("run").arg("--bin").arg("osfws");
        command.arg("--");
        command
    }

    #[test]
    fn cli_help() {
        cli_command()
            .assert()
            .failure()
            .stdout("")
            .stderr(predicate::str::contains("OSF Web Services"));
    }

    #[test]
    fn cli_serve_help() {
        cli_command()
            .arg("serve")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--store-endpoint"))
            .stdout(predicate::str::contains("--execution-time-limit"))
            .stdout(predicate::str::contains("--cache-capacity"));
    }

    #[test]
    fn cli_update_endpoint_requires_store_endpoint() {
        cli_command()
            .arg("serve")
            .arg("--update-endpoint")
            .arg("http://localhost:8890/sparql")
            .assert()
            .failure()
            .stderr(predicate::str::contains("--store-endpoint"));
    }

    #[test]
    fn cli_cache_capacity_must_not_be_zero() {
        cli_command()
            .arg("serve")
            .arg("--cache-capacity")
            .arg("0")
            .assert()
            .failure()
            .stderr(predicate::str::contains("--cache-capacity"));
    }

    #[test]
    fn clap_debug() {
        use clap::CommandFactory;

        Args::command().debug_assert()
    }
}
