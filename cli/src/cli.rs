use clap::{Parser, Subcommand, ValueHint};
use std::num::NonZeroUsize;
use url::Url;

#[derive(Parser)]
#[command(about, version, name = "osfws")]
/// OSF Web Services HTTP server
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the web services HTTP server
    Serve {
        /// Host and port to listen to
        #[arg(short, long, default_value = "localhost:7878", value_hint = ValueHint::Hostname)]
        bind: String,
        /// Allows cross-origin requests
        #[arg(long)]
        cors: bool,
        /// SPARQL query endpoint of the triple store
        ///
        /// By default an in-memory store is used. Its content is lost when the server stops.
        #[arg(long, value_hint = ValueHint::Url)]
        store_endpoint: Option<Url>,
        /// SPARQL update endpoint of the triple store
        ///
        /// By default updates are sent to the query endpoint.
        #[arg(long, requires = "store_endpoint", value_hint = ValueHint::Url)]
        update_endpoint: Option<Url>,
        /// Number of seconds a web service may run before the request fails
        #[arg(long, default_value_t = 60)]
        execution_time_limit: u64,
        /// Number of payloads kept in each cache region
        #[arg(long, default_value = "1024")]
        cache_capacity: NonZeroUsize,
        /// Graph holding the group memberships of users
        #[arg(long, default_value = "http://purl.org/ontology/wsf#AuthGraph", value_hint = ValueHint::Url)]
        auth_graph: String,
    },
}
