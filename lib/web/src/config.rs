use osfws_engine::Graphs;
use osfws_storage::TripleStore;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

pub const MAX_BODY_SIZE: usize = 1024 * 1024 * 16; // 16MB
pub const DEFAULT_EXECUTION_TIME_LIMIT: Duration = Duration::from_secs(60);

/// Holds the configuration for an OSF web services server.
pub struct ServerConfig {
    /// The triple store the services read from and write to.
    pub store: Arc<dyn TripleStore>,
    /// The IP address or DNS name that the socket binds to.
    pub bind: String,
    /// Whether CORS is enabled.
    pub cors: bool,
    /// How long a service operation may run before the request fails.
    pub execution_time_limit: Duration,
    /// The graphs in which the services keep their records.
    pub graphs: Graphs,
    /// How many payloads each cache region holds.
    pub cache_capacity: NonZeroUsize,
}
