use crate::RegionCache;
use osfws_model::vocab::wsf;
use osfws_model::NamedNode;
use osfws_storage::TripleStore;
use std::sync::Arc;

/// The graphs of the store in which the services keep their records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graphs {
    /// Holds the descriptions of all datasets.
    pub datasets: NamedNode,
    /// Holds the group memberships of users.
    pub auth: NamedNode,
}

impl Default for Graphs {
    fn default() -> Self {
        Self {
            datasets: wsf::DATASETS_GRAPH.into_owned(),
            auth: wsf::AUTH_GRAPH.into_owned(),
        }
    }
}

/// Everything a service operation has access to while it runs.
#[derive(Clone)]
pub struct ServiceContext {
    pub store: Arc<dyn TripleStore>,
    pub cache: Arc<RegionCache>,
    pub graphs: Graphs,
}

impl ServiceContext {
    pub fn new(store: Arc<dyn TripleStore>) -> Self {
        Self {
            store,
            cache: Arc::new(RegionCache::new()),
            graphs: Graphs::default(),
        }
    }

    #[must_use]
    pub fn with_graphs(mut self, graphs: Graphs) -> Self {
        self.graphs = graphs;
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<RegionCache>) -> Self {
        self.cache = cache;
        self
    }
}
