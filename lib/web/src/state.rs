use crate::config::DEFAULT_EXECUTION_TIME_LIMIT;
use osfws_engine::{AuditLog, ServiceContext, ServiceRegistry, TracingAuditLog};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ServiceRegistry>,
    pub context: ServiceContext,
    pub audit: Arc<dyn AuditLog>,
    pub execution_time_limit: Duration,
}

impl AppState {
    /// Hosts every built-in service and logs requests with [`TracingAuditLog`].
    pub fn new(context: ServiceContext) -> Self {
        Self {
            registry: Arc::new(ServiceRegistry::standard()),
            context,
            audit: Arc::new(TracingAuditLog),
            execution_time_limit: DEFAULT_EXECUTION_TIME_LIMIT,
        }
    }

    #[must_use]
    pub fn with_audit_log(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = audit;
        self
    }

    #[must_use]
    pub fn with_execution_time_limit(mut self, limit: Duration) -> Self {
        self.execution_time_limit = limit;
        self
    }
}
