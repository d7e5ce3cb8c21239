use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;

/// One served request, as recorded in the access log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditEntry {
    pub operation: String,
    pub requester_ip: String,
    /// A `name=value&...` summary of the request parameters.
    pub parameters: String,
    pub accept: String,
    pub started_at: OffsetDateTime,
    pub elapsed: Duration,
    pub status: u16,
    pub user_agent: String,
}

/// Persists audit entries. Called after the response has been built, off the request path.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, entry: AuditEntry);
}

/// Writes audit entries as structured events to the `osfws::audit` tracing target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuditLog;

#[async_trait]
impl AuditLog for TracingAuditLog {
    async fn record(&self, entry: AuditEntry) {
        let started_at = entry
            .started_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| entry.started_at.to_string());
        info!(
            target: "osfws::audit",
            operation = %entry.operation,
            requester_ip = %entry.requester_ip,
            parameters = %entry.parameters,
            accept = %entry.accept,
            started_at = %started_at,
            elapsed_ms = entry.elapsed.as_secs_f64() * 1000.0,
            status = entry.status,
            user_agent = %entry.user_agent,
            "Request served"
        );
    }
}

/// Keeps audit entries in memory.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn record(&self, entry: AuditEntry) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(status: u16) -> AuditEntry {
        AuditEntry {
            operation: "dataset/read".to_owned(),
            requester_ip: "127.0.0.1".to_owned(),
            parameters: "uri=all".to_owned(),
            accept: "text/turtle".to_owned(),
            started_at: OffsetDateTime::UNIX_EPOCH,
            elapsed: Duration::from_millis(12),
            status,
            user_agent: "curl/8.0".to_owned(),
        }
    }

    #[tokio::test]
    async fn memory_log_keeps_entries_in_order() {
        let log = MemoryAuditLog::new();
        log.record(entry(200)).await;
        log.record(entry(404)).await;

        let statuses = log.entries().iter().map(|e| e.status).collect::<Vec<_>>();
        assert_eq!(statuses, vec![200, 404]);
    }

    #[tokio::test]
    async fn tracing_log_accepts_entries() {
        TracingAuditLog.record(entry(500)).await;
    }
}
