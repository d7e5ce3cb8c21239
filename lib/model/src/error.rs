use serde::Serialize;
use std::fmt;

/// How serious a service error is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Notice,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Notice => "notice",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a service's error catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    /// The catalog-local identifier, e.g., `_300`.
    pub code: &'static str,
    /// The HTTP status code that is reported with this error.
    pub status: u16,
    pub name: &'static str,
    pub description: &'static str,
    pub level: Severity,
}

/// The immutable table that maps a service's error identifiers to their descriptions.
///
/// Catalogs are declared as `static` items, one per service, and are never changed at runtime.
#[derive(Debug)]
pub struct ErrorCatalog {
    service: &'static str,
    entries: &'static [CatalogEntry],
}

impl ErrorCatalog {
    pub const fn new(service: &'static str, entries: &'static [CatalogEntry]) -> Self {
        Self { service, entries }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn lookup(&self, code: &str) -> Option<&'static CatalogEntry> {
        self.entries.iter().find(|entry| entry.code == code)
    }

    /// Creates the error registered under `code`.
    pub fn error(&self, code: &str) -> ServiceError {
        self.make_error(code, None)
    }

    /// Creates the error registered under `code` and attaches a diagnostic, usually the message
    /// reported by the triple store.
    pub fn error_with_debug(&self, code: &str, debug_info: impl Into<String>) -> ServiceError {
        self.make_error(code, Some(debug_info.into()))
    }

    fn make_error(&self, code: &str, debug_info: Option<String>) -> ServiceError {
        match self.lookup(code) {
            Some(entry) => ServiceError::from_entry(self.service, entry, debug_info),
            None => ServiceError {
                id: error_id(self.service, code),
                webservice: self.service.to_owned(),
                status: 500,
                name: "Unknown error".to_owned(),
                description: format!("The error '{code}' is not registered for this service."),
                debug_info,
                level: Severity::Fatal,
            },
        }
    }
}

/// A structured error returned by a service operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{id} ({status}): {name}")]
pub struct ServiceError {
    /// A stable identifier of the form `WS-<SERVICE>-<code>`.
    pub id: String,
    pub webservice: String,
    #[serde(skip)]
    pub status: u16,
    pub name: String,
    pub description: String,
    #[serde(rename = "debugInfo", skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<String>,
    pub level: Severity,
}

impl ServiceError {
    pub fn from_entry(
        service: &str,
        entry: &CatalogEntry,
        debug_info: Option<String>,
    ) -> Self {
        Self {
            id: error_id(service, entry.code),
            webservice: service.to_owned(),
            status: entry.status,
            name: entry.name.to_owned(),
            description: entry.description.to_owned(),
            debug_info,
            level: entry.level,
        }
    }

    /// The catalog-local part of the identifier, e.g., `_300`.
    pub fn code(&self) -> &str {
        self.id
            .rfind('-')
            .map_or(self.id.as_str(), |index| &self.id[index + 1..])
    }
}

fn error_id(service: &str, code: &str) -> String {
    let service = service.replace('/', "-").to_ascii_uppercase();
    format!("WS-{service}-{code}")
}
