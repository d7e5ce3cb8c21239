use async_trait::async_trait;
use axum::http::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, ALLOW, CONTENT_ENCODING, CONTENT_TYPE,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum_test::TestServer;
use flate2::read::GzDecoder;
use osfws_engine::{AuditEntry, MemoryAuditLog, ServiceContext};
use osfws_storage::{MemoryStore, StoreError, StoreResults, TripleStore};
use osfws_web::{create_router, AppState};
use serde_json::Value;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const DS1: &str = "http://example.org/ds1";

/// Counts the calls that reach an in-memory store.
struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::new().unwrap(),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TripleStore for CountingStore {
    async fn query(&self, query: &str) -> Result<StoreResults, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.query(query).await
    }

    async fn update(&self, update: &str) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.update(update).await
    }
}

struct FailingStore;

#[async_trait]
impl TripleStore for FailingStore {
    async fn query(&self, _query: &str) -> Result<StoreResults, StoreError> {
        Err(StoreError::Evaluation("the store is down".to_owned()))
    }

    async fn update(&self, _update: &str) -> Result<(), StoreError> {
        Err(StoreError::Evaluation("the store is down".to_owned()))
    }
}

struct SlowStore;

#[async_trait]
impl TripleStore for SlowStore {
    async fn query(&self, _query: &str) -> Result<StoreResults, StoreError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(StoreResults::Boolean(false))
    }

    async fn update(&self, _update: &str) -> Result<(), StoreError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }
}

fn server_with_state(state: AppState) -> TestServer {
    TestServer::new(create_router(state)).unwrap()
}

fn server(store: Arc<dyn TripleStore>) -> (TestServer, Arc<MemoryAuditLog>) {
    let audit = Arc::new(MemoryAuditLog::new());
    let state = AppState::new(ServiceContext::new(store)).with_audit_log(audit.clone());
    (server_with_state(state), audit)
}

async fn audit_entries(audit: &MemoryAuditLog, count: usize) -> Vec<AuditEntry> {
    for _ in 0..100 {
        let entries = audit.entries();
        if entries.len() >= count {
            return entries;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    audit.entries()
}

#[tokio::test]
async fn unsupported_method_is_rejected_before_the_store() {
    let store = CountingStore::new();
    let (server, audit) = server(Arc::clone(&store) as Arc<dyn TripleStore>);

    let response = server
        .method(Method::PUT, "/ws/dataset/read/")
        .add_query_param("uri", "all")
        .await;
    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[ALLOW], "GET");

    let response = server.get("/ws/dataset/create/").add_query_param("uri", DS1).await;
    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[ALLOW], "POST");

    assert_eq!(store.calls(), 0);
    let entries = audit_entries(&audit, 2).await;
    assert_eq!(
        entries.iter().map(|e| e.status).collect::<Vec<_>>(),
        vec![405, 405]
    );
}

#[tokio::test]
async fn json_is_not_acceptable_for_an_rdf_only_service() {
    let store = CountingStore::new();
    let (server, _) = server(Arc::clone(&store) as Arc<dyn TripleStore>);

    let response = server
        .get("/ws/auth/registrar/user/")
        .add_query_param("action", "join")
        .add_query_param("user_uri", "http://example.org/users/alice")
        .add_query_param("group_uri", "http://example.org/groups/editors")
        .add_header(ACCEPT, HeaderValue::from_static("application/json"))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
    assert!(response.text().contains("application/rdf+xml, text/rdf+n3"));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn unusable_negotiation_headers_are_rejected_before_the_store() {
    let store = CountingStore::new();
    let (server, audit) = server(Arc::clone(&store) as Arc<dyn TripleStore>);
    let read = || server.get("/ws/dataset/read/").add_query_param("uri", "all");

    let response = read()
        .add_header(ACCEPT, HeaderValue::from_static("text/turtle;q=2"))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");

    let response = read()
        .add_header(ACCEPT_LANGUAGE, HeaderValue::from_static("fr-CA, en-US"))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");

    assert_eq!(store.calls(), 0);
    let entries = audit_entries(&audit, 2).await;
    assert_eq!(
        entries.iter().map(|e| e.status).collect::<Vec<_>>(),
        vec![406, 406]
    );
}

#[tokio::test]
async fn quoted_commas_in_media_range_parameters() {
    let (server, _) = server(Arc::new(MemoryStore::new().unwrap()));
    let response = server
        .get("/ws/dataset/read/")
        .add_query_param("uri", "all")
        .add_header(
            ACCEPT,
            HeaderValue::from_static("text/turtle;profile=\"urn:a,urn:b\", application/json;q=0.5"),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/turtle; charset=utf-8");
}

#[tokio::test]
async fn create_dataset_with_only_a_uri() {
    let (server, audit) = server(Arc::new(MemoryStore::new().unwrap()));

    let response = server
        .post("/ws/dataset/create/")
        .add_header(ACCEPT, HeaderValue::from_static("text/turtle"))
        .form(&[("uri", DS1)])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/turtle; charset=utf-8");
    let body = response.text();
    assert!(body.contains(DS1), "{body}");
    assert!(body.contains("dcterms:title \"\""), "{body}");
    assert!(body.contains("dcterms:created"), "{body}");

    let entries = audit_entries(&audit, 1).await;
    assert_eq!(entries[0].operation, "dataset/create");
    assert_eq!(entries[0].status, 200);
    assert_eq!(entries[0].parameters, format!("uri={DS1}"));
    assert_eq!(entries[0].accept, "text/turtle");
}

#[tokio::test]
async fn read_back_created_dataset_as_json() {
    let (server, _) = server(Arc::new(MemoryStore::new().unwrap()));
    server
        .post("/ws/dataset/create")
        .form(&[("uri", DS1), ("title", "First")])
        .expect_success()
        .await;

    let response = server
        .get("/ws/dataset/read/")
        .add_query_param("uri", DS1)
        .add_header(ACCEPT, HeaderValue::from_static("application/json"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let json = response.json::<Value>();
    assert_eq!(json["resultset"]["subject"][0]["uri"], DS1);
}

#[tokio::test]
async fn store_failure_during_join_is_a_catalog_error() {
    let (server, _) = server(Arc::new(FailingStore));

    let response = server
        .get("/ws/auth/registrar/user/")
        .add_query_param("action", "join")
        .add_query_param("user_uri", "http://example.org/users/alice")
        .add_query_param("group_uri", "http://example.org/groups/editors")
        .add_header(ACCEPT, HeaderValue::from_static("text/rdf+n3"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/rdf+n3; charset=utf-8");
    let body = response.text();
    assert!(body.contains("WS-AUTH-REGISTRAR-USER-_300"), "{body}");
    assert!(body.contains("the store is down"), "{body}");
}

#[tokio::test]
async fn versions_are_resolved() {
    let (server, _) = server(Arc::new(MemoryStore::new().unwrap()));
    let read = |version: &'static str, interface: &'static str| {
        server
            .get("/ws/dataset/read/")
            .add_query_param("uri", "all")
            .add_query_param("version", version)
            .add_query_param("interface", interface)
            .add_header(ACCEPT, HeaderValue::from_static("application/json"))
    };

    assert_eq!(read("", "").await.status_code(), StatusCode::OK);
    assert_eq!(read("1.0", "default").await.status_code(), StatusCode::OK);

    let response = read("2.0", "default").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["id"], "WS-DATASET-READ-_002");

    let response = read("", "semantic").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["id"], "WS-DATASET-READ-_001");
}

#[tokio::test]
async fn quality_ties_go_to_the_first_declared_representation() {
    let (server, _) = server(Arc::new(MemoryStore::new().unwrap()));
    let response = server
        .get("/ws/dataset/read/")
        .add_query_param("uri", "all")
        .add_header(ACCEPT, HeaderValue::from_static("text/rdf+n3, text/turtle;q=1.0"))
        .await;
    assert_eq!(response.headers()[CONTENT_TYPE], "text/turtle; charset=utf-8");
}

#[tokio::test]
async fn gzip_encoded_sparql_results() {
    let (server, _) = server(Arc::new(MemoryStore::new().unwrap()));
    server
        .post("/ws/dataset/create/")
        .form(&[("uri", DS1), ("title", "First")])
        .expect_success()
        .await;

    let response = server
        .get("/ws/sparql/")
        .add_query_param(
            "query",
            "SELECT ?title WHERE { GRAPH ?g { ?s <http://purl.org/dc/terms/title> ?title } }",
        )
        .add_header(ACCEPT, HeaderValue::from_static("text/csv"))
        .add_header(ACCEPT_ENCODING, HeaderValue::from_static("gzip"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_ENCODING], "gzip");
    let mut csv = String::new();
    GzDecoder::new(response.as_bytes().as_ref())
        .read_to_string(&mut csv)
        .unwrap();
    assert_eq!(csv, "title\r\nFirst\r\n");
}

#[tokio::test]
async fn slow_operations_are_fatal() {
    let state = AppState::new(ServiceContext::new(Arc::new(SlowStore)))
        .with_execution_time_limit(Duration::from_millis(50));
    let server = server_with_state(state);

    let response = server
        .get("/ws/dataset/read/")
        .add_query_param("uri", "all")
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
}

#[tokio::test]
async fn lists_services() {
    let (server, _) = server(Arc::new(MemoryStore::new().unwrap()));
    let json = server.get("/ws").await.json::<Value>();
    let services = json["services"].as_array().unwrap();
    assert_eq!(services.len(), 6);
    assert_eq!(services[0]["name"], "dataset/create");
    assert_eq!(services[0]["method"], "POST");
    assert_eq!(services[0]["versions"], serde_json::json!(["3.0", "1.0"]));
}
