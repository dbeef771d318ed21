//! HTTP client tests against a mocked cluster
//!
//! These check the wire shape of every call the pipeline makes and finish
//! with a full transfer through the real client.

use esdump_common::{types::Source, DumpError, Record};
use esdump_pipeline::client::{ClientConfig, ClusterClient, ElasticClient, ElasticConnector};
use esdump_pipeline::job::TransferRequest;
use esdump_pipeline::{JobOutcome, Runner, TransferJob};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::{
    matchers::{basic_auth, body_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn hit(id: &str, n: u64) -> serde_json::Value {
    json!({"_index": "logs", "_id": id, "_score": 1.0, "_source": {"n": n}})
}

fn client(server: &MockServer) -> ElasticClient {
    ElasticClient::new(server.uri(), ClientConfig::default()).unwrap()
}

#[tokio::test]
async fn test_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs/_count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 42, "_shards": {}})))
        .mount(&server)
        .await;

    assert_eq!(client(&server).count("logs").await.unwrap(), 42);
}

#[tokio::test]
async fn test_search_opens_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs/_search"))
        .and(query_param("scroll", "5m"))
        .and(query_param("size", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_scroll_id": "c1",
            "took": 3,
            "hits": {"total": {"value": 2}, "hits": [hit("a", 1), hit("b", 2)]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server).search("logs", 2).await.unwrap();

    assert_eq!(page.cursor, "c1");
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.records[0].id, "a");
    assert_eq!(page.records[1].source["n"], json!(2));
}

#[tokio::test]
async fn test_scroll_and_clear_send_cursor_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/_search/scroll"))
        .and(body_json(json!({"scroll": "5m", "scroll_id": "c1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_scroll_id": "c2",
            "hits": {"hits": [hit("c", 3)]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/_search/scroll"))
        .and(body_json(json!({"scroll_id": "c2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"succeeded": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let page = client.scroll("c1").await.unwrap();
    assert_eq!(page.cursor, "c2");
    assert_eq!(page.records[0].id, "c");

    client.clear_scroll(&page.cursor).await.unwrap();
}

#[tokio::test]
async fn test_upsert_puts_source() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/logs-copy/_doc/doc-1"))
        .and(query_param("refresh", "false"))
        .and(body_json(json!({"msg": "hello", "level": "info"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"result": "created"})))
        .expect(1)
        .mount(&server)
        .await;

    let source: Source = json!({"msg": "hello", "level": "info"}).as_object().cloned().unwrap();
    client(&server).upsert("logs-copy", "doc-1", &source).await.unwrap();
}

#[tokio::test]
async fn test_error_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/logs/_doc/bad"))
        .respond_with(ResponseTemplate::new(400).set_body_string("mapper_parsing_exception"))
        .mount(&server)
        .await;

    let err = client(&server)
        .upsert("logs", "bad", &Source::new())
        .await
        .unwrap_err();

    match err {
        DumpError::Cluster { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "mapper_parsing_exception");
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_search_without_scroll_id_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": {"hits": []}})))
        .mount(&server)
        .await;

    let err = client(&server).search("logs", 10).await.unwrap_err();
    assert!(matches!(err, DumpError::Network(_)));
}

#[tokio::test]
async fn test_basic_auth_is_sent_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs/_mapping"))
        .and(basic_auth("elastic", "changeme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logs": {"mappings": {}}})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig {
        username: Some("elastic".into()),
        password: Some("changeme".into()),
        ..ClientConfig::default()
    };
    let client = ElasticClient::new(server.uri(), config).unwrap();

    let mapping = client.get_mapping("logs").await.unwrap();
    assert_eq!(mapping, json!({"logs": {"mappings": {}}}));
}

#[tokio::test]
async fn test_transfer_to_file_through_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs/_count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 3})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logs/_search"))
        .and(query_param("size", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_scroll_id": "c1",
            "hits": {"hits": [hit("1", 1), hit("2", 2)]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/_search/scroll"))
        .and(body_json(json!({"scroll": "5m", "scroll_id": "c1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_scroll_id": "c2",
            "hits": {"hits": [hit("3", 3)]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/_search/scroll"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("logs.json");
    let job = TransferJob::resolve(TransferRequest {
        input: format!("{}/logs", server.uri()),
        output: output.to_str().unwrap().to_string(),
        page_size: 2,
        concurrency: 2,
        ..TransferRequest::default()
    })
    .unwrap();

    let runner = Runner::new(Arc::new(ElasticConnector::new(ClientConfig::default())));
    let outcome = runner.transfer(&job).await.unwrap();

    match outcome {
        JobOutcome::Records(report) => assert_eq!(report.written(), 3),
        other => panic!("unexpected outcome: {other:?}"),
    }

    let mut ids: Vec<String> = std::fs::read_to_string(&output)
        .unwrap()
        .lines()
        .map(|line| Record::from_json_line(line).unwrap().id)
        .collect();
    ids.sort();
    assert_eq!(ids, ["1", "2", "3"]);
}
