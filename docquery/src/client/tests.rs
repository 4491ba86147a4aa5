//! Transport client tests against a mock backend.
//!
//! Tests cover:
//! 1. Document listing success and decoding
//! 2. Upload multipart format (field name, filename, content)
//! 3. Client-side upload preconditions (no server contact)
//! 4. Delete success and 404 -> NotFound mapping
//! 5. Query request body shape and top_k clamping
//! 6. Client-side query precondition (blank text)
//! 7. Server error mapping with `detail` extraction
//! 8. Network error mapping (unreachable server)

use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::ClientError;

/// Helper to create a client pointing at a mock server.
fn test_client(base_url: &str) -> ApiClient {
    let config = Config {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        top_k: 5,
        rerank: true,
    };
    ApiClient::new(&config).unwrap()
}

/// Helper to build a wire-format document body.
fn document_body(id: i64, filename: &str) -> serde_json::Value {
    json!({
        "id": id,
        "filename": filename,
        "content": "file content",
        "metadata": null,
        "created_at": "2024-01-15T10:30:00Z",
        "updated_at": null
    })
}

// =============================================================================
// Test 1: Document Listing
// =============================================================================

#[tokio::test]
async fn test_list_documents_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            document_body(1, "notes.txt"),
            document_body(2, "guide.md"),
        ])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let documents = client.list_documents().await.unwrap();

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].id, 1);
    assert_eq!(documents[0].filename, "notes.txt");
    assert_eq!(documents[1].filename, "guide.md");
}

#[tokio::test]
async fn test_list_documents_identical_fetches_are_identical() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([document_body(1, "notes.txt")])),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let first = client.list_documents().await.unwrap();
    let second = client.list_documents().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_get_document_missing_maps_to_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/documents/42"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Document not found"})),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let err = client.get_document(42).await.unwrap_err();

    assert!(matches!(err, ClientError::NotFound(_)));
}

// =============================================================================
// Test 2: Upload Multipart Format
// =============================================================================

#[tokio::test]
async fn test_upload_sends_multipart_file_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/documents/upload"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"notes.txt\""))
        .and(body_string_contains("meeting notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_body(1, "notes.txt")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let doc = client
        .upload_document(b"meeting notes".to_vec(), "notes.txt")
        .await
        .unwrap();

    assert_eq!(doc.id, 1);
    assert_eq!(doc.filename, "notes.txt");
}

// =============================================================================
// Test 3: Upload Preconditions Never Reach the Server
// =============================================================================

#[tokio::test]
async fn test_upload_rejects_empty_filename_without_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let err = client.upload_document(b"data".to_vec(), "").await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_upload_rejects_unsupported_extension_without_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());

    for filename in ["report.pdf", "archive.tar.gz", "README"] {
        let err = client
            .upload_document(b"data".to_vec(), filename)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)), "{filename}");
    }
}

#[tokio::test]
async fn test_upload_accepts_md_and_txt_case_insensitively() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/documents/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_body(1, "NOTES.TXT")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    client
        .upload_document(b"a".to_vec(), "NOTES.TXT")
        .await
        .unwrap();
    client
        .upload_document(b"b".to_vec(), "guide.Md")
        .await
        .unwrap();
}

// =============================================================================
// Test 4: Delete
// =============================================================================

#[tokio::test]
async fn test_delete_document_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/documents/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    client.delete_document(7).await.unwrap();
}

#[tokio::test]
async fn test_delete_document_404_maps_to_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/documents/7"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Document not found"})),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let err = client.delete_document(7).await.unwrap_err();

    match err {
        ClientError::NotFound(message) => assert_eq!(message, "Document not found"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

// =============================================================================
// Test 5: Query Request Body
// =============================================================================

#[tokio::test]
async fn test_query_sends_json_contract() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_json(json!({
            "query": "What is X?",
            "top_k": 3,
            "rerank": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "What is X?",
            "answer": "X is a thing.",
            "sources": [
                {"text": "X is defined as...", "document_id": 1, "score": 0.87, "metadata": null}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let response = client.query("What is X?", 3, false).await.unwrap();

    assert_eq!(response.answer, "X is a thing.");
    assert_eq!(response.sources.len(), 1);
    assert_eq!(response.sources[0].document_id, 1);
    assert_eq!(response.sources[0].score_display(), "0.87");
}

#[tokio::test]
async fn test_query_clamps_top_k_to_backend_bounds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_json(json!({
            "query": "q",
            "top_k": 20,
            "rerank": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "q",
            "answer": "a",
            "sources": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    client.query("q", 100, true).await.unwrap();
}

// =============================================================================
// Test 6: Query Precondition
// =============================================================================

#[tokio::test]
async fn test_query_rejects_blank_text_without_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let err = client.query("   \t\n", 5, true).await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
}

// =============================================================================
// Test 7: Server Error Mapping
// =============================================================================

#[tokio::test]
async fn test_server_error_extracts_detail_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "index unavailable"})),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let err = client.list_documents().await.unwrap_err();

    match err {
        ClientError::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "index unavailable");
        }
        other => panic!("expected Server, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_falls_back_to_raw_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let err = client.list_documents().await.unwrap_err();

    match err {
        ClientError::Server { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("expected Server, got {other:?}"),
    }
}

// =============================================================================
// Test 8: Network Error Mapping
// =============================================================================

#[tokio::test]
async fn test_unreachable_server_maps_to_network_error() {
    // Reserve a port, then drop the listener so connections are refused.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = test_client(&format!("http://{addr}"));
    let err = client.list_documents().await.unwrap_err();

    assert!(matches!(err, ClientError::Network(_)));
}
