//! Integration tests for the typed document operations: list normalization,
//! failure absorption, resource paths, and triggered downloads.

mod support;

use docbridge::{DirectorySaveTarget, DocumentFilters, DocumentPage, DocumentsApi, RequestContext};
use support::Harness;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(harness: &Harness) -> DocumentsApi {
    DocumentsApi::new(harness.transport.clone())
}

#[tokio::test]
async fn test_list_normalizes_empty_response() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());

    Mock::given(method("GET"))
        .and(path("/api/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documents": [],
            "total": 0,
            "limit": 20,
            "offset": 0,
            "has_more": false
        })))
        .mount(&server)
        .await;

    let page = api(&harness).list(&DocumentFilters::default()).await;
    assert_eq!(page, DocumentPage::empty());
    assert_eq!(page.pages, 1);
    assert_eq!(page.page, 1);
}

#[tokio::test]
async fn test_list_computes_page_math() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());

    Mock::given(method("GET"))
        .and(path("/api/documents"))
        .and(query_param("limit", "20"))
        .and(query_param("offset", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documents": [
                {"id": 41, "insurer": "Acme Mutual", "status": "pending"},
                {"id": 42, "classification": "liability", "confidence": 0.93}
            ],
            "total": 45,
            "limit": 20,
            "offset": 40,
            "has_more": false
        })))
        .mount(&server)
        .await;

    let filters = DocumentFilters {
        offset: 40,
        ..DocumentFilters::default()
    };
    let page = api(&harness).list(&filters).await;

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 45);
    assert_eq!(page.pages, 3);
    assert_eq!(page.page, 3);
    assert_eq!(page.items[0].insurer.as_deref(), Some("Acme Mutual"));
}

#[tokio::test]
async fn test_list_absorbs_failure_into_empty_page() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());

    Mock::given(method("GET"))
        .and(path("/api/documents"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .mount(&server)
        .await;

    let page = api(&harness).list(&DocumentFilters::default()).await;

    // The caller sees a well-formed empty page, never an error...
    assert_eq!(page, DocumentPage::empty());
    // ...while the failure is still reported through the notification path.
    assert_eq!(harness.notification_messages(), ["database down"]);
}

#[tokio::test]
async fn test_list_passes_filters_as_query_params() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());

    Mock::given(method("GET"))
        .and(path("/api/documents"))
        .and(query_param("search", "flood"))
        .and(query_param("status", "pending"))
        .and(query_param("country", "DE"))
        .and(query_param("limit", "50"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documents": [], "total": 0, "limit": 50, "offset": 0, "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filters = DocumentFilters {
        search: Some("flood".to_string()),
        status: Some("pending".to_string()),
        country: Some("DE".to_string()),
        limit: Some(50),
        ..DocumentFilters::default()
    };
    let _ = api(&harness).list(&filters).await;
}

#[tokio::test]
async fn test_get_returns_document() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());

    Mock::given(method("GET"))
        .and(path("/api/documents/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7,
            "insurer": "Acme Mutual",
            "policy_type": "home",
            "country": "NL",
            "confidence": 0.87,
            "status": "pending",
            "source_url": "https://example.com/p/7.pdf"
        })))
        .mount(&server)
        .await;

    let document = api(&harness).get(7).await.unwrap();
    assert_eq!(document.id, 7);
    assert_eq!(document.policy_type.as_deref(), Some("home"));
}

#[tokio::test]
async fn test_approve_posts_to_fixed_path() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());

    Mock::given(method("POST"))
        .and(path("/api/documents/7/approve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7, "status": "approved"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let document = api(&harness).approve(7).await.unwrap();
    assert_eq!(document.status.as_deref(), Some("approved"));
}

#[tokio::test]
async fn test_reclassify_sends_classification_body() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());

    Mock::given(method("POST"))
        .and(path("/api/documents/7/reclassify"))
        .and(body_json(serde_json::json!({"classification": "liability"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7, "classification": "liability"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let document = api(&harness).reclassify(7, "liability").await.unwrap();
    assert_eq!(document.classification.as_deref(), Some("liability"));
}

#[tokio::test]
async fn test_archive_and_delete_use_expected_methods() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());

    Mock::given(method("POST"))
        .and(path("/api/documents/3/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 3, "status": "archived"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/documents/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let archived = api(&harness).archive(3).await.unwrap();
    assert_eq!(archived.status.as_deref(), Some("archived"));
    api(&harness).delete(3).await.unwrap();
}

#[tokio::test]
async fn test_delete_failure_propagates_to_caller() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());

    Mock::given(method("DELETE"))
        .and(path("/api/documents/3"))
        .respond_with(ResponseTemplate::new(409).set_body_string("document locked"))
        .mount(&server)
        .await;

    // Unlike list, every other operation re-raises.
    let result = api(&harness).delete(3).await;
    assert!(result.is_err());
    assert_eq!(harness.notification_messages(), ["document locked"]);
}

#[tokio::test]
async fn test_download_saves_under_content_disposition_filename() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/documents/42/download"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", r#"attachment; filename="policy.pdf""#)
                .set_body_bytes(b"%PDF-1.7 content".to_vec()),
        )
        .mount(&server)
        .await;

    let target = DirectorySaveTarget::new(dir.path());
    let filename = api(&harness).download(42, &target).await.unwrap();

    assert_eq!(filename, "policy.pdf");
    let saved = dir.path().join("policy.pdf");
    assert_eq!(std::fs::read(&saved).unwrap(), b"%PDF-1.7 content");
}

#[tokio::test]
async fn test_download_without_header_uses_fallback_name() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/documents/42/download"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"bytes".to_vec()))
        .mount(&server)
        .await;

    let target = DirectorySaveTarget::new(dir.path());
    let filename = api(&harness).download(42, &target).await.unwrap();

    assert_eq!(filename, "document-42.pdf");
    assert!(dir.path().join("document-42.pdf").exists());
}

#[tokio::test]
async fn test_download_all_uses_archive_fallback() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/documents/download-all"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK archive".to_vec()))
        .mount(&server)
        .await;

    let target = DirectorySaveTarget::new(dir.path());
    let filename = api(&harness)
        .download_all(&DocumentFilters::default(), &target)
        .await
        .unwrap();

    assert_eq!(filename, "documents.zip");
    assert!(dir.path().join("documents.zip").exists());
}

#[tokio::test]
async fn test_download_failure_propagates_and_notifies() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/documents/42/download"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let target = DirectorySaveTarget::new(dir.path());
    let result = api(&harness).download(42, &target).await;

    assert!(result.is_err());
    assert!(
        std::fs::read_dir(dir.path()).unwrap().next().is_none(),
        "no file may be saved on a failed download"
    );
}

#[tokio::test]
async fn test_raw_and_typed_paths_agree() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri());

    Mock::given(method("GET"))
        .and(path("/api/documents/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 5})))
        .expect(2)
        .mount(&server)
        .await;

    let raw = harness
        .transport
        .send(RequestContext::new("/api/documents/5"))
        .await;
    assert!(raw.is_ok());
    let typed = api(&harness).get(5).await;
    assert!(typed.is_ok());
}
