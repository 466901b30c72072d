use docchat_api::{
    AskRequest, DocumentFile, HttpBackend, PreviewQuery, RetrievalBackend, SearchQuery,
};
use docchat_core::{AppError, Namespace};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(server.uri()).expect("mock server uri is valid")
}

#[tokio::test]
async fn test_upload_sends_namespace_and_files() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/"))
        .and(body_string_contains("name=\"namespace\""))
        .and(body_string_contains("research"))
        .and(body_string_contains("filename=\"notes.txt\""))
        .and(body_string_contains("retrieval augmented generation"))
        .and(body_string_contains("filename=\"todo.md\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "namespace": "research",
            "files_saved": [
                {"filename": "20240101_000000_notes.txt", "size_kb": 0.03},
                {"filename": "20240101_000000_todo.md", "size_kb": 0.01}
            ],
            "count": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server).await;
    let files = vec![
        DocumentFile::new("notes.txt", b"retrieval augmented generation".to_vec()),
        DocumentFile::new("todo.md", b"- index".to_vec()),
    ];

    let result = backend
        .upload_documents(&Namespace::new("research"), &files)
        .await
        .unwrap();

    assert_eq!(result.count, 2);
    assert_eq!(result.namespace, "research");
    assert_eq!(result.files_saved.len(), 2);
}

#[tokio::test]
async fn test_upload_with_no_files_is_still_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "No files provided."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server).await;
    let err = backend
        .upload_documents(&Namespace::default(), &[])
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Upload failed: 400 (No files provided.)");
}

#[tokio::test]
async fn test_index_passes_namespace_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/index/"))
        .and(query_param("namespace", "legal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "points_upserted": 12,
            "files_indexed": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server).await;
    let result = backend
        .trigger_indexing(&Namespace::new("legal"))
        .await
        .unwrap();

    assert_eq!(result.points_upserted, 12);
    assert_eq!(result.files_indexed, 3);
}

#[tokio::test]
async fn test_ask_sends_structured_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask/"))
        .and(body_json(json!({
            "namespace": "default",
            "question": "What does alpha control?",
            "top_k": 4,
            "alpha": 0.6
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "mode": "DOC_QA",
            "answer": "The blend between BM25 and dense scores.",
            "citations": [{"label": "guide.pdf (page 2)"}, {"label": "faq.md"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server).await;
    let request = AskRequest::new(Namespace::new(""), "What does alpha control?");
    let result = backend.ask_question(&request).await.unwrap();

    assert_eq!(result.answer, "The blend between BM25 and dense scores.");
    let labels: Vec<_> = result.citations.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["guide.pdf (page 2)", "faq.md"]);
}

#[tokio::test]
async fn test_out_of_range_tuning_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask/"))
        .and(body_json(json!({
            "namespace": "default",
            "question": "q",
            "top_k": 0,
            "alpha": 3.5
        })))
        .respond_with(ResponseTemplate::new(422))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server).await;
    let request = AskRequest::new(Namespace::default(), "q")
        .with_top_k(0)
        .with_alpha(3.5);
    let err = backend.ask_question(&request).await.unwrap_err();

    assert_eq!(err.to_string(), "Ask failed: 422");
}

#[tokio::test]
async fn test_server_error_message_contains_status_for_every_operation() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let backend = backend_for(&server).await;
    let ns = Namespace::default();

    let errors = vec![
        backend.upload_documents(&ns, &[]).await.unwrap_err(),
        backend.trigger_indexing(&ns).await.unwrap_err(),
        backend
            .ask_question(&AskRequest::new(ns.clone(), "q"))
            .await
            .unwrap_err(),
        backend
            .search(&SearchQuery::new(ns.clone(), "query"))
            .await
            .unwrap_err(),
        backend
            .preview_chunks(&PreviewQuery::new(ns.clone(), "a.pdf"))
            .await
            .unwrap_err(),
        backend.health().await.unwrap_err(),
    ];

    for err in errors {
        assert!(matches!(err, AppError::Transport { status: 500, .. }));
        assert!(err.to_string().contains("500"), "missing status in {}", err);
    }
}

#[tokio::test]
async fn test_search_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("namespace", "docs"))
        .and(query_param("q", "vector store"))
        .and(query_param("k", "5"))
        .and(query_param("alpha", "0.3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "vector store",
            "namespace": "docs",
            "alpha": 0.3,
            "results": [{
                "score": 0.8123,
                "filename": "arch.md",
                "page": null,
                "namespace": "docs",
                "snippet": "Qdrant holds the vectors"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server).await;
    let mut query = SearchQuery::new(Namespace::new("docs"), "vector store");
    query.k = 5;
    query.alpha = 0.3;

    let response = backend.search(&query).await.unwrap();
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].filename.as_deref(), Some("arch.md"));
    assert_eq!(response.results[0].page, None);
}

#[tokio::test]
async fn test_preview_chunks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ingest/preview"))
        .and(query_param("namespace", "default"))
        .and(query_param("filename", "report.pdf"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "namespace": "default",
            "filename": "report.pdf",
            "total_chunks": 17,
            "preview": [{
                "text": "Executive summary...",
                "metadata": {"filename": "report.pdf", "namespace": "default", "page": 1}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server).await;
    let response = backend
        .preview_chunks(&PreviewQuery::new(Namespace::new(" "), "report.pdf"))
        .await
        .unwrap();

    assert_eq!(response.total_chunks, 17);
    assert_eq!(response.preview[0].metadata.page, Some(1));
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "message": "API is running"
        })))
        .mount(&server)
        .await;

    let backend = backend_for(&server).await;
    let health = backend.health().await.unwrap();
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_malformed_success_body_is_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/index/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let backend = backend_for(&server).await;
    let err = backend
        .trigger_indexing(&Namespace::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Serialization(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    // Port 9 (discard) is not expected to have an HTTP listener.
    let backend = HttpBackend::new("http://127.0.0.1:9").unwrap();
    let err = backend.health().await.unwrap_err();
    assert!(matches!(err, AppError::Network(_)));
}
