//! End-to-end tests of the HTTP surface: public chat endpoint, health, and
//! bearer-authenticated admin routes.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use newsdesk::api::{create_router, AppState};
use newsdesk::config::{
    ChatConfig, Config, DatabaseConfig, ImporterConfig, RetrievalConfig, ServerConfig,
    SummarizerConfig, SyncConfig,
};
use newsdesk::db::{Database, LibSqlPostStore, PostStore};
use newsdesk::llm::SummarizerProvider;
use newsdesk::models::NewPost;
use newsdesk::retrieval::RetrievalProvider;

const DEFAULT_REPLY: &str = "Thanks — we received your question. We will answer shortly.";

fn test_config(db_url: String, retrieval_url: &str, summarizer_url: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            api_keys: vec!["test-key".to_string()],
            public_url: None,
        },
        database: DatabaseConfig {
            url: db_url,
            auth_token: None,
            local_path: None,
        },
        retrieval: RetrievalConfig {
            api_key: Some("ze-test-key".to_string()),
            base_url: retrieval_url.to_string(),
            collection: "wordpress_posts".to_string(),
            top_k: 2,
            timeout_secs: 2,
        },
        summarizer: Some(SummarizerConfig {
            model: "gpt-4o-mini".to_string(),
            api_key: Some("sk-test".to_string()),
            base_url: Some(summarizer_url.to_string()),
            timeout_secs: 2,
            max_tokens: 300,
            temperature: 0.7,
        }),
        chat: ChatConfig {
            default_response: DEFAULT_REPLY.to_string(),
            use_remote: false,
            remote_url: None,
            remote_timeout_secs: 2,
            enabled: true,
        },
        sync: SyncConfig {
            interval_secs: 0,
            batch_limit: 10,
        },
        importer: ImporterConfig {
            timeout_secs: 5,
            test_timeout_secs: 2,
        },
    }
}

/// Builds the app against mock upstreams and spawns it on a random port.
/// Returns the address, the store (for seeding posts), and the database's
/// temp dir guard.
async fn setup_test_app(
    retrieval_url: &str,
    summarizer_url: &str,
) -> (SocketAddr, Arc<dyn PostStore>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("newsdesk.db");
    let db_url = format!("file:{}", db_path.to_str().unwrap());

    let config = test_config(db_url, retrieval_url, summarizer_url);

    let database = Database::new(&config.database)
        .await
        .expect("Failed to create database");
    let store: Arc<dyn PostStore> = Arc::new(LibSqlPostStore::new(database));

    let retrieval = RetrievalProvider::new(&config.retrieval);
    let summarizer = SummarizerProvider::new(config.summarizer.as_ref());

    let state = AppState::new(config, store.clone(), retrieval, summarizer);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().expect("Failed to get local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    (addr, store, temp_dir)
}

fn completion_response(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn message_endpoint_is_public_and_always_answers_200() {
    let retrieval_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/queries/top-documents"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&retrieval_mock)
        .await;
    let summarizer_mock = MockServer::start().await;

    let (addr, _store, _temp_dir) =
        setup_test_app(&retrieval_mock.uri(), &summarizer_mock.uri()).await;
    let client = reqwest::Client::new();

    // No Authorization header: the chat endpoint is widget-facing.
    let res = client
        .post(format!("http://{addr}/api/v1/message"))
        .json(&json!({ "question": "is anyone there?" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.expect("Failed to parse JSON");
    assert_eq!(body["answer"], DEFAULT_REPLY);
}

#[tokio::test]
async fn message_endpoint_returns_rendered_summary_end_to_end() {
    let retrieval_mock = MockServer::start().await;
    let summarizer_mock = MockServer::start().await;

    let (addr, store, _temp_dir) =
        setup_test_app(&retrieval_mock.uri(), &summarizer_mock.uri()).await;

    let post = store
        .insert_post(&NewPost {
            title: "Harbor cleanup finished".to_string(),
            link: "https://news.example.com/harbor".to_string(),
            content: "<p>Volunteers removed two tons of debris.</p>".to_string(),
            excerpt: "Volunteers removed debris.".to_string(),
            author: "Staff".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/queries/top-documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "path": format!("post_{}", post.id), "score": 0.88 }]
        })))
        .mount(&retrieval_mock)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_response(
            "## Harbor Cleanup\nVolunteers cleared the harbor.",
        )))
        .mount(&summarizer_mock)
        .await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("http://{addr}/api/v1/message"))
        .json(&json!({ "question": "what happened at the harbor?" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.expect("Failed to parse JSON");
    let answer = body["answer"].as_str().expect("answer string");
    assert!(answer.contains("<h2>Harbor Cleanup</h2>"));
    assert!(answer.contains("Volunteers cleared the harbor."));
    assert!(answer.contains("https://news.example.com/harbor"));
}

#[tokio::test]
async fn health_is_public_and_reports_components() {
    let retrieval_mock = MockServer::start().await;
    let summarizer_mock = MockServer::start().await;
    let (addr, store, _temp_dir) =
        setup_test_app(&retrieval_mock.uri(), &summarizer_mock.uri()).await;

    store
        .insert_post(&NewPost {
            title: "one".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let client = reqwest::Client::new();
    let res = client
        .get(format!("http://{addr}/api/v1/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.expect("Failed to parse JSON");
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"]["posts"], 1);
    assert_eq!(body["data"]["retrieval"]["status"], "available");
    assert_eq!(body["data"]["summarizer"]["model"], "gpt-4o-mini");
}

#[tokio::test]
async fn posts_route_requires_bearer_key() {
    let retrieval_mock = MockServer::start().await;
    let summarizer_mock = MockServer::start().await;
    let (addr, _store, _temp_dir) =
        setup_test_app(&retrieval_mock.uri(), &summarizer_mock.uri()).await;

    let client = reqwest::Client::new();

    let res = client
        .get(format!("http://{addr}/api/v1/posts"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(res.status(), 401);
    let body: serde_json::Value = res.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"]["code"], "unauthorized");

    let res = client
        .get(format!("http://{addr}/api/v1/posts"))
        .header("Authorization", "Bearer wrong-key")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(res.status(), 401);
}

#[tokio::test]
async fn posts_route_lists_recent_posts_with_valid_key() {
    let retrieval_mock = MockServer::start().await;
    let summarizer_mock = MockServer::start().await;
    let (addr, store, _temp_dir) =
        setup_test_app(&retrieval_mock.uri(), &summarizer_mock.uri()).await;

    store
        .insert_post(&NewPost {
            title: "Visible post".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let client = reqwest::Client::new();
    let res = client
        .get(format!("http://{addr}/api/v1/posts"))
        .header("Authorization", "Bearer test-key")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.expect("Failed to parse JSON");
    assert_eq!(body["data"]["posts"][0]["title"], "Visible post");
    assert_eq!(body["meta"]["total"], 1);
    // List responses omit the article body.
    assert!(body["data"]["posts"][0].get("content").is_none());
}

#[tokio::test]
async fn delete_post_removes_row_and_retrieval_document() {
    let retrieval_mock = MockServer::start().await;
    let summarizer_mock = MockServer::start().await;
    let (addr, store, _temp_dir) =
        setup_test_app(&retrieval_mock.uri(), &summarizer_mock.uri()).await;

    let post = store
        .insert_post(&NewPost {
            title: "Ephemeral".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/documents/delete-document"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&retrieval_mock)
        .await;

    let client = reqwest::Client::new();
    let res = client
        .delete(format!("http://{addr}/api/v1/posts/{}", post.id))
        .header("Authorization", "Bearer test-key")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(res.status(), 200);
    assert!(store.get_post(post.id).await.unwrap().is_none());
}

#[tokio::test]
async fn missing_post_returns_not_found_envelope() {
    let retrieval_mock = MockServer::start().await;
    let summarizer_mock = MockServer::start().await;
    let (addr, _store, _temp_dir) =
        setup_test_app(&retrieval_mock.uri(), &summarizer_mock.uri()).await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("http://{addr}/api/v1/posts/424242"))
        .header("Authorization", "Bearer test-key")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(res.status(), 404);
    let body: serde_json::Value = res.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"]["code"], "not_found");
}
