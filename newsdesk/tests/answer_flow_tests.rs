//! Tier-by-tier behavior of the answer flow, with wiremock standing in for
//! the retrieval and summarization services.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use newsdesk::config::{ChatConfig, DatabaseConfig, RetrievalConfig, SummarizerConfig};
use newsdesk::db::{Database, LibSqlPostStore, PostStore};
use newsdesk::llm::SummarizerProvider;
use newsdesk::models::NewPost;
use newsdesk::retrieval::RetrievalProvider;
use newsdesk::services::AnswerService;

const DEFAULT_REPLY: &str = "Thanks — we received your question. We will answer shortly.";

async fn test_store() -> Arc<dyn PostStore> {
    let dir = tempfile::TempDir::new().expect("temp dir").keep();
    let db_path = dir.join("newsdesk.db");
    let db = Database::new(&DatabaseConfig {
        url: format!("file:{}", db_path.to_str().unwrap()),
        auth_token: None,
        local_path: None,
    })
    .await
    .expect("database");
    Arc::new(LibSqlPostStore::new(db))
}

fn retrieval_provider(base_url: &str) -> RetrievalProvider {
    RetrievalProvider::new(&RetrievalConfig {
        api_key: Some("ze-test-key".to_string()),
        base_url: base_url.to_string(),
        collection: "wordpress_posts".to_string(),
        top_k: 2,
        timeout_secs: 1,
    })
}

fn summarizer_provider(base_url: &str) -> SummarizerProvider {
    SummarizerProvider::new(Some(&SummarizerConfig {
        model: "gpt-4o-mini".to_string(),
        api_key: Some("sk-test".to_string()),
        base_url: Some(base_url.to_string()),
        timeout_secs: 1,
        max_tokens: 300,
        temperature: 0.7,
    }))
}

fn chat_config() -> ChatConfig {
    ChatConfig {
        default_response: DEFAULT_REPLY.to_string(),
        use_remote: false,
        remote_url: None,
        remote_timeout_secs: 2,
        enabled: true,
    }
}

fn sample_post(title: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        link: format!("https://news.example.com/{title}"),
        content: "<p>Full article body.</p>".to_string(),
        excerpt: "Full article body.".to_string(),
        author: "Staff".to_string(),
        categories: vec![],
        tags: vec![],
        published_at: None,
        source_url: None,
        source_id: None,
    }
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
async fn retrieval_server_error_falls_back_to_default() {
    let retrieval_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/queries/top-documents"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&retrieval_mock)
        .await;

    let service = AnswerService::new(
        test_store().await,
        retrieval_provider(&retrieval_mock.uri()),
        SummarizerProvider::unavailable(),
        chat_config(),
    );

    assert_eq!(service.answer("any question").await, DEFAULT_REPLY);
}

#[tokio::test]
async fn retrieval_timeout_falls_back_to_default() {
    let retrieval_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/queries/top-documents"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "results": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&retrieval_mock)
        .await;

    // Client timeout is 1s; the mock answers after 3s.
    let service = AnswerService::new(
        test_store().await,
        retrieval_provider(&retrieval_mock.uri()),
        SummarizerProvider::unavailable(),
        chat_config(),
    );

    assert_eq!(service.answer("slow question").await, DEFAULT_REPLY);
}

#[tokio::test]
async fn zero_results_fall_back_to_default() {
    let retrieval_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/queries/top-documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&retrieval_mock)
        .await;

    let service = AnswerService::new(
        test_store().await,
        retrieval_provider(&retrieval_mock.uri()),
        SummarizerProvider::unavailable(),
        chat_config(),
    );

    assert_eq!(service.answer("no matches").await, DEFAULT_REPLY);
}

#[tokio::test]
async fn unresolvable_results_produce_path_listing() {
    let retrieval_mock = MockServer::start().await;
    // One path without the post marker, one id with no local post.
    Mock::given(method("POST"))
        .and(path("/queries/top-documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "path": "other_1" },
                { "path": "post_9999" },
            ]
        })))
        .mount(&retrieval_mock)
        .await;

    let service = AnswerService::new(
        test_store().await,
        retrieval_provider(&retrieval_mock.uri()),
        SummarizerProvider::unavailable(),
        chat_config(),
    );

    let answer = service.answer("anything indexed?").await;
    assert!(answer.starts_with("Found 2 relevant document(s):"));
    assert!(answer.contains("Document 1: other_1"));
    assert!(answer.contains("Document 2: post_9999"));
}

#[tokio::test]
async fn summarizer_failure_produces_path_listing() {
    let store = test_store().await;
    let post = store.insert_post(&sample_post("solar")).await.unwrap();

    let retrieval_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/queries/top-documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "path": format!("post_{}", post.id) }]
        })))
        .mount(&retrieval_mock)
        .await;

    let summarizer_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("llm down"))
        .mount(&summarizer_mock)
        .await;

    let service = AnswerService::new(
        store,
        retrieval_provider(&retrieval_mock.uri()),
        summarizer_provider(&summarizer_mock.uri()),
        chat_config(),
    );

    let answer = service.answer("tell me about solar").await;
    assert!(answer.starts_with("Found 1 relevant document(s):"));
    assert!(answer.contains(&format!("Document 1: post_{}", post.id)));
}

#[tokio::test]
async fn successful_flow_renders_summary_with_read_more_link() {
    let store = test_store().await;
    let post = store.insert_post(&sample_post("solar-farms")).await.unwrap();

    let retrieval_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/queries/top-documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "path": format!("post_{}", post.id), "score": 0.92 }]
        })))
        .mount(&retrieval_mock)
        .await;

    let summarizer_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_response(
            "## Solar Farms Expand\nNew capacity across the region.",
        )))
        .mount(&summarizer_mock)
        .await;

    let service = AnswerService::new(
        store,
        retrieval_provider(&retrieval_mock.uri()),
        summarizer_provider(&summarizer_mock.uri()),
        chat_config(),
    );

    let answer = service.answer("what about solar farms?").await;
    assert!(answer.contains("<h2>Solar Farms Expand</h2>"));
    assert!(answer.contains("New capacity across the region."));
    assert!(answer.contains(&format!(
        "<a href=\"{}\" target=\"_blank\">Read more</a>",
        post.link
    )));
}

#[tokio::test]
async fn summary_blocks_pair_with_posts_by_position() {
    let store = test_store().await;
    let first = store.insert_post(&sample_post("first")).await.unwrap();
    let second = store.insert_post(&sample_post("second")).await.unwrap();

    let retrieval_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/queries/top-documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "path": format!("post_{}", first.id) },
                { "path": format!("post_{}", second.id) },
            ]
        })))
        .mount(&retrieval_mock)
        .await;

    let summarizer_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_response(
            "## Alpha\nSummary one.\n\n## Beta\nSummary two.",
        )))
        .mount(&summarizer_mock)
        .await;

    let service = AnswerService::new(
        store,
        retrieval_provider(&retrieval_mock.uri()),
        summarizer_provider(&summarizer_mock.uri()),
        chat_config(),
    );

    let answer = service.answer("both please").await;

    // Block order follows heading order; links follow submission order.
    let alpha = answer.find("Alpha").expect("first block");
    let first_link = answer.find(&first.link).expect("first link");
    let beta = answer.find("Beta").expect("second block");
    let second_link = answer.find(&second.link).expect("second link");
    assert!(alpha < first_link);
    assert!(first_link < beta);
    assert!(beta < second_link);
}

#[tokio::test]
async fn remote_engine_answers_when_retrieval_is_unconfigured() {
    let remote_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/answer"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "answer": "From the remote engine" })),
        )
        .expect(1)
        .mount(&remote_mock)
        .await;

    let mut chat = chat_config();
    chat.use_remote = true;
    chat.remote_url = Some(format!("{}/answer", remote_mock.uri()));

    let service = AnswerService::new(
        test_store().await,
        RetrievalProvider::unavailable(),
        SummarizerProvider::unavailable(),
        chat,
    );

    assert_eq!(service.answer("forward me").await, "From the remote engine");
}

#[tokio::test]
async fn remote_engine_failure_falls_back_to_default() {
    let remote_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/answer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "wrong shape" })))
        .mount(&remote_mock)
        .await;

    let mut chat = chat_config();
    chat.use_remote = true;
    chat.remote_url = Some(format!("{}/answer", remote_mock.uri()));

    let service = AnswerService::new(
        test_store().await,
        RetrievalProvider::unavailable(),
        SummarizerProvider::unavailable(),
        chat,
    );

    assert_eq!(service.answer("forward me").await, DEFAULT_REPLY);
}

#[tokio::test]
async fn disabled_chat_short_circuits_without_upstream_calls() {
    let retrieval_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/queries/top-documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(0)
        .mount(&retrieval_mock)
        .await;

    let mut chat = chat_config();
    chat.enabled = false;

    let service = AnswerService::new(
        test_store().await,
        retrieval_provider(&retrieval_mock.uri()),
        SummarizerProvider::unavailable(),
        chat,
    );

    assert_eq!(service.answer("anyone home?").await, DEFAULT_REPLY);
}
