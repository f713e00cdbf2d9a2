//! HTTP-surface tests driven through the router with tower's oneshot.
//!
//! The engine behind the router uses canned embeddings, so the whole
//! surface is exercised without model files or network access.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use super::{corpus_of, StubEmbedder};
use crate::config::{CorpusConfig, VoiceConfig};
use crate::engine::{ChatEngine, NO_ANSWER};
use crate::voice::VoiceClient;
use crate::web::build_router;

fn boot_router() -> Router {
    let corpus = corpus_of(&[
        (
            "What is your return policy?",
            "You can return items within 30 days. See https://example.com/returns",
        ),
        ("Do you ship internationally?", "Yes, worldwide."),
    ]);
    let stub = StubEmbedder::new(
        2,
        &[
            ("What is your return policy?", &[1.0, 0.0]),
            ("Do you ship internationally?", &[0.0, 1.0]),
            ("what is your return policy?", &[1.0, 0.0]),
        ],
    );
    let engine = ChatEngine::from_parts(corpus, Box::new(stub), 0.3).unwrap();
    // reqwest's blocking client cannot be built directly on an async test
    // thread; block_in_place matches how production builds it outside the
    // runtime (main constructs the client before starting the daemon).
    let voice = tokio::task::block_in_place(|| VoiceClient::new(VoiceConfig::default())).unwrap();
    build_router(engine, voice, CorpusConfig::default().categories)
}

async fn post_json(router: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_chat_answers_with_markup() {
    let router = boot_router();

    let (status, body) =
        post_json(router, "/chat", r#"{"message": "what is your return policy?"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["confidence"].as_f64().unwrap() >= 0.99);
    let answer = body["answer"].as_str().unwrap();
    assert!(answer.contains("<mark>"));
    assert!(answer.contains(r#"<a href="https://example.com/returns""#));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_chat_missing_message_key_defaults_to_empty() {
    let router = boot_router();

    let (status, body) = post_json(router, "/chat", "{}").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"].as_str().unwrap(), NO_ANSWER);
    assert_eq!(body["confidence"].as_f64().unwrap(), 0.0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_suggestions_endpoint() {
    let router = boot_router();

    let (status, body) = post_json(router, "/suggestions", r#"{"query": "ship"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let suggestions = body["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0], "Do you ship internationally?");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_voice_output_unconfigured_reports_structured_failure() {
    let router = boot_router();

    let (status, body) = post_json(router, "/voice-output", r#"{"text": "hello"}"#).await;

    // voice failures are 200s with success=false, never HTTP errors
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("not configured"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_analytics_endpoint() {
    let router = boot_router();

    let response = router
        .oneshot(Request::builder().uri("/analytics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["total_faqs"], 2);
    assert_eq!(body["categories"].as_array().unwrap().len(), 4);
    assert_eq!(body["popular_questions"].as_array().unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_index_serves_chat_page() {
    let router = boot_router();

    let response = router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("FAQ Chat"));
}
