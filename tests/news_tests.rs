//! Integration tests for the news summarization driver.

mod common;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use techdesk::chat::ChatSession;
use techdesk::config::{AppConfig, PromptStrategy};
use techdesk::news::{build_query, NewsFetcher, TECH_TERMS};
use techdesk::profile::UserProfile;

use common::{Reply, ScriptedGenerator};

fn test_profile() -> UserProfile {
    UserProfile {
        name: "Ada".to_string(),
        stack: vec!["python".to_string()],
        interests: vec!["ai".to_string()],
    }
}

#[test]
fn test_query_contains_profile_terms_and_fixed_keywords() {
    let query = build_query(&test_profile());

    assert!(query.contains("python"));
    assert!(query.contains("ai"));
    for term in TECH_TERMS {
        assert!(query.contains(term));
    }
    assert_eq!(
        query,
        "python OR ai OR technology OR innovation OR startup OR programming OR development"
    );
}

#[tokio::test]
async fn test_fetch_sends_expected_query_parameters_and_summarizes() {
    let server = MockServer::start().await;
    let config = AppConfig::default();

    Mock::given(method("GET"))
        .and(path("/everything"))
        .and(query_param("apiKey", "test-news-key"))
        .and(query_param("q", build_query(&test_profile())))
        .and(query_param("pageSize", "5"))
        .and(query_param("sortBy", "publishedAt"))
        .and(query_param("language", "en"))
        .and(query_param("domains", config.news_domains.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "articles": [
                {
                    "title": "Chips get faster",
                    "description": "A new fabrication process",
                    "url": "https://example.com/chips",
                    "publishedAt": "2026-08-28T09:00:00Z"
                },
                {
                    "title": "Compiler release",
                    "description": "Faster builds for everyone",
                    "url": "https://example.com/compiler",
                    "publishedAt": "2026-08-27T15:30:00Z"
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let generator = ScriptedGenerator::new(vec![
        Reply::Text("summary one"),
        Reply::Text("summary two"),
    ]);
    let mut session = ChatSession::new(generator.clone(), PromptStrategy::Transcript);

    let fetcher = NewsFetcher::new("test-news-key", &config)
        .with_endpoint(&format!("{}/everything", server.uri()));
    let summaries = fetcher
        .fetch_and_summarize(&test_profile(), &mut session)
        .await;

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].title, "Chips get faster");
    assert_eq!(summaries[0].summary, "summary one");
    assert_eq!(summaries[0].url, "https://example.com/chips");
    assert_eq!(summaries[0].published_at, "2026-08-28T09:00:00Z");
    assert_eq!(summaries[1].summary, "summary two");

    // each article was summarized with the fixed summarization prompt
    let prompts = generator.seen_prompts();
    assert!(prompts[0].contains("Summarize this technology news item in 2-3 sentences"));
    assert!(prompts[0].contains("Chips get faster - A new fabrication process"));
}

#[tokio::test]
async fn test_http_failure_yields_single_error_marker() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let generator = ScriptedGenerator::new(vec![]);
    let mut session = ChatSession::new(generator, PromptStrategy::Transcript);

    let fetcher = NewsFetcher::new("test-news-key", &AppConfig::default())
        .with_endpoint(&format!("{}/everything", server.uri()));
    let summaries = fetcher
        .fetch_and_summarize(&test_profile(), &mut session)
        .await;

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].title, "Error");
    assert!(summaries[0].summary.starts_with("Failed to fetch news"));
    assert!(summaries[0].url.is_empty());
}

#[tokio::test]
async fn test_empty_article_list_yields_no_summaries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"articles": []})))
        .mount(&server)
        .await;

    let generator = ScriptedGenerator::new(vec![]);
    let mut session = ChatSession::new(generator, PromptStrategy::Transcript);

    let fetcher = NewsFetcher::new("test-news-key", &AppConfig::default())
        .with_endpoint(&format!("{}/everything", server.uri()));
    let summaries = fetcher
        .fetch_and_summarize(&test_profile(), &mut session)
        .await;

    assert!(summaries.is_empty());
}
