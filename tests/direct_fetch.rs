//! HTTP-level tests for the lightweight fetch strategy.

use std::sync::Arc;

use placecard::error::AppError;
use placecard::models::Config;
use placecard::services::FieldExtractor;
use placecard::services::fetch::{DirectFetcher, FetchOutcome, PageFetcher, StrategyKind};
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> DirectFetcher {
    let config = Config::default();
    let fields = Arc::new(FieldExtractor::new(&config).unwrap());
    DirectFetcher::new(&config.fetch, fields).unwrap()
}

fn html_page(title: &str) -> ResponseTemplate {
    let body = format!(
        r#"<html><head><meta property="og:title" content="{title}"></head><body></body></html>"#
    );
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_listing_page_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maps/org/cafe/1/"))
        .and(header_exists("accept-language"))
        .respond_with(html_page("Кафе Пушкинъ, ресторан — Яндекс Карты"))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/maps/org/cafe/1/", server.uri());
    match fetcher().fetch(&url).await.unwrap() {
        FetchOutcome::Page(page) => {
            assert_eq!(page.strategy, StrategyKind::Lightweight);
            assert_eq!(page.final_url, url);
            assert!(page.html.contains("Кафе Пушкинъ"));
        }
        FetchOutcome::Blocked { reason } => panic!("unexpected block: {reason}"),
    }
}

#[tokio::test]
async fn test_long_garbled_title_is_blocked() {
    let server = MockServer::start().await;
    let garbled = "ÐÑÐ°Ð¹ÑÐµÑÐ¾ÑÐ°Ð¹ÑÐµ".repeat(5);
    assert!(garbled.chars().count() > 60);

    Mock::given(method("GET"))
        .respond_with(html_page(&garbled))
        .mount(&server)
        .await;

    let outcome = fetcher().fetch(&server.uri()).await.unwrap();
    assert!(matches!(outcome, FetchOutcome::Blocked { .. }));
}

#[tokio::test]
async fn test_captcha_title_is_blocked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html_page("Ой! Вы не робот?"))
        .mount(&server)
        .await;

    let outcome = fetcher().fetch(&server.uri()).await.unwrap();
    assert!(matches!(outcome, FetchOutcome::Blocked { .. }));
}

#[tokio::test]
async fn test_redirect_to_challenge_is_blocked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maps/org/cafe/1/"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/showcaptcha?retpath=x"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/showcaptcha"))
        .respond_with(html_page("Проверка"))
        .mount(&server)
        .await;

    let url = format!("{}/maps/org/cafe/1/", server.uri());
    match fetcher().fetch(&url).await.unwrap() {
        FetchOutcome::Blocked { reason } => assert!(reason.contains("in URL")),
        FetchOutcome::Page(_) => panic!("challenge redirect was not detected"),
    }
}

#[tokio::test]
async fn test_error_status_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = fetcher().fetch(&server.uri()).await.unwrap_err();
    assert!(matches!(err, AppError::UnexpectedStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_page_without_title_is_not_blocked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let outcome = fetcher().fetch(&server.uri()).await.unwrap();
    assert!(matches!(outcome, FetchOutcome::Page(_)));
}
