//! End-to-end extraction: lightweight fetch against a mock site, with a
//! scripted full-render fallback.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use placecard::error::{AppError, Result};
use placecard::models::{Config, Coordinates, Weekday};
use placecard::services::fetch::{
    DirectFetcher, FetchOutcome, FetchedPage, PageFetcher, StrategyKind,
};
use placecard::services::{FieldExtractor, ListingExtractor};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_HTML: &str = r#"<html>
<head>
    <meta property="og:title" content="Кафе Ромашка, кофейня — Яндекс Карты">
    <meta itemprop="reviewCount" content="22">
    <meta itemprop="openingHours" content="Mo-Fr 10:00-22:00">
    <meta itemprop="openingHours" content="Sa,Su 11:00-23:00">
</head>
<body>
    <span class="business-rating-badge-view__rating-text">4.7</span>
    <div data-coordinates="37.62,55.75"></div>
    <a class="orgpage-categories-info-view__link"><span class="button__text">Кофейня</span></a>
</body>
</html>"#;

/// Full-render stand-in that serves a fixed page and counts calls.
struct ScriptedRender {
    html: Option<&'static str>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PageFetcher for ScriptedRender {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FullRender
    }

    async fn fetch(&self, url: &str) -> Result<FetchOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.html {
            Some(html) => Ok(FetchOutcome::Page(FetchedPage {
                html: html.to_string(),
                final_url: url.to_string(),
                strategy: StrategyKind::FullRender,
            })),
            None => Err(AppError::browser("wait selector timed out")),
        }
    }
}

fn extractor(render_html: Option<&'static str>) -> (ListingExtractor, Arc<AtomicUsize>) {
    let config = Config::default();
    let fields = Arc::new(FieldExtractor::new(&config).unwrap());
    let direct = DirectFetcher::new(&config.fetch, Arc::clone(&fields)).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let render = ScriptedRender {
        html: render_html,
        calls: Arc::clone(&calls),
    };
    (
        ListingExtractor::new(fields, Box::new(direct), Box::new(render)),
        calls,
    )
}

async fn serve(body: String) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_lightweight_page_is_extracted() {
    let server = serve(LISTING_HTML.to_string()).await;
    let (extractor, render_calls) = extractor(None);

    let record = extractor.extract(&server.uri()).await.unwrap();

    assert_eq!(render_calls.load(Ordering::SeqCst), 0);
    assert_eq!(record.title.as_deref(), Some("Кафе Ромашка"));
    assert_eq!(record.rating.as_deref(), Some("4.7"));
    assert_eq!(record.review_count, Some(22));
    assert_eq!(record.review_phrase.as_deref(), Some("22 отзыва"));
    assert_eq!(
        record.coordinates,
        Some(Coordinates {
            latitude: 55.75,
            longitude: 37.62
        })
    );
    assert_eq!(record.categories.as_deref(), Some("Кофейня"));

    for day in [Weekday::Mo, Weekday::Tu, Weekday::We, Weekday::Th, Weekday::Fr] {
        assert_eq!(record.weekly_hours.get(day), "10:00-22:00");
    }
    assert_eq!(record.weekly_hours.get(Weekday::Sa), "11:00-23:00");
    assert_eq!(record.weekly_hours.get(Weekday::Su), "11:00-23:00");
}

#[tokio::test]
async fn test_blocked_page_escalates_to_render() {
    let garbled = "ÐÑÐ°Ð¹ÑÐµÑÐ¾ÑÐ°Ð¹ÑÐµ".repeat(5);
    let server = serve(format!(
        r#"<html><head><meta property="og:title" content="{garbled}"></head></html>"#
    ))
    .await;
    let (extractor, render_calls) = extractor(Some(LISTING_HTML));

    let record = extractor.extract(&server.uri()).await.unwrap();

    assert_eq!(render_calls.load(Ordering::SeqCst), 1);
    assert_eq!(record.title.as_deref(), Some("Кафе Ромашка"));
    assert_eq!(record.review_count, Some(22));
}

#[tokio::test]
async fn test_cp1251_garbled_title_with_commas_escalates() {
    let garbled = "РљР°С„Рµ РџСѓС€РєРёРЅСЉ, СЂРµСЃС‚РѕСЂР°РЅ, РўРІРµСЂСЃРєРѕР№ Р±СѓР»СЊРІР°СЂ, 26Рђ";
    assert_eq!(garbled.chars().count(), 80);
    let server = serve(format!(
        "<html><head><title>{garbled}</title></head><body></body></html>"
    ))
    .await;
    let (extractor, render_calls) = extractor(Some(LISTING_HTML));

    let record = extractor.extract(&server.uri()).await.unwrap();

    assert_eq!(render_calls.load(Ordering::SeqCst), 1);
    assert_eq!(record.title.as_deref(), Some("Кафе Ромашка"));
}

#[tokio::test]
async fn test_render_failure_after_block_is_terminal() {
    let server = serve(
        r#"<html><head><title>Are you not a robot?</title></head></html>"#.to_string(),
    )
    .await;
    let (extractor, render_calls) = extractor(None);

    let err = extractor.extract(&server.uri()).await.unwrap_err();

    assert_eq!(render_calls.load(Ordering::SeqCst), 1);
    match err {
        AppError::Extraction { url, .. } => assert_eq!(url, server.uri()),
        other => panic!("unexpected error: {other}"),
    }
}
