//! Icon cache behaviour against a mock icon host.

use std::sync::Arc;
use std::time::Duration;

use weatherlist_weather::{icon_url, HttpIconSource, IconCache, IconOutcome, RowSlots};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([255, 200, 0, 255]));
    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn source() -> HttpIconSource {
    HttpIconSource::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_icon_is_fetched_once_then_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/wn/10d@2x.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png()))
        .expect(1)
        .mount(&server)
        .await;

    let cache = IconCache::new();
    let slots = RowSlots::new();
    let source = source();
    let url = icon_url(&server.uri(), "10d");

    let token = slots.bind(0, url.clone());
    let first = cache.fetch_and_store(&source, &slots, &token).await;
    let image = first.image().cloned().unwrap();
    assert_eq!((image.width, image.height), (8, 8));

    let token = slots.bind(1, url.clone());
    let second = cache.fetch_and_store(&source, &slots, &token).await;
    assert!(matches!(second, IconOutcome::Cached(_)));
    assert_eq!(cache.lookup(&url), Some(image));
}

#[tokio::test]
async fn test_not_found_is_not_cached_and_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/wn/99x@2x.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let cache = IconCache::new();
    let slots = RowSlots::new();
    let source = source();
    let token = slots.bind(0, icon_url(&server.uri(), "99x"));

    for _ in 0..2 {
        let outcome = cache.fetch_and_store(&source, &slots, &token).await;
        assert!(matches!(outcome, IconOutcome::Failed));
    }
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_non_image_body_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let cache = IconCache::new();
    let slots = RowSlots::new();
    let token = slots.bind(0, icon_url(&server.uri(), "01d"));

    let outcome = cache.fetch_and_store(&source(), &slots, &token).await;
    assert!(matches!(outcome, IconOutcome::Failed));
    assert!(cache.lookup(&token.url).is_none());
}

#[tokio::test]
async fn test_unreachable_host_fails_quietly() {
    let cache = IconCache::new();
    let slots = RowSlots::new();
    let token = slots.bind(0, icon_url("http://127.0.0.1:9", "01d"));

    let outcome = cache.fetch_and_store(&source(), &slots, &token).await;
    assert!(matches!(outcome, IconOutcome::Failed));
    assert!(cache.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_row_rebound_during_slow_fetch_gets_stale() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/wn/04d@2x.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(png())
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let cache = Arc::new(IconCache::new());
    let slots = Arc::new(RowSlots::new());
    let url = icon_url(&server.uri(), "04d");
    let token = slots.bind(5, url.clone());

    let task = {
        let cache = cache.clone();
        let slots = slots.clone();
        tokio::spawn(async move { cache.fetch_and_store(&source(), &slots, &token).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    let _rebound = slots.bind(5, icon_url(&server.uri(), "09n"));

    let outcome = task.await.unwrap();
    assert!(matches!(outcome, IconOutcome::Stale));
    assert!(cache.lookup(&url).is_some());
}
