//! HTTP fetch integration tests against a local mock server
use std::time::Duration;

use aaview_core::{AaviewError, ErrorCategory, FetchConfig, RangeMode, Viewer, ViewerConfig, fetch_url};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const THREAD: &str = "<html><head><title>スレ</title></head><body><dl>\
    <dt>1 ：◆abc</dt><dd>　∧_∧<br>（ ´∀`）</dd>\
    <dt>2 ：名無し</dt><dd>乙</dd>\
    </dl></body></html>";

fn sjis(text: &str) -> Vec<u8> {
    encoding_rs::SHIFT_JIS.encode(text).0.into_owned()
}

#[tokio::test]
async fn test_fetch_returns_raw_bytes_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kako/1.html"))
        .and(header("user-agent", "aaview-test"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sjis(THREAD), "text/html; charset=Shift_JIS"))
        .mount(&server)
        .await;

    let config = FetchConfig { timeout: 5, user_agent: "aaview-test".to_string() };
    let url = format!("{}/kako/1.html", server.uri());
    let page = fetch_url(&url, &config).await.expect("fetch ok");

    assert_eq!(page.bytes, sjis(THREAD));
    assert_eq!(page.content_type.as_deref(), Some("text/html; charset=Shift_JIS"));
    assert_eq!(page.final_url, url);
}

#[tokio::test]
async fn test_fetch_and_view_decodes_shift_jis() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kako/1.html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sjis(THREAD), "text/html; charset=shift_jis"))
        .mount(&server)
        .await;

    let config = ViewerConfig::builder().range(RangeMode::All).timeout(5).build();
    let url = format!("{}/kako/1.html", server.uri());
    let view = Viewer::with_config(config).fetch_and_view(&url).await.expect("view ok");

    assert_eq!(view.posts.len(), 2);
    assert_eq!(view.posts[0].body_text, "　∧_∧\n（ ´∀`）");
    assert_eq!(view.title.as_deref(), Some("スレ"));
    assert_eq!(view.source.as_deref(), Some(url.as_str()));
}

#[tokio::test]
async fn test_fetch_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing.html", server.uri());
    let err = fetch_url(&url, &FetchConfig::default()).await.unwrap_err();

    assert!(matches!(err, AaviewError::HttpStatus { status: 404, .. }));
    assert_eq!(err.category(), ErrorCategory::FetchFailure);
}

#[tokio::test]
async fn test_fetch_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(THREAD).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = FetchConfig { timeout: 1, ..Default::default() };
    let url = format!("{}/slow.html", server.uri());
    let err = fetch_url(&url, &config).await.unwrap_err();

    assert!(matches!(err, AaviewError::Timeout { timeout: 1 }));
    assert_eq!(err.category(), ErrorCategory::FetchFailure);
}

#[tokio::test]
async fn test_connection_refused_is_fetch_failure() {
    let server = MockServer::start().await;
    let url = format!("{}/gone.html", server.uri());
    drop(server);

    let err = fetch_url(&url, &FetchConfig { timeout: 5, ..Default::default() }).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::FetchFailure);
}

#[tokio::test]
async fn test_fetch_and_view_rejects_bad_input() {
    let err = Viewer::new().fetch_and_view("not a url").await.unwrap_err();

    assert!(matches!(err, AaviewError::InvalidUrl(_)));
    assert_eq!(err.category(), ErrorCategory::InvalidUrl);
}

#[tokio::test]
async fn test_fetch_and_view_reports_redirect_target() {
    let server = MockServer::start().await;
    let target = format!("{}/kako/1/index.html", server.uri());
    Mock::given(method("GET"))
        .and(path("/read.cgi/1"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", target.as_str()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/kako/1/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sjis(THREAD), "text/html; charset=Shift_JIS"))
        .mount(&server)
        .await;

    let url = format!("{}/read.cgi/1", server.uri());
    let view = Viewer::new().fetch_and_view(&url).await.expect("view ok");

    assert_eq!(view.source.as_deref(), Some(target.as_str()));
    assert_eq!(view.posts.len(), 2);
}

#[tokio::test]
async fn test_fetch_and_view_keeps_declared_charset_with_stray_byte() {
    let server = MockServer::start().await;
    let mut body = sjis(THREAD);
    body.push(0xFF);
    Mock::given(method("GET"))
        .and(path("/kako/2.html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=Shift_JIS"))
        .mount(&server)
        .await;

    let url = format!("{}/kako/2.html", server.uri());
    let view = Viewer::new().fetch_and_view(&url).await.expect("view ok");

    assert_eq!(view.encoding, "Shift_JIS");
    assert_eq!(view.posts[0].header_text, "1 ：◆abc");
    assert_eq!(view.posts[0].role, aaview_core::PostRole::Anchor);
    assert_eq!(view.posts[0].body_text, "　∧_∧\n（ ´∀`）");
}
