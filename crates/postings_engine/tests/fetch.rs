use std::time::Duration;

use postings_engine::{FailureKind, FetchSettings, Fetcher, ReqwestFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(settings: FetchSettings) -> ReqwestFetcher {
    ReqwestFetcher::new(settings).expect("client")
}

#[tokio::test]
async fn fetcher_returns_decoded_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html>ok</html>", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/jobs", server.uri());
    let doc = fetcher(FetchSettings::default())
        .fetch(&url)
        .await
        .expect("fetch ok");
    assert_eq!(doc.url, url);
    assert_eq!(doc.final_url, url);
    assert_eq!(doc.html, "<html>ok</html>");
    assert_eq!(doc.encoding_label, "UTF-8");
    assert!(doc.content_type.unwrap().starts_with("text/html"));
}

#[tokio::test]
async fn fetcher_decodes_declared_legacy_charset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/legacy"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<p>Caf\xe9</p>".to_vec(), "text/html; charset=ISO-8859-1"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/legacy", server.uri());
    let doc = fetcher(FetchSettings::default()).fetch(&url).await.unwrap();
    assert_eq!(doc.html, "<p>Café</p>");
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let err = fetcher(FetchSettings::default())
        .fetch(&url)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert_eq!(err.url, url);
}

#[tokio::test]
async fn fetcher_rejects_invalid_url_without_network() {
    let err = fetcher(FetchSettings::default())
        .fetch("cutshort.io/jobs")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn fetcher_reports_connection_failure_as_network_error() {
    // Nothing listens on the discard port of localhost.
    let err = fetcher(FetchSettings::default())
        .fetch("http://127.0.0.1:9/jobs")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}

#[tokio::test]
async fn fetcher_honours_configured_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Some(Duration::from_millis(50)),
        ..FetchSettings::default()
    };
    let url = format!("{}/slow", server.uri());
    let err = fetcher(settings).fetch(&url).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let url = format!("{}/large", server.uri());
    let err = fetcher(settings).fetch(&url).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}
