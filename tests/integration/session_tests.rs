//! Integration tests for the HTTP extraction session

use signal_sift::config::BrowserConfig;
use signal_sift::crawler::{
    check_session, BrowserSession, Extraction, HttpSessionProvider, SessionError,
    SessionProvider,
};
use signal_sift::SiftError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE_PAGE: &str = r#"
<html><head><title>Market update</title><script>track()</script></head>
<body>
  <nav>Home | Markets</nav>
  <h1>Bitcoin climbs</h1>
  <p>Buyers returned after the weekend.</p>
</body></html>
"#;

fn create_test_config() -> BrowserConfig {
    BrowserConfig {
        timeout_secs: 5,
        max_content_chars: 1000,
        user_agents: vec!["FirstAgent/1.0".to_string(), "SecondAgent/2.0".to_string()],
    }
}

#[tokio::test]
async fn test_extracts_page_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(ARTICLE_PAGE),
        )
        .mount(&server)
        .await;

    let provider = HttpSessionProvider::new(create_test_config());
    let mut session = provider.acquire().await.unwrap();
    let extraction = session
        .extract(&format!("{}/article", server.uri()))
        .await;
    session.release();

    assert_eq!(
        extraction,
        Extraction::Success("Bitcoin climbs\nBuyers returned after the weekend.".to_string())
    );
}

#[tokio::test]
async fn test_user_agents_rotate_between_requests() {
    let server = MockServer::start().await;
    for agent in ["FirstAgent/1.0", "SecondAgent/2.0"] {
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header("user-agent", agent))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string(format!("<html><body><p>{}</p></body></html>", agent)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let provider = HttpSessionProvider::new(create_test_config());
    let mut session = provider.acquire().await.unwrap();
    let url = format!("{}/page", server.uri());

    assert_eq!(
        session.extract(&url).await,
        Extraction::Success("FirstAgent/1.0".to_string())
    );
    assert_eq!(
        session.extract(&url).await,
        Extraction::Success("SecondAgent/2.0".to_string())
    );
}

#[tokio::test]
async fn test_http_error_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let provider = HttpSessionProvider::new(create_test_config());
    let mut session = provider.acquire().await.unwrap();

    assert_eq!(
        session.extract(&format!("{}/missing", server.uri())).await,
        Extraction::Failure("HTTP 404".to_string())
    );
}

#[tokio::test]
async fn test_non_html_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(vec![0x25, 0x50, 0x44, 0x46]),
        )
        .mount(&server)
        .await;

    let provider = HttpSessionProvider::new(create_test_config());
    let mut session = provider.acquire().await.unwrap();

    match session.extract(&format!("{}/report.pdf", server.uri())).await {
        Extraction::Failure(reason) => assert!(reason.contains("application/pdf")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_check_session_reports_extraction() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(ARTICLE_PAGE),
        )
        .mount(&server)
        .await;

    let provider = HttpSessionProvider::new(create_test_config());
    let extraction = check_session(&provider, &format!("{}/", server.uri()))
        .await
        .unwrap();

    assert!(matches!(extraction, Extraction::Success(text) if text.starts_with("Bitcoin climbs")));
}

#[tokio::test]
async fn test_check_session_without_user_agents() {
    let mut config = create_test_config();
    config.user_agents.clear();
    let provider = HttpSessionProvider::new(config);

    let result = check_session(&provider, "http://127.0.0.1:9/").await;

    assert!(matches!(
        result,
        Err(SiftError::Session(SessionError::Unavailable(_)))
    ));
}
