use super::*;
use mockito::{Matcher, Server};

fn payload() -> FeedPayload {
    FeedPayload::from_parts(
        "files",
        "incremental",
        b"<gsafeed></gsafeed>".to_vec(),
        1,
    )
}

fn connection(server: &Server) -> HttpFeedConnection {
    let config = HttpConfig::new(server.url())
        .with_timeout(Duration::from_secs(5))
        .with_backlog_thresholds(100, 10)
        .with_backlog_interval(Duration::ZERO);
    HttpFeedConnection::new(&config).unwrap()
}

#[test]
fn base_url_gains_trailing_slash() {
    let config = HttpConfig::new("http://gsa:19900/feeds");
    let connection = HttpFeedConnection::new(&config).unwrap();
    assert_eq!(connection.base_url().as_str(), "http://gsa:19900/feeds/");
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = HttpFeedConnection::new(&HttpConfig::new("not a url")).unwrap_err();
    assert!(matches!(err, FeedError::InvalidUrl(_)));
}

#[test]
fn posts_multipart_feed() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/xmlfeed")
        .match_header(
            "content-type",
            Matcher::Regex("multipart/form-data; boundary=.*".into()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="datasource"\r\n\r\nfiles"#.into()),
            Matcher::Regex(r#"name="feedtype"\r\n\r\nincremental"#.into()),
            Matcher::Regex("<gsafeed></gsafeed>".into()),
        ]))
        .with_body("Success")
        .create();

    let token = connection(&server).send_data(&payload()).unwrap();
    assert_eq!(token, "Success");
    mock.assert();
}

#[test]
fn unauthorized_token_is_an_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/xmlfeed")
        .with_body("Error - Unauthorized Request")
        .create();

    let err = connection(&server).send_data(&payload()).unwrap_err();
    assert!(matches!(err, FeedError::Unauthorized));
}

#[test]
fn http_failures_report_status() {
    let mut server = Server::new();
    let _mock = server.mock("POST", "/xmlfeed").with_status(503).create();

    let err = connection(&server).send_data(&payload()).unwrap_err();
    assert!(matches!(err, FeedError::Status { status: 503 }));
    assert!(err.is_retryable());
}

#[test]
fn backlog_follows_polled_counts() {
    let mut server = Server::new();
    let connection = connection(&server);

    let high = server
        .mock("GET", "/getbacklogcount")
        .with_body("150")
        .expect(1)
        .create();
    assert!(connection.is_backlogged());
    high.assert();
    high.remove();

    let _low = server.mock("GET", "/getbacklogcount").with_body("5").create();
    assert!(!connection.is_backlogged());
}

#[test]
fn unreadable_backlog_keeps_previous_state() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/getbacklogcount")
        .with_body("lots")
        .create();
    assert!(!connection(&server).is_backlogged());
}

#[test]
fn content_encodings_are_fetched_once() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/getcontentencodings")
        .with_body("base64binary,base64compressed\n")
        .expect(1)
        .create();

    let connection = connection(&server);
    assert_eq!(
        connection.content_encodings(),
        "base64binary,base64compressed"
    );
    assert_eq!(
        connection.content_encodings(),
        "base64binary,base64compressed"
    );
    mock.assert();
}

#[test]
fn content_encodings_default_on_failure() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/getcontentencodings")
        .with_status(404)
        .create();
    assert_eq!(connection(&server).content_encodings(), "base64binary");
}

#[test]
fn dtd_version_gates_inherited_acls() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/getdtdversion")
        .with_body("6.14")
        .create();
    assert!(connection(&server).supports_inherited_acls());
}

#[test]
fn dtd_version_comparison() {
    assert!(supports_inherited_acls("6.14"));
    assert!(supports_inherited_acls("7.0"));
    assert!(supports_inherited_acls("7"));
    assert!(supports_inherited_acls(" 6.20 "));
    assert!(!supports_inherited_acls("6.0"));
    assert!(!supports_inherited_acls("6"));
    assert!(!supports_inherited_acls("garbage"));
}
