use httpmock::prelude::*;
use ipu_results::config::parse_base_url;
use ipu_results::error::PortalError;
use ipu_results::utils::portal::PortalClient;

fn client_for(server: &MockServer) -> PortalClient {
    let base = parse_base_url(&server.url("/web")).unwrap();
    PortalClient::new(base).unwrap()
}

#[tokio::test]
async fn test_captcha_uses_session_cookie() {
    let server = MockServer::start_async().await;

    let login_page = server
        .mock_async(|when, then| {
            when.method(GET).path("/web/login.jsp");
            then.status(200)
                .header("Set-Cookie", "JSESSIONID=abc123; Path=/")
                .body("<html>login</html>");
        })
        .await;
    let captcha = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/web/captcha.jsp")
                .header("cookie", "JSESSIONID=abc123")
                .header_exists("referer");
            then.status(200).header("Content-Type", "image/jpeg").body(vec![0xFF, 0xD8, 0xFF]);
        })
        .await;

    let portal = client_for(&server);
    let image = portal.fetch_captcha().await.unwrap();

    login_page.assert_async().await;
    captcha.assert_async().await;
    assert_eq!(image, vec![0xFF, 0xD8, 0xFF]);
}

#[tokio::test]
async fn test_login_then_fetch_result_page() {
    let server = MockServer::start_async().await;

    let login = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/web/studentlogin.do")
                .body_contains("enrollmentNo=11015603123")
                .body_contains("captcha=XK4P")
                .body_contains("submit=Submit");
            then.status(200).body("<html>Welcome</html>");
        })
        .await;
    let result_page = server
        .mock_async(|when, then| {
            when.method(GET).path("/web/view-result.do");
            then.status(200).body("<table></table>");
        })
        .await;

    let portal = client_for(&server);
    portal.login("11015603123", "secret", "XK4P").await.unwrap();
    let html = portal.fetch_result_page().await.unwrap();

    login.assert_async().await;
    result_page.assert_async().await;
    assert_eq!(html, "<table></table>");
}

#[tokio::test]
async fn test_login_rejected_by_portal() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/web/studentlogin.do");
            then.status(200).body("<html>Invalid captcha entered</html>");
        })
        .await;

    let portal = client_for(&server);
    let err = portal.login("11015603123", "secret", "WRONG").await.unwrap_err();
    assert!(matches!(err, PortalError::InvalidCredentials));
}

#[tokio::test]
async fn test_login_requires_every_field() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST).path("/web/studentlogin.do");
            then.status(200);
        })
        .await;

    let portal = client_for(&server);
    let err = portal.login("11015603123", "secret", "  ").await.unwrap_err();

    assert!(matches!(err, PortalError::MissingField("captcha")));
    login.assert_hits_async(0).await;
}
