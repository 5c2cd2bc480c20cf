use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use matchday::config::Config;
use matchday::routes::router;
use matchday::state::AppState;
use matchday::store::UserStore;

// Points the gateways at a closed port so any upstream call fails fast.
fn test_app() -> Router {
    let config = Config {
        port: 0,
        secret_key: "integration-test-secret".to_string(),
        football_api_key: Some("test-token".to_string()),
        news_api_key: Some("test-key".to_string()),
        database_path: "unused".into(),
        football_api_url: "http://127.0.0.1:1".to_string(),
        news_api_url: "http://127.0.0.1:1/everything".to_string(),
    };
    let store = UserStore::open_in_memory().expect("in-memory store should open");
    let state = AppState::with_store(config, store).expect("state should build");
    router(state)
}

async fn send(app: &Router, req: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(req).await.expect("request should complete")
}

async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

async fn post_form(
    app: &Router,
    uri: &str,
    form: &str,
    cookie: Option<&str>,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::from(form.to_string())).unwrap()).await
}

fn location(resp: &axum::response::Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .expect("redirect should carry a Location header")
        .to_str()
        .unwrap()
}

fn session_cookie(resp: &axum::response::Response) -> String {
    resp.headers()
        .get(header::SET_COOKIE)
        .expect("response should set a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let form = format!("username={username}&email={username}@example.com&password={password}");
    let resp = post_form(app, "/register", &form, None).await;
    assert!(resp.status().is_redirection());

    let form = format!("username={username}&password={password}");
    let resp = post_form(app, "/login", &form, None).await;
    assert!(resp.status().is_redirection());
    session_cookie(&resp)
}

#[tokio::test]
async fn content_routes_require_login() {
    let app = test_app();

    let resp = get(&app, "/", None).await;
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/login?next=%2F");

    for uri in ["/standings", "/news", "/standings?league=SA"] {
        let resp = get(&app, uri, None).await;
        assert!(resp.status().is_redirection());
        assert!(location(&resp).starts_with("/login?next="));
    }
}

#[tokio::test]
async fn registration_redirects_to_login_with_notice() {
    let app = test_app();

    let resp = post_form(
        &app,
        "/register",
        "username=alice&email=alice@example.com&password=pa55word",
        None,
    )
    .await;
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/login?registered=1");

    let resp = get(&app, "/login?registered=1", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Your account has been created"));
}

#[tokio::test]
async fn duplicate_registration_rerenders_with_error() {
    let app = test_app();

    let resp = post_form(
        &app,
        "/register",
        "username=alice&email=alice@example.com&password=pa55word",
        None,
    )
    .await;
    assert!(resp.status().is_redirection());

    // Same username, different email.
    let resp = post_form(
        &app,
        "/register",
        "username=alice&email=other@example.com&password=pa55word",
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Username or email already taken"));

    // Different username, same email.
    let resp = post_form(
        &app,
        "/register",
        "username=bob&email=alice@example.com&password=pa55word",
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Username or email already taken"));
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = test_app();
    let resp = post_form(
        &app,
        "/register",
        "username=alice&email=alice@example.com&password=pa55word",
        None,
    )
    .await;
    assert!(resp.status().is_redirection());

    let wrong_password = post_form(&app, "/login", "username=alice&password=nope", None).await;
    assert_eq!(wrong_password.status(), StatusCode::OK);
    let wrong_password_body = body_text(wrong_password).await;

    let unknown_user = post_form(&app, "/login", "username=mallory&password=nope", None).await;
    assert_eq!(unknown_user.status(), StatusCode::OK);
    let unknown_user_body = body_text(unknown_user).await;

    assert!(wrong_password_body.contains("Login unsuccessful"));
    assert_eq!(wrong_password_body, unknown_user_body);
}

#[tokio::test]
async fn login_honors_local_next_target() {
    let app = test_app();
    let form = "username=alice&email=alice@example.com&password=pa55word";
    let resp = post_form(&app, "/register", form, None).await;
    assert!(resp.status().is_redirection());

    let resp = post_form(
        &app,
        "/login?next=%2Fstandings%3Fleague%3DSA",
        "username=alice&password=pa55word",
        None,
    )
    .await;
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/standings?league=SA");

    let cookie = session_cookie(&resp);
    let resp = get(&app, "/standings?league=SA", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_rejects_offsite_next_target() {
    let app = test_app();
    let form = "username=alice&email=alice@example.com&password=pa55word";
    let resp = post_form(&app, "/register", form, None).await;
    assert!(resp.status().is_redirection());

    let resp = post_form(
        &app,
        "/login?next=%2F%2Fevil.example.com",
        "username=alice&password=pa55word",
        None,
    )
    .await;
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/");
}

#[tokio::test]
async fn authenticated_users_skip_the_auth_forms() {
    let app = test_app();
    let cookie = register_and_login(&app, "alice", "pa55word").await;

    for uri in ["/login", "/register"] {
        let resp = get(&app, uri, Some(&cookie)).await;
        assert!(resp.status().is_redirection());
        assert_eq!(location(&resp), "/");
    }

    let resp = post_form(
        &app,
        "/register",
        "username=bob&email=bob@example.com&password=pa55word",
        Some(&cookie),
    )
    .await;
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/");
}

#[tokio::test]
async fn logout_destroys_the_session() {
    let app = test_app();
    let cookie = register_and_login(&app, "alice", "pa55word").await;

    let resp = get(&app, "/", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = get(&app, "/logout", Some(&cookie)).await;
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/");

    // The old cookie no longer resolves to a user.
    let resp = get(&app, "/", Some(&cookie)).await;
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/login?next=%2F");
}

#[tokio::test]
async fn logout_without_a_session_is_harmless() {
    let app = test_app();
    let resp = get(&app, "/logout", None).await;
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/");
}
