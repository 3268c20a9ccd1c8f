use axum::http::StatusCode;
use serde_json::Value;

use super::common::*;
use crate::accounts::{Role, UserRepository};
use crate::web::testing::{
    get, location, post_form, post_json, read_text, session_cookie, Harness, PASSWORD,
};

#[tokio::test]
async fn recruiter_sign_up_logs_in_and_redirects_to_the_dashboard() {
    let harness = Harness::new();

    let response = harness
        .send(post_form(
            "/accounts/register/recruiter/",
            &sign_up_body("rita"),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard/");
    let cookie = session_cookie(&response).expect("session cookie set");

    let user = harness
        .users
        .find_by_username("rita")
        .expect("lookup")
        .expect("user stored");
    assert!(user.role.is_recruiter());
    assert_eq!(harness.queue.sent().len(), 1);

    let dashboard = harness.send(get("/dashboard/", Some(&cookie))).await;
    assert_eq!(dashboard.status(), StatusCode::OK);
    let html = read_text(dashboard).await;
    assert!(html.contains("Recruiter Dashboard"));
    assert!(html.contains("Welcome, rita!"));
}

#[tokio::test]
async fn invalid_sign_up_re_renders_with_errors() {
    let harness = Harness::new();
    harness.seed_user("rita", Role::JobSeeker);

    let response = harness
        .send(post_form(
            "/accounts/register/jobseeker/",
            &sign_up_body("rita"),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_none());
    let html = read_text(response).await;
    assert!(html.contains("A user with that username already exists."));
    assert_eq!(harness.users.list().expect("list").len(), 1);
}

#[tokio::test]
async fn registration_pages_render_for_anonymous_visitors() {
    let harness = Harness::new();
    for path in ["/accounts/register/recruiter/", "/accounts/register/jobseeker/"] {
        let response = harness.send(get(path, None)).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert!(read_text(response).await.contains("name=\"password2\""));
    }
}

#[tokio::test]
async fn anonymous_dashboard_visit_goes_to_login() {
    let harness = Harness::new();

    let response = harness.send(get("/dashboard/", None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/login/?next=%2Fdashboard%2F");
}

#[tokio::test]
async fn login_redirect_round_trips_the_query_string() {
    let harness = Harness::new();
    harness.seed_user("sam", Role::JobSeeker);

    let response = harness.send(get("/jobseekers/?page=2", None)).await;
    assert_eq!(
        location(&response),
        "/accounts/login/?next=%2Fjobseekers%2F%3Fpage%3D2"
    );

    let response = harness
        .send(post_form(
            "/accounts/login/",
            &format!("username=sam&password={PASSWORD}&next=%2Fjobseekers%2F%3Fpage%3D2"),
            None,
        ))
        .await;
    assert_eq!(location(&response), "/jobseekers/?page=2");
}

#[tokio::test]
async fn unassigned_users_are_sent_to_login_from_the_dashboard() {
    let harness = Harness::new();
    let user = harness.seed_user("nia", Role::Unassigned);
    let cookie = harness.login(&user);

    let response = harness.send(get("/accounts/dashboard/", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/login/");
}

#[tokio::test]
async fn login_honours_next_and_logout_clears_the_session() {
    let harness = Harness::new();
    harness.seed_user("sam", Role::JobSeeker);

    let response = harness
        .send(post_form(
            "/accounts/login/",
            &format!("username=sam&password={PASSWORD}&next=%2Fjobseekers%2F"),
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/jobseekers/");
    let cookie = session_cookie(&response).expect("session cookie");

    let listing = harness.send(get("/jobseekers/", Some(&cookie))).await;
    assert_eq!(listing.status(), StatusCode::OK);
    assert!(read_text(listing).await.contains("sam"));

    let response = harness.send(post_form("/accounts/logout/", "", Some(&cookie))).await;
    assert_eq!(location(&response), "/accounts/login/");

    let after = harness.send(get("/jobseekers/", Some(&cookie))).await;
    assert_eq!(after.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn wrong_password_shows_a_generic_error() {
    let harness = Harness::new();
    harness.seed_user("sam", Role::JobSeeker);

    let response = harness
        .send(post_form(
            "/accounts/login/",
            "username=sam&password=nope-nope-nope",
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_none());
    assert!(read_text(response)
        .await
        .contains("Please enter a correct username and password."));
}

#[tokio::test]
async fn recruiter_listing_excludes_job_seekers() {
    let harness = Harness::new();
    let viewer = harness.seed_user("sam", Role::JobSeeker);
    harness.seed_user("rita", Role::Recruiter);
    let cookie = harness.login(&viewer);

    let html = read_text(harness.send(get("/recruiters/", Some(&cookie))).await).await;

    assert!(html.contains("<li>rita"));
    assert!(!html.contains("<li>sam"));
}

#[tokio::test]
async fn api_creates_and_lists_users() {
    let harness = Harness::new();

    let response = harness
        .send(post_json(
            "/api/users/",
            r#"{"username":"al","email":"a@x.io","password":"p","role":"recruiter"}"#,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = serde_json::from_str(&read_text(response).await).expect("json");
    assert_eq!(body["message"], "User created successfully");

    let response = harness.send(get("/api/users/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let users: Value = serde_json::from_str(&read_text(response).await).expect("json");
    let users = users.as_array().expect("array");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "al");
    assert_eq!(users[0]["email"], "a@x.io");
    assert!(users[0]["id"].is_u64());
    assert!(users[0].get("password").is_none());
    assert!(harness.queue.sent().is_empty());
}

#[tokio::test]
async fn api_rejects_bad_payloads() {
    let harness = Harness::new();

    let missing = harness
        .send(post_json(
            "/api/users/",
            r#"{"username":"al","password":"p","role":"recruiter"}"#,
        ))
        .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&read_text(missing).await).expect("json");
    assert_eq!(body["error"], "Missing fields");

    let garbled = harness.send(post_json("/api/users/", "{not json")).await;
    assert_eq!(garbled.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&read_text(garbled).await).expect("json");
    assert_eq!(body["error"], "Invalid JSON");

    harness.seed_user("al", Role::JobSeeker);
    let duplicate = harness
        .send(post_json(
            "/api/users/",
            r#"{"username":"al","email":"a@x.io","password":"p","role":"recruiter"}"#,
        ))
        .await;
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&read_text(duplicate).await).expect("json");
    assert_eq!(body["error"], "Username already exists");
    assert_eq!(harness.users.list().expect("list").len(), 1);
}

#[tokio::test]
async fn api_refuses_other_methods() {
    let harness = Harness::new();

    let request = axum::http::Request::delete("/api/users/")
        .body(axum::body::Body::empty())
        .expect("request");
    let response = harness.send(request).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = serde_json::from_str(&read_text(response).await).expect("json");
    assert_eq!(body["error"], "Only GET and POST methods allowed");
}
