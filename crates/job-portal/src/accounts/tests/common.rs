use crate::accounts::{ApiUserPayload, SignUpForm};
use crate::web::testing::PASSWORD;

pub(super) fn sign_up(username: &str) -> SignUpForm {
    SignUpForm {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password1: PASSWORD.to_string(),
        password2: PASSWORD.to_string(),
    }
}

pub(super) fn sign_up_body(username: &str) -> String {
    format!(
        "username={username}&email={username}%40example.com&password1={PASSWORD}&password2={PASSWORD}"
    )
}

pub(super) fn api_payload(username: &str, role: &str) -> ApiUserPayload {
    ApiUserPayload {
        username: Some(username.to_string()),
        email: Some(format!("{username}@example.com")),
        password: Some("x".to_string()),
        role: Some(role.to_string()),
    }
}
