use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::domain::{Dashboard, Role};
use super::forms::{LoginForm, SignUpForm};
use super::service::{AccountServiceError, ApiUserPayload};
use super::views;
use crate::error::AppError;
use crate::web::forms::FormErrors;
use crate::web::{login_redirect, safe_next, Portal, LOGIN_URL};

const DASHBOARD_URL: &str = "/dashboard/";

/// Registration, login, dashboards, user listings and the users API.
pub fn account_routes() -> Router<Portal> {
    Router::new()
        .route(
            "/accounts/register/recruiter/",
            get(recruiter_register_form).post(recruiter_register),
        )
        .route(
            "/accounts/register/jobseeker/",
            get(jobseeker_register_form).post(jobseeker_register),
        )
        .route("/accounts/login/", get(login_form).post(login))
        .route("/accounts/logout/", get(logout).post(logout))
        .route("/dashboard/", get(dashboard))
        .route("/accounts/dashboard/", get(dashboard))
        .route("/recruiters/", get(recruiter_list))
        .route("/jobseekers/", get(jobseeker_list))
        .route(
            "/api/users/",
            get(list_users_api)
                .post(create_user_api)
                .fallback(method_not_allowed),
        )
}

pub(crate) async fn recruiter_register_form() -> Response {
    views::register_page(Role::Recruiter, &SignUpForm::default(), &FormErrors::new()).into_response()
}

pub(crate) async fn jobseeker_register_form() -> Response {
    views::register_page(Role::JobSeeker, &SignUpForm::default(), &FormErrors::new()).into_response()
}

pub(crate) async fn recruiter_register(
    State(portal): State<Portal>,
    jar: CookieJar,
    Form(form): Form<SignUpForm>,
) -> Result<Response, AppError> {
    register(&portal, jar, form, Role::Recruiter).await
}

pub(crate) async fn jobseeker_register(
    State(portal): State<Portal>,
    jar: CookieJar,
    Form(form): Form<SignUpForm>,
) -> Result<Response, AppError> {
    register(&portal, jar, form, Role::JobSeeker).await
}

async fn register(
    portal: &Portal,
    jar: CookieJar,
    form: SignUpForm,
    role: Role,
) -> Result<Response, AppError> {
    match portal.accounts.register(&form, role).await {
        Ok(user) => {
            let jar = portal.sessions.login(jar, user.id)?;
            Ok((jar, Redirect::to(DASHBOARD_URL)).into_response())
        }
        Err(AccountServiceError::Validation(errors)) => {
            Ok(views::register_page(role, &form, &errors).into_response())
        }
        Err(other) => Err(other.into()),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NextQuery {
    next: Option<String>,
}

pub(crate) async fn login_form(Query(query): Query<NextQuery>) -> Response {
    let next = safe_next(query.next.as_deref());
    views::login_page(&LoginForm::default(), &FormErrors::new(), next).into_response()
}

pub(crate) async fn login(
    State(portal): State<Portal>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let next = safe_next(form.next.as_deref());
    match portal.accounts.authenticate(&form).await {
        Ok(user) => {
            info!(user_id = %user.id, "user logged in");
            let jar = portal.sessions.login(jar, user.id)?;
            let target = next.unwrap_or(DASHBOARD_URL);
            Ok((jar, Redirect::to(target)).into_response())
        }
        Err(AccountServiceError::Validation(errors)) => {
            Ok(views::login_page(&form, &errors, next).into_response())
        }
        Err(AccountServiceError::InvalidCredentials) => {
            warn!(username = %form.username.trim(), "failed login");
            Ok(views::login_page(&form, &LoginForm::invalid_credentials(), next).into_response())
        }
        Err(other) => Err(other.into()),
    }
}

pub(crate) async fn logout(
    State(portal): State<Portal>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let jar = portal.sessions.logout(jar)?;
    Ok((jar, Redirect::to(LOGIN_URL)).into_response())
}

pub(crate) async fn dashboard(
    State(portal): State<Portal>,
    jar: CookieJar,
    uri: Uri,
) -> Result<Response, AppError> {
    let Some(current) = portal.current_user(&jar)? else {
        return Ok(login_redirect(&uri).into_response());
    };
    let user = &current.user;
    Ok(match portal.accounts.dashboard(user) {
        Dashboard::Recruiter(context) => {
            views::recruiter_dashboard_page(user, &context).into_response()
        }
        Dashboard::JobSeeker(context) => {
            views::jobseeker_dashboard_page(user, &context).into_response()
        }
        Dashboard::Unavailable => Redirect::to(LOGIN_URL).into_response(),
    })
}

pub(crate) async fn recruiter_list(
    State(portal): State<Portal>,
    jar: CookieJar,
    uri: Uri,
) -> Result<Response, AppError> {
    role_list(&portal, &jar, &uri, Role::Recruiter, "Recruiters")
}

pub(crate) async fn jobseeker_list(
    State(portal): State<Portal>,
    jar: CookieJar,
    uri: Uri,
) -> Result<Response, AppError> {
    role_list(&portal, &jar, &uri, Role::JobSeeker, "Job Seekers")
}

fn role_list(
    portal: &Portal,
    jar: &CookieJar,
    uri: &Uri,
    role: Role,
    title: &str,
) -> Result<Response, AppError> {
    let Some(current) = portal.current_user(jar)? else {
        return Ok(login_redirect(uri).into_response());
    };
    let users = portal.accounts.users_with_role(role)?;
    Ok(views::user_list_page(&current.user, title, &users).into_response())
}

pub(crate) async fn list_users_api(State(portal): State<Portal>) -> Result<Response, AppError> {
    let users = portal.accounts.list_users()?;
    Ok(Json(users).into_response())
}

pub(crate) async fn create_user_api(State(portal): State<Portal>, body: Bytes) -> Response {
    let payload: ApiUserPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(_) => return api_error(StatusCode::BAD_REQUEST, "Invalid JSON"),
    };

    match portal.accounts.create_from_api(payload).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(json!({ "message": "User created successfully" })),
        )
            .into_response(),
        Err(err @ (AccountServiceError::MissingFields | AccountServiceError::DuplicateUsername)) => {
            api_error(StatusCode::BAD_REQUEST, &err.to_string())
        }
        Err(other) => AppError::from(other).into_response(),
    }
}

pub(crate) async fn method_not_allowed() -> Response {
    api_error(
        StatusCode::METHOD_NOT_ALLOWED,
        "Only GET and POST methods allowed",
    )
}

fn api_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
