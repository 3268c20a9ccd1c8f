//! HTTP plumbing shared by the account and job routers.

pub mod forms;
pub mod html;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use axum::http::Uri;
use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use axum_extra::extract::cookie::CookieJar;
use url::form_urlencoded;

use crate::accounts::{self, AccountService, User};
use crate::error::AppError;
use crate::jobs::{self, JobService};
use session::{SessionId, SessionManager};

pub const LOGIN_URL: &str = "/accounts/login/";

/// State handed to every handler.
#[derive(Clone)]
pub struct Portal {
    pub accounts: Arc<AccountService>,
    pub jobs: Arc<JobService>,
    pub sessions: Arc<SessionManager>,
    pub max_upload_bytes: usize,
}

/// The logged-in user behind a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub session: SessionId,
    pub user: User,
}

impl Portal {
    /// Resolves the session cookie to a stored user. A session whose user is
    /// gone is treated as anonymous.
    pub fn current_user(&self, jar: &CookieJar) -> Result<Option<CurrentUser>, AppError> {
        let Some((session, record)) = self.sessions.resolve(jar)? else {
            return Ok(None);
        };
        Ok(self
            .accounts
            .user(record.user_id)?
            .map(|user| CurrentUser { session, user }))
    }
}

/// Where anonymous visitors of a login-required page are sent. The full
/// path and query come back as an encoded `next` parameter.
pub fn login_redirect(uri: &Uri) -> Redirect {
    let target = uri
        .path_and_query()
        .map(|path| path.as_str())
        .unwrap_or_else(|| uri.path());
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("next", target)
        .finish();
    Redirect::to(&format!("{LOGIN_URL}?{query}"))
}

/// Only same-site absolute paths are honoured as post-login targets.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|path| path.starts_with('/') && !path.starts_with("//") && !path.contains('\\'))
}

/// Every page and API route of the portal.
pub fn portal_router(portal: Portal) -> Router {
    let max_upload_bytes = portal.max_upload_bytes;
    Router::new()
        .route("/", get(|| async { Redirect::to("/jobs/") }))
        .merge(accounts::router::account_routes())
        .merge(jobs::router::job_routes(max_upload_bytes))
        .with_state(portal)
}
