//! In-memory portal wiring shared by the router tests.

use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use axum_extra::extract::cookie::CookieJar;
use tower::ServiceExt;

use super::session::{cookie_pair, SessionManager};
use super::{portal_router, Portal};
use crate::accounts::{
    AccountService, JobHandle, NewUser, NotificationQueue, PasswordHasher, QueueError, Role, User,
    UserRepository, WelcomeEmail,
};
use crate::config::SessionConfig;
use crate::jobs::JobService;
use crate::store::{
    MemoryApplicationRepository, MemoryJobRepository, MemoryResumeStore, MemorySessionStore,
    MemoryUserRepository,
};

pub(crate) const PASSWORD: &str = "s3cure-Passw0rd";
pub(crate) const BODY_LIMIT: usize = 1024 * 1024;

/// Queue that records what was enqueued, or refuses everything.
#[derive(Debug, Default)]
pub(crate) struct RecordingQueue {
    pub(crate) sent: Mutex<Vec<WelcomeEmail>>,
    pub(crate) refuse: bool,
}

impl RecordingQueue {
    pub(crate) fn refusing() -> Self {
        Self {
            sent: Mutex::default(),
            refuse: true,
        }
    }

    pub(crate) fn sent(&self) -> Vec<WelcomeEmail> {
        self.sent.lock().expect("queue mutex").clone()
    }
}

impl NotificationQueue for RecordingQueue {
    fn enqueue(&self, job: WelcomeEmail) -> Result<JobHandle, QueueError> {
        if self.refuse {
            return Err(QueueError::Closed);
        }
        let mut sent = self.sent.lock().expect("queue mutex");
        sent.push(job);
        Ok(JobHandle(sent.len() as u64))
    }
}

pub(crate) struct Harness {
    pub(crate) portal: Portal,
    pub(crate) users: Arc<MemoryUserRepository>,
    pub(crate) jobs: Arc<MemoryJobRepository>,
    pub(crate) applications: Arc<MemoryApplicationRepository>,
    pub(crate) queue: Arc<RecordingQueue>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_queue(RecordingQueue::default())
    }

    pub(crate) fn with_queue(queue: RecordingQueue) -> Self {
        let users = Arc::new(MemoryUserRepository::default());
        let jobs = Arc::new(MemoryJobRepository::default());
        let applications = Arc::new(MemoryApplicationRepository::default());
        let queue = Arc::new(queue);

        let accounts = AccountService::new(users.clone(), queue.clone());
        let job_service = JobService::new(
            jobs.clone(),
            applications.clone(),
            users.clone(),
            Arc::new(MemoryResumeStore::default()),
        );
        let sessions = SessionManager::new(
            Arc::new(MemorySessionStore::default()),
            &SessionConfig {
                cookie_name: "portal_session".to_string(),
                ttl_hours: 1,
                secure: false,
            },
        );

        Self {
            portal: Portal {
                accounts: Arc::new(accounts),
                jobs: Arc::new(job_service),
                sessions: Arc::new(sessions),
                max_upload_bytes: BODY_LIMIT,
            },
            users,
            jobs,
            applications,
            queue,
        }
    }

    pub(crate) fn router(&self) -> Router {
        portal_router(self.portal.clone())
    }

    /// Stores a user directly, with [`PASSWORD`] as its password.
    pub(crate) fn seed_user(&self, username: &str, role: Role) -> User {
        let password = PasswordHasher::new().hash(PASSWORD).expect("hash");
        self.users
            .insert(NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password,
                role,
            })
            .expect("seed user")
    }

    /// A `Cookie` header value carrying a fresh session for `user`.
    pub(crate) fn login(&self, user: &User) -> String {
        let jar = self
            .portal
            .sessions
            .login(CookieJar::new(), user.id)
            .expect("session stored");
        let cookie = jar
            .iter()
            .next()
            .map(|cookie| cookie.stripped().to_string())
            .expect("session cookie");
        cookie
    }

    pub(crate) async fn send(&self, request: Request<Body>) -> Response {
        self.router().oneshot(request).await.expect("route executes")
    }
}

pub(crate) fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(path);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

pub(crate) fn post_form(path: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(path).header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub(crate) fn post_json(path: &str, body: &str) -> Request<Body> {
    Request::post(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub(crate) fn location(response: &Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

pub(crate) fn session_cookie(response: &Response) -> Option<String> {
    response.headers().get(SET_COOKIE).and_then(cookie_pair)
}

pub(crate) async fn read_text(response: Response) -> String {
    let body = to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .expect("body readable");
    String::from_utf8(body.to_vec()).expect("utf8 body")
}
