use std::fmt;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::accounts::UserId;
use crate::config::{SessionConfig, SESSION_TTL_HOURS};
use crate::store::RepositoryError;

/// Opaque random session key carried in the cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub flashes: Vec<String>,
}

impl SessionRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Server-side session storage.
pub trait SessionStore: Send + Sync {
    fn put(&self, id: SessionId, record: SessionRecord) -> Result<(), RepositoryError>;
    fn get(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError>;
    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError>;
    /// Drops every record expired at `now`, returning how many went.
    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, RepositoryError>;
}

/// Issues, resolves and clears login sessions; also carries flash messages.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    cookie_name: String,
    ttl: Duration,
    secure: bool,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, config: &SessionConfig) -> Self {
        let hours = config.ttl_hours.clamp(0, *SESSION_TTL_HOURS.end());
        Self {
            store,
            cookie_name: config.cookie_name.clone(),
            ttl: Duration::hours(hours),
            secure: config.secure,
        }
    }

    /// Logs `user_id` in, replacing any session the request already carried.
    /// Expired sessions of other visitors are swept at the same time.
    pub fn login(&self, jar: CookieJar, user_id: UserId) -> Result<CookieJar, RepositoryError> {
        if let Some(previous) = self.session_id(&jar) {
            self.store.remove(&previous)?;
        }
        let now = Utc::now();
        let swept = self.store.purge_expired(now)?;
        if swept > 0 {
            debug!(swept, "expired sessions purged");
        }

        let id = SessionId::generate();
        self.store.put(
            id.clone(),
            SessionRecord {
                user_id,
                expires_at: now + self.ttl,
                flashes: Vec::new(),
            },
        )?;
        Ok(jar.add(self.cookie(id.0)))
    }

    pub fn logout(&self, jar: CookieJar) -> Result<CookieJar, RepositoryError> {
        if let Some(id) = self.session_id(&jar) {
            self.store.remove(&id)?;
        }
        Ok(jar.remove(Cookie::build(self.cookie_name.clone()).path("/")))
    }

    /// The live session for this request, dropping it if expired.
    pub fn resolve(
        &self,
        jar: &CookieJar,
    ) -> Result<Option<(SessionId, SessionRecord)>, RepositoryError> {
        let Some(id) = self.session_id(jar) else {
            return Ok(None);
        };
        let Some(record) = self.store.get(&id)? else {
            return Ok(None);
        };
        if record.is_expired(Utc::now()) {
            self.store.remove(&id)?;
            return Ok(None);
        }
        Ok(Some((id, record)))
    }

    pub fn push_flash(
        &self,
        id: &SessionId,
        message: impl Into<String>,
    ) -> Result<(), RepositoryError> {
        if let Some(mut record) = self.store.get(id)? {
            record.flashes.push(message.into());
            self.store.put(id.clone(), record)?;
        }
        Ok(())
    }

    /// Flash messages are shown once.
    pub fn take_flashes(&self, id: &SessionId) -> Result<Vec<String>, RepositoryError> {
        match self.store.get(id)? {
            Some(mut record) if !record.flashes.is_empty() => {
                let flashes = std::mem::take(&mut record.flashes);
                self.store.put(id.clone(), record)?;
                Ok(flashes)
            }
            _ => Ok(Vec::new()),
        }
    }

    fn session_id(&self, jar: &CookieJar) -> Option<SessionId> {
        jar.get(&self.cookie_name)
            .map(|cookie| cookie.value().trim().to_string())
            .filter(|value| !value.is_empty())
            .map(SessionId)
    }

    fn cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::seconds(self.ttl.num_seconds()))
            .build()
    }
}

/// The `name=value` pair a client sends back for a `Set-Cookie` header.
pub fn cookie_pair(set_cookie: &HeaderValue) -> Option<String> {
    let raw = set_cookie.to_str().ok()?;
    let cookie = Cookie::parse(raw).ok()?;
    Some(cookie.stripped().to_string())
}
