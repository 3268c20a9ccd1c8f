use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use super::domain::{Dashboard, NewUser, Role, User, UserId, UserSummary};
use super::forms::{LoginForm, SignUpForm, DUPLICATE_USERNAME};
use super::notifier::{NotificationQueue, WelcomeEmail};
use super::password::{PasswordError, PasswordHasher};
use super::repository::UserRepository;
use crate::store::RepositoryError;
use crate::web::forms::FormErrors;

/// JSON body accepted by `POST /api/users/`. Every field is mandatory but
/// checked by the service so that a missing field is a 400, not a rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiUserPayload {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Service composing the user repository, password hashing and the welcome queue.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    queue: Arc<dyn NotificationQueue>,
    hasher: PasswordHasher,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, queue: Arc<dyn NotificationQueue>) -> Self {
        Self {
            users,
            queue,
            hasher: PasswordHasher::new(),
        }
    }

    /// Browser registration. Recruiters additionally get a welcome email queued;
    /// a queue failure is logged and does not undo the registration. Password
    /// hashing runs on the blocking pool.
    pub async fn register(&self, form: &SignUpForm, role: Role) -> Result<User, AccountServiceError> {
        let clean = form.validate().map_err(AccountServiceError::Validation)?;

        if self.users.username_exists(&clean.username)? {
            return Err(AccountServiceError::Validation(duplicate_username()));
        }

        let password = self.hasher.spawn_hash(clean.password).await?;
        let user = self
            .users
            .insert(NewUser {
                username: clean.username,
                email: clean.email,
                password,
                role,
            })
            .map_err(|err| match err {
                RepositoryError::Conflict => AccountServiceError::Validation(duplicate_username()),
                other => AccountServiceError::Repository(other),
            })?;

        info!(user_id = %user.id, username = %user.username, role = user.role.label(), "user registered");

        if user.role.is_recruiter() {
            let job = WelcomeEmail {
                email: user.email.clone(),
                username: user.username.clone(),
            };
            match self.queue.enqueue(job) {
                Ok(handle) => info!(user_id = %user.id, job = handle.0, "welcome email queued"),
                Err(err) => warn!(user_id = %user.id, error = %err, "welcome email not queued"),
            }
        }

        Ok(user)
    }

    /// User creation through the JSON API. No password policy is applied here.
    pub async fn create_from_api(
        &self,
        payload: ApiUserPayload,
    ) -> Result<User, AccountServiceError> {
        let (Some(username), Some(email), Some(password), Some(role)) = (
            non_empty(payload.username),
            non_empty(payload.email),
            non_empty(payload.password),
            non_empty(payload.role),
        ) else {
            return Err(AccountServiceError::MissingFields);
        };

        if self.users.username_exists(&username)? {
            return Err(AccountServiceError::DuplicateUsername);
        }

        let password = self.hasher.spawn_hash(password).await?;
        let user = self
            .users
            .insert(NewUser {
                username,
                email,
                password,
                role: Role::from_api(&role),
            })
            .map_err(|err| match err {
                RepositoryError::Conflict => AccountServiceError::DuplicateUsername,
                other => AccountServiceError::Repository(other),
            })?;

        info!(user_id = %user.id, username = %user.username, role = user.role.label(), "user created via api");
        Ok(user)
    }

    pub async fn authenticate(&self, form: &LoginForm) -> Result<User, AccountServiceError> {
        form.validate().map_err(AccountServiceError::Validation)?;

        let Some(user) = self.users.find_by_username(form.username.trim())? else {
            return Err(AccountServiceError::InvalidCredentials);
        };
        let matches = self
            .hasher
            .spawn_verify(form.password.clone(), user.password.clone())
            .await?;
        if matches {
            Ok(user)
        } else {
            Err(AccountServiceError::InvalidCredentials)
        }
    }

    pub fn user(&self, id: UserId) -> Result<Option<User>, AccountServiceError> {
        Ok(self.users.fetch(id)?)
    }

    pub fn list_users(&self) -> Result<Vec<UserSummary>, AccountServiceError> {
        Ok(self.users.list()?.iter().map(User::summary).collect())
    }

    pub fn users_with_role(&self, role: Role) -> Result<Vec<User>, AccountServiceError> {
        Ok(self.users.list_by_role(role)?)
    }

    pub fn dashboard(&self, user: &User) -> Dashboard {
        Dashboard::for_user(user)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn duplicate_username() -> FormErrors {
    let mut errors = FormErrors::new();
    errors.add("username", DUPLICATE_USERNAME);
    errors
}

/// Error raised by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AccountServiceError {
    #[error("invalid form: {0}")]
    Validation(FormErrors),
    #[error("Missing fields")]
    MissingFields,
    #[error("Username already exists")]
    DuplicateUsername,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
