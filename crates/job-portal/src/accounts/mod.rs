//! User identity: registration, login, dashboards, listings and the users API.
//!
//! A user holds exactly one [`Role`]. Recruiter registration hands a welcome
//! email to the [`NotificationQueue`] without waiting on it.

pub mod domain;
pub mod forms;
pub mod notifier;
pub mod password;
pub mod repository;
pub mod router;
pub mod service;
mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Dashboard, DashboardContext, NewUser, PasswordDigest, Role, User, UserId, UserSummary,
};
pub use forms::{LoginForm, SignUpForm};
pub use notifier::{
    ChannelQueue, JobHandle, LogMailer, MailError, Mailer, NotificationQueue, OutgoingMail,
    QueueError, QueueReceiver, WelcomeEmail, WelcomeMailWorker,
};
pub use password::{PasswordError, PasswordHasher};
pub use repository::UserRepository;
pub use router::account_routes;
pub use service::{AccountService, AccountServiceError, ApiUserPayload};
