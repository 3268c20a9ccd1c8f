use crate::accounts::AccountServiceError;
use crate::config::ConfigError;
use crate::jobs::JobServiceError;
use crate::store::RepositoryError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Accounts(AccountServiceError),
    Jobs(JobServiceError),
    Sessions(RepositoryError),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Accounts(err) => write!(f, "account error: {}", err),
            AppError::Jobs(err) => write!(f, "job error: {}", err),
            AppError::Sessions(err) => write!(f, "session error: {}", err),
            AppError::NotFound => write!(f, "not found"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Accounts(err) => Some(err),
            AppError::Jobs(err) => Some(err),
            AppError::Sessions(err) => Some(err),
            AppError::NotFound => None,
        }
    }
}

impl AppError {
    fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::NotFound
                | AppError::Jobs(JobServiceError::JobNotFound(_))
                | AppError::Jobs(JobServiceError::ResumeNotFound)
        )
    }
}

/// Not-found is a page; everything else is a generic 500 whose detail only goes to the log.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_not_found() {
            return (
                StatusCode::NOT_FOUND,
                Html("<!DOCTYPE html>\n<html><body><h1>Not Found</h1></body></html>\n"),
            )
                .into_response();
        }

        error!(error = %self, "request failed");
        let body = Json(json!({ "error": "internal server error" }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<AccountServiceError> for AppError {
    fn from(value: AccountServiceError) -> Self {
        Self::Accounts(value)
    }
}

impl From<JobServiceError> for AppError {
    fn from(value: JobServiceError) -> Self {
        Self::Jobs(value)
    }
}

/// Only the session layer hands raw repository errors to handlers.
impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Sessions(value)
    }
}
