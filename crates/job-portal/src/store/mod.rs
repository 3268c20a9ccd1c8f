//! Persistence seams shared by the account and job components, plus the
//! in-process adapters the service runs on.

mod memory;

pub use memory::{
    MemoryApplicationRepository, MemoryJobRepository, MemoryResumeStore, MemorySessionStore,
    MemoryUserRepository,
};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
