use super::domain::{Application, Job, JobId, NewApplication, NewJob, ResumePath};
use crate::accounts::UserId;
use crate::store::RepositoryError;

/// Storage abstraction for postings.
pub trait JobRepository: Send + Sync {
    fn insert(&self, job: NewJob) -> Result<Job, RepositoryError>;
    fn fetch(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;
    /// All jobs in storage order.
    fn list(&self) -> Result<Vec<Job>, RepositoryError>;
    fn posted_by(&self, owner: UserId) -> Result<Vec<Job>, RepositoryError>;
}

/// Storage abstraction for applications. No uniqueness on (job, applicant).
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: NewApplication) -> Result<Application, RepositoryError>;
    /// Applications whose job is any of `jobs`, in storage order.
    fn for_jobs(&self, jobs: &[JobId]) -> Result<Vec<Application>, RepositoryError>;
    fn by_resume(&self, resume: &ResumePath) -> Result<Option<Application>, RepositoryError>;
}
