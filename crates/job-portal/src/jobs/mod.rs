//! Job postings and the applications made to them.

pub mod domain;
pub mod forms;
pub mod repository;
pub mod router;
pub mod service;
pub mod storage;
mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationView, Job, JobId, NewApplication, NewJob,
    RecruiterDashboard, ResumePath, ResumeUpload,
};
pub use forms::JobForm;
pub use repository::{ApplicationRepository, JobRepository};
pub use router::job_routes;
pub use service::{JobService, JobServiceError};
pub use storage::{FsResumeStore, ResumeStore, StorageError};
