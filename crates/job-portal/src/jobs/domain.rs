use std::fmt;

use serde::{Deserialize, Serialize};

use crate::accounts::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub u64);

/// A posting owned by the recruiter who created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub posted_by: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub posted_by: UserId,
}

/// Path of a stored resume relative to the media root, e.g. `resumes/cv.pdf`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResumePath(pub String);

impl ResumePath {
    pub const DIRECTORY: &'static str = "resumes";

    pub fn in_resumes(file_name: &str) -> Self {
        Self(format!("{}/{}", Self::DIRECTORY, file_name))
    }

    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Public URL the resume is served from.
    pub fn url(&self) -> String {
        format!("/media/{}", self.0)
    }
}

/// One application attempt. The same applicant may apply to a job repeatedly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job: JobId,
    pub applicant: UserId,
    pub resume: ResumePath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub job: JobId,
    pub applicant: UserId,
    pub resume: ResumePath,
}

/// Raw file received from the upload form.
#[derive(Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ResumeUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResumeUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Application as shown on the recruiter dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationView {
    pub application: Application,
    pub job_title: String,
    pub applicant_username: String,
}

/// A recruiter's own postings and every application made to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecruiterDashboard {
    pub jobs: Vec<Job>,
    pub applications: Vec<ApplicationView>,
}
