use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{
    Application, ApplicationView, Job, JobId, NewApplication, RecruiterDashboard, ResumePath,
    ResumeUpload,
};
use super::forms::{validate_resume, JobForm};
use super::repository::{ApplicationRepository, JobRepository};
use super::storage::{ResumeStore, StorageError};
use crate::accounts::{User, UserRepository};
use crate::store::RepositoryError;
use crate::web::forms::FormErrors;

/// Service composing the job, application and user repositories with resume storage.
pub struct JobService {
    jobs: Arc<dyn JobRepository>,
    applications: Arc<dyn ApplicationRepository>,
    users: Arc<dyn UserRepository>,
    resumes: Arc<dyn ResumeStore>,
}

impl JobService {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        applications: Arc<dyn ApplicationRepository>,
        users: Arc<dyn UserRepository>,
        resumes: Arc<dyn ResumeStore>,
    ) -> Self {
        Self {
            jobs,
            applications,
            users,
            resumes,
        }
    }

    pub fn list_jobs(&self) -> Result<Vec<Job>, JobServiceError> {
        Ok(self.jobs.list()?)
    }

    pub fn job(&self, id: JobId) -> Result<Job, JobServiceError> {
        self.jobs.fetch(id)?.ok_or(JobServiceError::JobNotFound(id))
    }

    /// Only recruiters may post; the poster becomes the owner.
    pub fn post_job(&self, poster: &User, form: &JobForm) -> Result<Job, JobServiceError> {
        if !poster.role.is_recruiter() {
            return Err(JobServiceError::NotRecruiter);
        }
        let new_job = form
            .validate(poster.id)
            .map_err(JobServiceError::Validation)?;
        let job = self.jobs.insert(new_job)?;
        info!(job_id = %job.id, posted_by = %poster.id, title = %job.title, "job posted");
        Ok(job)
    }

    /// Stores the resume and records the application. Any logged-in user may
    /// apply, and may apply to the same job more than once.
    pub async fn apply(
        &self,
        applicant: &User,
        job_id: JobId,
        upload: Option<ResumeUpload>,
    ) -> Result<(Job, Application), JobServiceError> {
        let job = self.job(job_id)?;
        let upload = validate_resume(upload).map_err(JobServiceError::Validation)?;
        let resume = self.resumes.save(&upload).await?;
        let application = match self.applications.insert(NewApplication {
            job: job.id,
            applicant: applicant.id,
            resume: resume.clone(),
        }) {
            Ok(application) => application,
            Err(err) => {
                if let Err(cleanup) = self.resumes.remove(&resume).await {
                    warn!(resume = %resume.0, error = %cleanup, "orphaned resume left behind");
                }
                return Err(err.into());
            }
        };
        info!(
            application_id = application.id.0,
            job_id = %job.id,
            applicant = %applicant.id,
            resume = %application.resume.0,
            "application submitted"
        );
        Ok((job, application))
    }

    /// The recruiter's own postings and the applications made to exactly those postings.
    pub fn recruiter_dashboard(&self, user: &User) -> Result<RecruiterDashboard, JobServiceError> {
        if !user.role.is_recruiter() {
            return Err(JobServiceError::NotRecruiter);
        }

        let jobs = self.jobs.posted_by(user.id)?;
        let job_ids: Vec<JobId> = jobs.iter().map(|job| job.id).collect();
        let titles: HashMap<JobId, &str> = jobs
            .iter()
            .map(|job| (job.id, job.title.as_str()))
            .collect();

        let mut applicants: HashMap<_, String> = HashMap::new();
        let mut applications = Vec::new();
        for application in self.applications.for_jobs(&job_ids)? {
            let Some(job_title) = titles.get(&application.job) else {
                continue;
            };
            let applicant_username = match applicants.get(&application.applicant) {
                Some(name) => name.clone(),
                None => {
                    let name = self
                        .users
                        .fetch(application.applicant)?
                        .map(|user| user.username)
                        .unwrap_or_default();
                    applicants.insert(application.applicant, name.clone());
                    name
                }
            };
            applications.push(ApplicationView {
                job_title: (*job_title).to_string(),
                applicant_username,
                application,
            });
        }

        Ok(RecruiterDashboard { jobs, applications })
    }

    /// Resume bytes, visible to the applicant and to the recruiter owning the job.
    pub async fn resume_for(
        &self,
        viewer: &User,
        file_name: &str,
    ) -> Result<(ResumePath, Vec<u8>), JobServiceError> {
        let path = ResumePath::in_resumes(file_name);
        let application = self
            .applications
            .by_resume(&path)?
            .ok_or(JobServiceError::ResumeNotFound)?;

        let visible = application.applicant == viewer.id
            || self
                .jobs
                .fetch(application.job)?
                .is_some_and(|job| job.posted_by == viewer.id);
        if !visible {
            return Err(JobServiceError::ResumeNotFound);
        }

        let bytes = self.resumes.read(&path).await.map_err(|err| match err {
            StorageError::NotFound => JobServiceError::ResumeNotFound,
            other => JobServiceError::Storage(other),
        })?;
        Ok((path, bytes))
    }
}

/// Error raised by the job service.
#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("invalid form: {0}")]
    Validation(FormErrors),
    #[error("only recruiters may do this")]
    NotRecruiter,
    #[error("job {0} not found")]
    JobNotFound(JobId),
    #[error("resume not found")]
    ResumeNotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
