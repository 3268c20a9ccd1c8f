use std::sync::Arc;

use super::common::*;
use crate::accounts::Role;
use crate::jobs::forms::NO_FILE;
use crate::jobs::{
    Application, ApplicationRepository, JobId, JobRepository, JobService, JobServiceError,
    NewApplication, ResumePath,
};
use crate::store::{MemoryJobRepository, MemoryResumeStore, RepositoryError};
use crate::web::testing::Harness;

/// Accepts nothing, as if the database went away mid-request.
struct UnavailableApplications;

impl ApplicationRepository for UnavailableApplications {
    fn insert(&self, _: NewApplication) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("applications table locked".to_string()))
    }

    fn for_jobs(&self, _: &[JobId]) -> Result<Vec<Application>, RepositoryError> {
        Ok(Vec::new())
    }

    fn by_resume(&self, _: &ResumePath) -> Result<Option<Application>, RepositoryError> {
        Ok(None)
    }
}

#[test]
fn only_recruiters_can_post() {
    let harness = Harness::new();
    let recruiter = harness.seed_user("rita", Role::Recruiter);
    let seeker = harness.seed_user("sam", Role::JobSeeker);

    let job = post(&harness, &recruiter, "Platform Engineer");
    assert_eq!(job.posted_by, recruiter.id);

    let err = harness
        .portal
        .jobs
        .post_job(&seeker, &job_form("Sneaky"))
        .expect_err("seeker cannot post");
    assert!(matches!(err, JobServiceError::NotRecruiter));
    assert_eq!(harness.jobs.list().expect("list").len(), 1);
}

#[test]
fn blank_job_fields_are_rejected() {
    let harness = Harness::new();
    let recruiter = harness.seed_user("rita", Role::Recruiter);

    let mut form = job_form("Platform Engineer");
    form.company = "   ".to_string();
    match harness.portal.jobs.post_job(&recruiter, &form) {
        Err(JobServiceError::Validation(errors)) => assert!(errors.has("company")),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn applying_requires_a_resume_and_an_existing_job() {
    let harness = Harness::new();
    let recruiter = harness.seed_user("rita", Role::Recruiter);
    let seeker = harness.seed_user("sam", Role::JobSeeker);
    let job = post(&harness, &recruiter, "Platform Engineer");

    match harness.portal.jobs.apply(&seeker, job.id, None).await {
        Err(JobServiceError::Validation(errors)) => {
            assert_eq!(errors.field("resume"), [NO_FILE.to_string()]);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let missing = harness
        .portal
        .jobs
        .apply(&seeker, JobId(999), Some(resume("cv.pdf")))
        .await;
    assert!(matches!(missing, Err(JobServiceError::JobNotFound(JobId(999)))));
    assert!(harness.applications.is_empty());
}

#[tokio::test]
async fn repeated_applications_are_kept() {
    let harness = Harness::new();
    let recruiter = harness.seed_user("rita", Role::Recruiter);
    let seeker = harness.seed_user("sam", Role::JobSeeker);
    let job = post(&harness, &recruiter, "Platform Engineer");

    let (_, first) = harness
        .portal
        .jobs
        .apply(&seeker, job.id, Some(resume("cv.pdf")))
        .await
        .expect("first application");
    let (_, second) = harness
        .portal
        .jobs
        .apply(&seeker, job.id, Some(resume("cv.pdf")))
        .await
        .expect("second application");

    assert_ne!(first.id, second.id);
    assert_ne!(first.resume, second.resume, "stored file names stay distinct");
    assert_eq!(harness.applications.len(), 2);
}

#[tokio::test]
async fn recruiter_dashboard_only_shows_own_postings() {
    let harness = Harness::new();
    let rita = harness.seed_user("rita", Role::Recruiter);
    let rob = harness.seed_user("rob", Role::Recruiter);
    let sam = harness.seed_user("sam", Role::JobSeeker);

    let ritas = post(&harness, &rita, "Platform Engineer");
    let robs = post(&harness, &rob, "Data Analyst");
    let jobs = &harness.portal.jobs;
    jobs.apply(&sam, ritas.id, Some(resume("sam.pdf")))
        .await
        .expect("applied");
    jobs.apply(&sam, robs.id, Some(resume("sam-data.pdf")))
        .await
        .expect("applied");

    let dashboard = jobs.recruiter_dashboard(&rita).expect("dashboard");
    assert_eq!(dashboard.jobs.len(), 1);
    assert_eq!(dashboard.jobs[0].id, ritas.id);
    assert_eq!(dashboard.applications.len(), 1);
    let view = &dashboard.applications[0];
    assert_eq!(view.job_title, "Platform Engineer");
    assert_eq!(view.applicant_username, "sam");

    assert!(matches!(
        jobs.recruiter_dashboard(&sam),
        Err(JobServiceError::NotRecruiter)
    ));
}

#[tokio::test]
async fn resumes_are_visible_to_applicant_and_job_owner_only() {
    let harness = Harness::new();
    let rita = harness.seed_user("rita", Role::Recruiter);
    let rob = harness.seed_user("rob", Role::Recruiter);
    let sam = harness.seed_user("sam", Role::JobSeeker);
    let job = post(&harness, &rita, "Platform Engineer");
    let jobs = &harness.portal.jobs;

    let (_, application) = jobs
        .apply(&sam, job.id, Some(resume("sam.pdf")))
        .await
        .expect("applied");
    let file_name = application.resume.file_name().to_string();

    let (_, bytes) = jobs.resume_for(&rita, &file_name).await.expect("owner reads");
    assert_eq!(bytes, b"%PDF-1.4 resume");
    assert!(jobs.resume_for(&sam, &file_name).await.is_ok());
    assert!(matches!(
        jobs.resume_for(&rob, &file_name).await,
        Err(JobServiceError::ResumeNotFound)
    ));
    assert!(matches!(
        jobs.resume_for(&rita, "nope.pdf").await,
        Err(JobServiceError::ResumeNotFound)
    ));
}

#[tokio::test]
async fn failed_application_insert_discards_the_resume() {
    let harness = Harness::new();
    let rita = harness.seed_user("rita", Role::Recruiter);
    let sam = harness.seed_user("sam", Role::JobSeeker);
    let jobs = Arc::new(MemoryJobRepository::default());
    let resumes = Arc::new(MemoryResumeStore::default());
    let service = JobService::new(
        jobs.clone(),
        Arc::new(UnavailableApplications),
        harness.users.clone(),
        resumes.clone(),
    );
    let job = service
        .post_job(&rita, &job_form("Platform Engineer"))
        .expect("job posted");

    let result = service.apply(&sam, job.id, Some(resume("cv.pdf"))).await;
    assert!(matches!(
        result,
        Err(JobServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
    assert!(resumes.is_empty());
}
