use axum::extract::multipart::Multipart;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use axum_extra::extract::cookie::CookieJar;

use super::domain::{JobId, ResumeUpload};
use super::forms::JobForm;
use super::service::JobServiceError;
use super::views;
use crate::error::AppError;
use crate::web::forms::FormErrors;
use crate::web::{login_redirect, Portal};

const JOB_LIST_URL: &str = "/jobs/";

/// Job listing, posting, applying, the recruiter dashboard and resume downloads.
pub fn job_routes(max_upload_bytes: usize) -> Router<Portal> {
    Router::new()
        .route("/jobs/", get(job_list))
        .route("/jobs/post/", get(post_job_form).post(post_job))
        .route(
            "/jobs/apply/:job_id/",
            get(apply_form)
                .post(apply)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/jobs/dashboard/", get(recruiter_dashboard))
        .route("/media/resumes/:file_name", get(download_resume))
}

/// Unparseable ids are as unknown as missing ones.
fn parse_job_id(raw: &str) -> Result<JobId, AppError> {
    raw.parse::<u64>().map(JobId).map_err(|_| AppError::NotFound)
}

pub(crate) async fn job_list(
    State(portal): State<Portal>,
    jar: CookieJar,
    uri: Uri,
) -> Result<Response, AppError> {
    let Some(current) = portal.current_user(&jar)? else {
        return Ok(login_redirect(&uri).into_response());
    };
    let jobs = portal.jobs.list_jobs()?;
    let flashes = portal.sessions.take_flashes(&current.session)?;
    Ok(views::job_list_page(&current.user, &jobs, &flashes).into_response())
}

pub(crate) async fn post_job_form(
    State(portal): State<Portal>,
    jar: CookieJar,
    uri: Uri,
) -> Result<Response, AppError> {
    let Some(current) = portal.current_user(&jar)? else {
        return Ok(login_redirect(&uri).into_response());
    };
    if !current.user.role.is_recruiter() {
        return Ok(Redirect::to(JOB_LIST_URL).into_response());
    }
    Ok(views::post_job_page(&current.user, &JobForm::default(), &FormErrors::new()).into_response())
}

pub(crate) async fn post_job(
    State(portal): State<Portal>,
    jar: CookieJar,
    uri: Uri,
    Form(form): Form<JobForm>,
) -> Result<Response, AppError> {
    let Some(current) = portal.current_user(&jar)? else {
        return Ok(login_redirect(&uri).into_response());
    };
    match portal.jobs.post_job(&current.user, &form) {
        Ok(_) | Err(JobServiceError::NotRecruiter) => Ok(Redirect::to(JOB_LIST_URL).into_response()),
        Err(JobServiceError::Validation(errors)) => {
            Ok(views::post_job_page(&current.user, &form, &errors).into_response())
        }
        Err(other) => Err(other.into()),
    }
}

pub(crate) async fn apply_form(
    State(portal): State<Portal>,
    Path(job_id): Path<String>,
    jar: CookieJar,
    uri: Uri,
) -> Result<Response, AppError> {
    let Some(current) = portal.current_user(&jar)? else {
        return Ok(login_redirect(&uri).into_response());
    };
    let job = portal.jobs.job(parse_job_id(&job_id)?)?;
    Ok(views::apply_page(&current.user, &job, &FormErrors::new()).into_response())
}

pub(crate) async fn apply(
    State(portal): State<Portal>,
    Path(job_id): Path<String>,
    jar: CookieJar,
    uri: Uri,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let Some(current) = portal.current_user(&jar)? else {
        return Ok(login_redirect(&uri).into_response());
    };
    let job_id = parse_job_id(&job_id)?;
    let job = portal.jobs.job(job_id)?;

    let upload = match read_resume(multipart).await {
        Ok(upload) => upload,
        Err(errors) => return Ok(views::apply_page(&current.user, &job, &errors).into_response()),
    };

    match portal.jobs.apply(&current.user, job_id, upload).await {
        Ok((job, _)) => {
            portal.sessions.push_flash(
                &current.session,
                format!("You have successfully applied to {}!", job.title),
            )?;
            Ok(Redirect::to(JOB_LIST_URL).into_response())
        }
        Err(JobServiceError::Validation(errors)) => {
            Ok(views::apply_page(&current.user, &job, &errors).into_response())
        }
        Err(other) => Err(other.into()),
    }
}

/// Pulls the `resume` part out of the multipart body. Other parts are ignored.
async fn read_resume(mut multipart: Multipart) -> Result<Option<ResumeUpload>, FormErrors> {
    let malformed = |message: String| {
        let mut errors = FormErrors::new();
        errors.add("resume", format!("Upload failed: {message}"));
        errors
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| malformed(err.body_text()))?
    {
        if field.name() != Some("resume") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|err| malformed(err.body_text()))?;
        return Ok(Some(ResumeUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

pub(crate) async fn recruiter_dashboard(
    State(portal): State<Portal>,
    jar: CookieJar,
    uri: Uri,
) -> Result<Response, AppError> {
    let Some(current) = portal.current_user(&jar)? else {
        return Ok(login_redirect(&uri).into_response());
    };
    match portal.jobs.recruiter_dashboard(&current.user) {
        Ok(dashboard) => Ok(views::recruiter_dashboard_page(&current.user, &dashboard).into_response()),
        Err(JobServiceError::NotRecruiter) => Ok(Redirect::to(JOB_LIST_URL).into_response()),
        Err(other) => Err(other.into()),
    }
}

pub(crate) async fn download_resume(
    State(portal): State<Portal>,
    Path(file_name): Path<String>,
    jar: CookieJar,
    uri: Uri,
) -> Result<Response, AppError> {
    let Some(current) = portal.current_user(&jar)? else {
        return Ok(login_redirect(&uri).into_response());
    };
    let (path, bytes) = portal.jobs.resume_for(&current.user, &file_name).await?;
    let mime = mime_guess::from_path(path.file_name()).first_or_octet_stream();
    let content_type = HeaderValue::from_str(mime.essence_str())
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    Ok(([(CONTENT_TYPE, content_type)], bytes).into_response())
}
