use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE};
use axum::http::Request;

use crate::accounts::User;
use crate::jobs::{Job, JobForm, ResumeUpload};
use crate::web::testing::Harness;

const BOUNDARY: &str = "portal-test-boundary";

pub(super) fn job_form(title: &str) -> JobForm {
    JobForm {
        title: title.to_string(),
        description: "Build and run the hiring pipeline.".to_string(),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
    }
}

pub(super) fn post(harness: &Harness, recruiter: &User, title: &str) -> Job {
    harness
        .portal
        .jobs
        .post_job(recruiter, &job_form(title))
        .expect("job posted")
}

pub(super) fn resume(file_name: &str) -> ResumeUpload {
    ResumeUpload {
        file_name: file_name.to_string(),
        content_type: Some("application/pdf".to_string()),
        bytes: b"%PDF-1.4 resume".to_vec(),
    }
}

/// `multipart/form-data` request carrying one file part named `field`.
pub(super) fn multipart_upload(
    path: &str,
    cookie: &str,
    field: &str,
    file_name: &str,
    contents: &[u8],
) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post(path)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .header(COOKIE, cookie)
        .body(Body::from(body))
        .expect("request")
}
