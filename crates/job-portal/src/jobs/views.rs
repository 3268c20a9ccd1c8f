use std::fmt::Write as _;

use axum::response::Html;

use super::domain::{Job, RecruiterDashboard};
use super::forms::JobForm;
use crate::accounts::User;
use crate::web::forms::FormErrors;
use crate::web::html::{error_list, escape_html, input, textarea, Layout};

pub(crate) fn job_list_page(user: &User, jobs: &[Job], flashes: &[String]) -> Html<String> {
    let mut body = String::new();
    if jobs.is_empty() {
        body.push_str("<p>No jobs have been posted yet.</p>");
    } else {
        body.push_str("<ul class=\"jobs\">\n");
        for job in jobs {
            let _ = writeln!(
                body,
                "<li><h2>{}</h2><p>{} &middot; {}</p><p>{}</p><a href=\"/jobs/apply/{}/\">Apply</a></li>",
                escape_html(&job.title),
                escape_html(&job.company),
                escape_html(&job.location),
                escape_html(&job.description),
                job.id,
            );
        }
        body.push_str("</ul>");
    }
    Layout::new("Job Listings", Some(user))
        .with_flashes(flashes)
        .render(&body)
}

pub(crate) fn post_job_page(user: &User, form: &JobForm, errors: &FormErrors) -> Html<String> {
    let mut body = String::from("<form method=\"post\" action=\"/jobs/post/\">\n");
    body.push_str(&error_list(errors.non_field()));
    body.push_str(&input("Title", "title", "text", &form.title, errors));
    body.push_str(&textarea("Description", "description", &form.description, errors));
    body.push_str(&input("Company", "company", "text", &form.company, errors));
    body.push_str(&input("Location", "location", "text", &form.location, errors));
    body.push_str("<button type=\"submit\">Post job</button>\n</form>");
    Layout::new("Post a Job", Some(user)).render(&body)
}

pub(crate) fn apply_page(user: &User, job: &Job, errors: &FormErrors) -> Html<String> {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<p>{} at {} ({})</p>",
        escape_html(&job.title),
        escape_html(&job.company),
        escape_html(&job.location)
    );
    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"/jobs/apply/{}/\" enctype=\"multipart/form-data\">",
        job.id
    );
    body.push_str(&error_list(errors.field("resume")));
    body.push_str("<p><label for=\"id_resume\">Resume</label> <input type=\"file\" name=\"resume\" id=\"id_resume\"></p>\n");
    body.push_str("<button type=\"submit\">Apply</button>\n</form>");
    let title = format!("Apply for {}", job.title);
    Layout::new(&title, Some(user)).render(&body)
}

pub(crate) fn recruiter_dashboard_page(user: &User, dashboard: &RecruiterDashboard) -> Html<String> {
    let mut body = String::from("<h2>Your jobs</h2>\n");
    if dashboard.jobs.is_empty() {
        body.push_str("<p>You have not posted any jobs.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for job in &dashboard.jobs {
            let _ = writeln!(
                body,
                "<li>{} &middot; {} &middot; {}</li>",
                escape_html(&job.title),
                escape_html(&job.company),
                escape_html(&job.location)
            );
        }
        body.push_str("</ul>\n");
    }

    body.push_str("<h2>Applications</h2>\n");
    if dashboard.applications.is_empty() {
        body.push_str("<p>No applications yet.</p>");
    } else {
        body.push_str("<table>\n<tr><th>Job</th><th>Applicant</th><th>Resume</th></tr>\n");
        for view in &dashboard.applications {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{}</td><td><a href=\"{}\">{}</a></td></tr>",
                escape_html(&view.job_title),
                escape_html(&view.applicant_username),
                escape_html(&view.application.resume.url()),
                escape_html(view.application.resume.file_name()),
            );
        }
        body.push_str("</table>");
    }
    Layout::new("Recruiter Dashboard", Some(user)).render(&body)
}
