use std::fmt::Write as _;

use axum::response::Html;

use super::domain::{DashboardContext, Role, User};
use super::forms::{LoginForm, SignUpForm};
use crate::web::forms::FormErrors;
use crate::web::html::{error_list, escape_html, input, Layout};

pub(crate) fn register_page(role: Role, form: &SignUpForm, errors: &FormErrors) -> Html<String> {
    let (title, action) = match role {
        Role::Recruiter => ("Register as Recruiter", "/accounts/register/recruiter/"),
        _ => ("Register as Job Seeker", "/accounts/register/jobseeker/"),
    };

    let mut body = String::new();
    let _ = writeln!(body, "<form method=\"post\" action=\"{action}\">");
    body.push_str(&error_list(errors.non_field()));
    body.push_str(&input("Username", "username", "text", &form.username, errors));
    body.push_str(&input("Email", "email", "email", &form.email, errors));
    body.push_str(&input("Password", "password1", "password", "", errors));
    body.push_str(&input(
        "Password confirmation",
        "password2",
        "password",
        "",
        errors,
    ));
    body.push_str("<button type=\"submit\">Register</button>\n</form>");
    Layout::new(title, None).render(&body)
}

pub(crate) fn login_page(form: &LoginForm, errors: &FormErrors, next: Option<&str>) -> Html<String> {
    let mut body = String::from("<form method=\"post\" action=\"/accounts/login/\">\n");
    body.push_str(&error_list(errors.non_field()));
    body.push_str(&input("Username", "username", "text", &form.username, errors));
    body.push_str(&input("Password", "password", "password", "", errors));
    if let Some(next) = next {
        let _ = writeln!(
            body,
            "<input type=\"hidden\" name=\"next\" value=\"{}\">",
            escape_html(next)
        );
    }
    body.push_str("<button type=\"submit\">Log in</button>\n</form>");
    Layout::new("Log in", None).render(&body)
}

pub(crate) fn recruiter_dashboard_page(user: &User, context: &DashboardContext) -> Html<String> {
    let mut body = profile(context);
    body.push_str("<ul>\n<li><a href=\"/jobs/post/\">Post a new job</a></li>\n");
    body.push_str("<li><a href=\"/jobs/dashboard/\">Review applications to your jobs</a></li>\n");
    body.push_str("<li><a href=\"/jobseekers/\">Browse job seekers</a></li>\n</ul>");
    Layout::new("Recruiter Dashboard", Some(user)).render(&body)
}

pub(crate) fn jobseeker_dashboard_page(user: &User, context: &DashboardContext) -> Html<String> {
    let mut body = profile(context);
    body.push_str("<ul>\n<li><a href=\"/jobs/\">Browse open jobs</a></li>\n");
    body.push_str("<li><a href=\"/recruiters/\">Browse recruiters</a></li>\n</ul>");
    Layout::new("Job Seeker Dashboard", Some(user)).render(&body)
}

fn profile(context: &DashboardContext) -> String {
    format!(
        "<p>Welcome, {}!</p>\n<dl><dt>Email</dt><dd>{}</dd><dt>Role</dt><dd>{}</dd></dl>\n",
        escape_html(&context.username),
        escape_html(&context.email),
        context.role,
    )
}

pub(crate) fn user_list_page(viewer: &User, title: &str, users: &[User]) -> Html<String> {
    let mut body = String::new();
    if users.is_empty() {
        body.push_str("<p>No users yet.</p>");
    } else {
        body.push_str("<ul>\n");
        for user in users {
            let _ = writeln!(
                body,
                "<li>{} &lt;{}&gt;</li>",
                escape_html(&user.username),
                escape_html(&user.email)
            );
        }
        body.push_str("</ul>");
    }
    Layout::new(title, Some(viewer)).render(&body)
}
