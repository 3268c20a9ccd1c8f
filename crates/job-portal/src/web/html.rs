use std::fmt::Write as _;

use axum::response::Html;

use super::forms::FormErrors;
use crate::accounts::User;

/// Chrome shared by every page: title, navigation for the current user, flashes.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    pub title: &'a str,
    pub user: Option<&'a User>,
    pub flashes: &'a [String],
}

impl<'a> Layout<'a> {
    pub fn new(title: &'a str, user: Option<&'a User>) -> Self {
        Self {
            title,
            user,
            flashes: &[],
        }
    }

    pub fn with_flashes(mut self, flashes: &'a [String]) -> Self {
        self.flashes = flashes;
        self
    }

    pub fn render(&self, body: &str) -> Html<String> {
        let mut html = String::with_capacity(body.len() + 512);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\">");
        let _ = write!(html, "<title>{} | Job Portal</title></head>\n<body>\n", escape_html(self.title));

        html.push_str("<nav><a href=\"/jobs/\">Jobs</a>");
        match self.user {
            Some(user) => {
                html.push_str(" | <a href=\"/dashboard/\">Dashboard</a>");
                if user.role.is_recruiter() {
                    html.push_str(" | <a href=\"/jobs/post/\">Post a job</a>");
                    html.push_str(" | <a href=\"/jobs/dashboard/\">Applications</a>");
                }
                let _ = write!(
                    html,
                    " | <span>{}</span> <form method=\"post\" action=\"/accounts/logout/\" style=\"display:inline\"><button type=\"submit\">Log out</button></form>",
                    escape_html(&user.username)
                );
            }
            None => {
                html.push_str(" | <a href=\"/accounts/login/\">Log in</a>");
                html.push_str(" | <a href=\"/accounts/register/recruiter/\">Register as recruiter</a>");
                html.push_str(" | <a href=\"/accounts/register/jobseeker/\">Register as job seeker</a>");
            }
        }
        html.push_str("</nav>\n");

        if !self.flashes.is_empty() {
            html.push_str("<ul class=\"messages\">");
            for message in self.flashes {
                let _ = write!(html, "<li class=\"success\">{}</li>", escape_html(message));
            }
            html.push_str("</ul>\n");
        }

        let _ = writeln!(html, "<main>\n<h1>{}</h1>", escape_html(self.title));
        html.push_str(body);
        html.push_str("\n</main>\n</body>\n</html>\n");
        Html(html)
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// `<ul class="errorlist">` for one field, or nothing.
pub fn error_list(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut html = String::from("<ul class=\"errorlist\">");
    for message in errors {
        let _ = write!(html, "<li>{}</li>", escape_html(message));
    }
    html.push_str("</ul>");
    html
}

/// Labelled input with its inline errors. Password inputs never echo a value.
pub fn input(
    label: &str,
    name: &'static str,
    kind: &str,
    value: &str,
    errors: &FormErrors,
) -> String {
    let value = if kind == "password" { "" } else { value };
    format!(
        "<p>{errors}<label for=\"id_{name}\">{label}</label> <input type=\"{kind}\" name=\"{name}\" id=\"id_{name}\" value=\"{value}\"></p>\n",
        errors = error_list(errors.field(name)),
        label = escape_html(label),
        value = escape_html(value),
    )
}

pub fn textarea(label: &str, name: &'static str, value: &str, errors: &FormErrors) -> String {
    format!(
        "<p>{errors}<label for=\"id_{name}\">{label}</label> <textarea name=\"{name}\" id=\"id_{name}\" rows=\"6\">{value}</textarea></p>\n",
        errors = error_list(errors.field(name)),
        label = escape_html(label),
        value = escape_html(value),
    )
}
