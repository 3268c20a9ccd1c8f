use serde::Deserialize;

use super::domain::{NewJob, ResumeUpload};
use crate::accounts::UserId;
use crate::web::forms::{check_text, FormErrors};

const SHORT_TEXT_MAX_CHARS: usize = 200;

pub const NO_FILE: &str = "No file was submitted.";
pub const EMPTY_FILE: &str = "The submitted file is empty.";

/// Posting form. The owner is never a form field; it is the logged-in recruiter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
}

impl JobForm {
    pub fn validate(&self, posted_by: UserId) -> Result<NewJob, FormErrors> {
        let mut errors = FormErrors::new();
        check_text(&mut errors, "title", &self.title, Some(SHORT_TEXT_MAX_CHARS));
        check_text(&mut errors, "description", &self.description, None);
        check_text(&mut errors, "company", &self.company, Some(SHORT_TEXT_MAX_CHARS));
        check_text(&mut errors, "location", &self.location, Some(SHORT_TEXT_MAX_CHARS));

        errors.into_result(NewJob {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            company: self.company.trim().to_string(),
            location: self.location.trim().to_string(),
            posted_by,
        })
    }
}

/// Checks the uploaded resume field.
pub fn validate_resume(upload: Option<ResumeUpload>) -> Result<ResumeUpload, FormErrors> {
    let mut errors = FormErrors::new();
    match upload {
        Some(upload) if upload.file_name.trim().is_empty() => {
            errors.add("resume", NO_FILE);
            Err(errors)
        }
        Some(upload) if upload.bytes.is_empty() => {
            errors.add("resume", EMPTY_FILE);
            Err(errors)
        }
        Some(upload) => Ok(upload),
        None => {
            errors.add("resume", NO_FILE);
            Err(errors)
        }
    }
}
