use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned identifier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The single role a user holds. Each registration path assigns exactly one;
/// only the JSON API can produce `Unassigned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Recruiter,
    JobSeeker,
    Unassigned,
}

impl Role {
    /// Maps the API's free-form role string. Unknown values leave the user unassigned.
    pub fn from_api(raw: &str) -> Self {
        match raw {
            "recruiter" => Self::Recruiter,
            "jobseeker" => Self::JobSeeker,
            _ => Self::Unassigned,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Recruiter => "Recruiter",
            Self::JobSeeker => "Job Seeker",
            Self::Unassigned => "Unassigned",
        }
    }

    pub fn is_recruiter(self) -> bool {
        matches!(self, Self::Recruiter)
    }

    pub fn is_jobseeker(self) -> bool {
        matches!(self, Self::JobSeeker)
    }
}

/// Argon2 PHC string. Never rendered or serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(pub String);

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password: PasswordDigest,
    pub role: Role,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: PasswordDigest,
    pub role: Role,
}

/// Public projection returned by the users API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// Template context shared by both dashboards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardContext {
    pub username: String,
    pub email: String,
    pub role: &'static str,
}

/// Which dashboard a user lands on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dashboard {
    Recruiter(DashboardContext),
    JobSeeker(DashboardContext),
    /// No role: the caller is sent back to the login page.
    Unavailable,
}

impl Dashboard {
    pub fn for_user(user: &User) -> Self {
        let context = DashboardContext {
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.label(),
        };
        match user.role {
            Role::Recruiter => Self::Recruiter(context),
            Role::JobSeeker => Self::JobSeeker(context),
            Role::Unassigned => Self::Unavailable,
        }
    }
}
