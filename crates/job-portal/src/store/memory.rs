use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::RepositoryError;
use crate::accounts::{NewUser, User, UserId, UserRepository};
use crate::jobs::{
    Application, ApplicationId, ApplicationRepository, Job, JobId, JobRepository, NewApplication,
    NewJob, ResumePath, ResumeStore, ResumeUpload, StorageError,
};
use crate::jobs::storage::sanitize_file_name;
use crate::web::session::{SessionId, SessionRecord, SessionStore};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
}

/// Rows in insertion order; ids count up from 1.
#[derive(Debug)]
struct Table<T> {
    rows: Vec<T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryUserRepository {
    table: Arc<Mutex<Table<User>>>,
}

impl UserRepository for MemoryUserRepository {
    fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut table = lock(&self.table)?;
        if table.rows.iter().any(|row| row.username == user.username) {
            return Err(RepositoryError::Conflict);
        }
        let stored = User {
            id: UserId(table.allocate()),
            username: user.username,
            email: user.email,
            password: user.password,
            role: user.role,
        };
        table.rows.push(stored.clone());
        Ok(stored)
    }

    fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let table = lock(&self.table)?;
        Ok(table.rows.iter().find(|row| row.id == id).cloned())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let table = lock(&self.table)?;
        Ok(table.rows.iter().find(|row| row.username == username).cloned())
    }

    fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(lock(&self.table)?.rows.clone())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryJobRepository {
    table: Arc<Mutex<Table<Job>>>,
}

impl JobRepository for MemoryJobRepository {
    fn insert(&self, job: NewJob) -> Result<Job, RepositoryError> {
        let mut table = lock(&self.table)?;
        let stored = Job {
            id: JobId(table.allocate()),
            title: job.title,
            description: job.description,
            company: job.company,
            location: job.location,
            posted_by: job.posted_by,
        };
        table.rows.push(stored.clone());
        Ok(stored)
    }

    fn fetch(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let table = lock(&self.table)?;
        Ok(table.rows.iter().find(|row| row.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<Job>, RepositoryError> {
        Ok(lock(&self.table)?.rows.clone())
    }

    fn posted_by(&self, owner: UserId) -> Result<Vec<Job>, RepositoryError> {
        let table = lock(&self.table)?;
        Ok(table
            .rows
            .iter()
            .filter(|row| row.posted_by == owner)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryApplicationRepository {
    table: Arc<Mutex<Table<Application>>>,
}

impl MemoryApplicationRepository {
    pub fn len(&self) -> usize {
        self.table.lock().map(|table| table.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ApplicationRepository for MemoryApplicationRepository {
    fn insert(&self, application: NewApplication) -> Result<Application, RepositoryError> {
        let mut table = lock(&self.table)?;
        let stored = Application {
            id: ApplicationId(table.allocate()),
            job: application.job,
            applicant: application.applicant,
            resume: application.resume,
        };
        table.rows.push(stored.clone());
        Ok(stored)
    }

    fn for_jobs(&self, jobs: &[JobId]) -> Result<Vec<Application>, RepositoryError> {
        let table = lock(&self.table)?;
        Ok(table
            .rows
            .iter()
            .filter(|row| jobs.contains(&row.job))
            .cloned()
            .collect())
    }

    fn by_resume(&self, resume: &ResumePath) -> Result<Option<Application>, RepositoryError> {
        let table = lock(&self.table)?;
        Ok(table.rows.iter().find(|row| &row.resume == resume).cloned())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl MemorySessionStore {
    pub fn len(&self) -> usize {
        self.sessions.lock().map(|sessions| sessions.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    fn put(&self, id: SessionId, record: SessionRecord) -> Result<(), RepositoryError> {
        lock(&self.sessions)?.insert(id, record);
        Ok(())
    }

    fn get(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Ok(lock(&self.sessions)?.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        lock(&self.sessions)?.remove(id);
        Ok(())
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, RepositoryError> {
        let mut sessions = lock(&self.sessions)?;
        let before = sessions.len();
        sessions.retain(|_, record| !record.is_expired(now));
        Ok(before - sessions.len())
    }
}

/// Resume store that keeps files in memory, for tests and the demo.
#[derive(Debug, Default, Clone)]
pub struct MemoryResumeStore {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryResumeStore {
    pub fn len(&self) -> usize {
        self.files.lock().map(|files| files.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn save(&self, upload: &ResumeUpload) -> Result<ResumePath, StorageError> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| StorageError::Io(std::io::Error::other("resume store poisoned")))?;
        let base = sanitize_file_name(&upload.file_name);
        let mut name = base.clone();
        let mut counter = 1;
        while files.contains_key(&name) {
            name = format!("{counter}_{base}");
            counter += 1;
        }
        files.insert(name.clone(), upload.bytes.clone());
        Ok(ResumePath::in_resumes(&name))
    }

    async fn read(&self, path: &ResumePath) -> Result<Vec<u8>, StorageError> {
        let files = self
            .files
            .lock()
            .map_err(|_| StorageError::Io(std::io::Error::other("resume store poisoned")))?;
        files
            .get(path.file_name())
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn remove(&self, path: &ResumePath) -> Result<(), StorageError> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| StorageError::Io(std::io::Error::other("resume store poisoned")))?;
        files.remove(path.file_name());
        Ok(())
    }
}
