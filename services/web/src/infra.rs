use job_portal::accounts::{AccountService, ChannelQueue, QueueReceiver};
use job_portal::config::AppConfig;
use job_portal::jobs::{JobService, ResumeStore};
use job_portal::store::{
    MemoryApplicationRepository, MemoryJobRepository, MemorySessionStore, MemoryUserRepository,
};
use job_portal::web::session::SessionManager;
use job_portal::web::Portal;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires the services over in-memory repositories. The returned receiver must be
/// handed to a mail worker; dropping the portal closes the queue.
pub(crate) fn build_portal(
    config: &AppConfig,
    resumes: Arc<dyn ResumeStore>,
) -> (Portal, QueueReceiver) {
    let users = Arc::new(MemoryUserRepository::default());
    let (queue, receiver) = ChannelQueue::new(config.mail.queue_capacity);

    let accounts = AccountService::new(users.clone(), Arc::new(queue));
    let jobs = JobService::new(
        Arc::new(MemoryJobRepository::default()),
        Arc::new(MemoryApplicationRepository::default()),
        users,
        resumes,
    );
    let sessions = SessionManager::new(Arc::new(MemorySessionStore::default()), &config.session);

    let portal = Portal {
        accounts: Arc::new(accounts),
        jobs: Arc::new(jobs),
        sessions: Arc::new(sessions),
        max_upload_bytes: config.media.max_upload_bytes,
    };
    (portal, receiver)
}
