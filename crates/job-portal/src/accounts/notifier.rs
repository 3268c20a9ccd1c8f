//! Welcome mail hand-off.
//!
//! Registration only ever calls [`NotificationQueue::enqueue`]; delivery,
//! retries and failures belong to whatever drains the queue. The in-process
//! implementation is a bounded tokio channel drained by [`WelcomeMailWorker`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub const WELCOME_SUBJECT: &str = "Welcome to Job Portal";

/// Unit of work enqueued after a recruiter registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeEmail {
    pub email: String,
    pub username: String,
}

impl WelcomeEmail {
    pub fn message(&self, from_email: &str) -> OutgoingMail {
        OutgoingMail {
            subject: WELCOME_SUBJECT.to_string(),
            body: format!("Hi {}, thank you for registering!", self.username),
            from_email: from_email.to_string(),
            recipients: vec![self.email.clone()],
        }
    }
}

/// Opaque receipt for an enqueued job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobHandle(pub u64);

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("notification queue is full")]
    Full,
    #[error("notification queue is closed")]
    Closed,
}

/// Fire-and-forget queue for welcome notifications.
pub trait NotificationQueue: Send + Sync {
    fn enqueue(&self, job: WelcomeEmail) -> Result<JobHandle, QueueError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub subject: String,
    pub body: String,
    pub from_email: String,
    pub recipients: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}

/// Mail transport adapter.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// Transport that writes mail to the log instead of delivering it.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        info!(
            subject = %mail.subject,
            from = %mail.from_email,
            to = ?mail.recipients,
            body = %mail.body,
            "outgoing mail"
        );
        Ok(())
    }
}

#[derive(Debug)]
struct Envelope {
    handle: JobHandle,
    job: WelcomeEmail,
}

/// Bounded in-process queue. `enqueue` never blocks.
#[derive(Debug, Clone)]
pub struct ChannelQueue {
    sender: mpsc::Sender<Envelope>,
    sequence: Arc<AtomicU64>,
}

impl ChannelQueue {
    pub fn new(capacity: usize) -> (Self, QueueReceiver) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let queue = Self {
            sender,
            sequence: Arc::new(AtomicU64::new(1)),
        };
        (queue, QueueReceiver { inner: receiver })
    }
}

impl NotificationQueue for ChannelQueue {
    fn enqueue(&self, job: WelcomeEmail) -> Result<JobHandle, QueueError> {
        let handle = JobHandle(self.sequence.fetch_add(1, Ordering::Relaxed));
        self.sender
            .try_send(Envelope { handle, job })
            .map_err(|err| match err {
                mpsc::error::TrySendError::Full(_) => QueueError::Full,
                mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
            })?;
        Ok(handle)
    }
}

/// Receiving half handed to the worker.
#[derive(Debug)]
pub struct QueueReceiver {
    inner: mpsc::Receiver<Envelope>,
}

/// Drains the queue and delivers each welcome email, retrying failed sends.
pub struct WelcomeMailWorker {
    mailer: Arc<dyn Mailer>,
    from_email: String,
    max_attempts: u32,
    backoff: Duration,
}

impl WelcomeMailWorker {
    pub fn new(mailer: Arc<dyn Mailer>, from_email: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            mailer,
            from_email: from_email.into(),
            max_attempts: max_attempts.max(1),
            backoff: Duration::from_secs(1),
        }
    }

    /// Delay before attempt `n + 1` is `backoff * n`.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Runs until every [`ChannelQueue`] clone has been dropped.
    pub fn spawn(self, receiver: QueueReceiver) -> JoinHandle<()> {
        tokio::spawn(self.run(receiver))
    }

    pub async fn run(self, mut receiver: QueueReceiver) {
        while let Some(envelope) = receiver.inner.recv().await {
            self.deliver(envelope).await;
        }
    }

    async fn deliver(&self, envelope: Envelope) {
        let mail = envelope.job.message(&self.from_email);
        for attempt in 1..=self.max_attempts {
            match self.mailer.send(&mail).await {
                Ok(()) => {
                    info!(job = envelope.handle.0, username = %envelope.job.username, attempt, "welcome email delivered");
                    return;
                }
                Err(err) if attempt < self.max_attempts => {
                    warn!(job = envelope.handle.0, attempt, error = %err, "welcome email failed, retrying");
                    tokio::time::sleep(self.backoff * attempt).await;
                }
                Err(err) => {
                    warn!(job = envelope.handle.0, attempts = attempt, error = %err, "welcome email abandoned");
                }
            }
        }
    }
}
