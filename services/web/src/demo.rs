use crate::infra::build_portal;
use async_trait::async_trait;
use clap::Args;
use job_portal::accounts::{
    Dashboard, MailError, Mailer, OutgoingMail, Role, SignUpForm, WelcomeMailWorker,
};
use job_portal::config::AppConfig;
use job_portal::error::AppError;
use job_portal::jobs::{JobForm, ResumeUpload};
use job_portal::store::MemoryResumeStore;
use std::sync::Arc;
use std::time::Duration;

const DEMO_PASSWORD: &str = "demo-Passw0rd!";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Title of the job the demo recruiter posts
    #[arg(long, default_value = "Backend Engineer")]
    pub(crate) title: String,
    /// Stop after posting the job; no application is made
    #[arg(long)]
    pub(crate) skip_application: bool,
}

/// Prints outgoing mail to stdout so the walkthrough shows the welcome email.
struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        println!(
            "\n[mail] from {} to {}\n       subject: {}\n       {}",
            mail.from_email,
            mail.recipients.join(", "),
            mail.subject,
            mail.body
        );
        Ok(())
    }
}

fn sign_up(username: &str) -> SignUpForm {
    SignUpForm {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password1: DEMO_PASSWORD.to_string(),
        password2: DEMO_PASSWORD.to_string(),
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let (portal, receiver) = build_portal(&config, Arc::new(MemoryResumeStore::default()));
    let worker = WelcomeMailWorker::new(
        Arc::new(ConsoleMailer),
        config.mail.default_from_email.clone(),
        config.mail.max_attempts,
    )
    .with_backoff(Duration::from_millis(100))
    .spawn(receiver);

    println!("Job portal demo");

    let recruiter = portal
        .accounts
        .register(&sign_up("rita"), Role::Recruiter)
        .await?;
    println!(
        "- Registered {} as {} (welcome email queued)",
        recruiter.username,
        recruiter.role.label()
    );

    let job = portal.jobs.post_job(
        &recruiter,
        &JobForm {
            title: args.title.clone(),
            description: "Own the APIs behind our hiring tools.".to_string(),
            company: "Acme Staffing".to_string(),
            location: "Remote".to_string(),
        },
    )?;
    println!(
        "- {} posted job #{}: {} at {} ({})",
        recruiter.username, job.id, job.title, job.company, job.location
    );

    if !args.skip_application {
        let seeker = portal
            .accounts
            .register(&sign_up("sam"), Role::JobSeeker)
            .await?;
        println!(
            "- Registered {} as {}",
            seeker.username,
            seeker.role.label()
        );

        let (job, application) = portal
            .jobs
            .apply(
                &seeker,
                job.id,
                Some(ResumeUpload {
                    file_name: "sam resume.pdf".to_string(),
                    content_type: Some("application/pdf".to_string()),
                    bytes: b"%PDF-1.4 demo resume".to_vec(),
                }),
            )
            .await?;
        println!(
            "- {} applied to {} with {}",
            seeker.username,
            job.title,
            application.resume.url()
        );

        if let Dashboard::JobSeeker(context) = portal.accounts.dashboard(&seeker) {
            println!("- {}'s dashboard: {} <{}>", context.username, context.role, context.email);
        }
    }

    let dashboard = portal.jobs.recruiter_dashboard(&recruiter)?;
    println!("\nRecruiter dashboard for {}", recruiter.username);
    for job in &dashboard.jobs {
        println!("  job #{}: {}", job.id, job.title);
    }
    if dashboard.applications.is_empty() {
        println!("  no applications yet");
    }
    for view in &dashboard.applications {
        println!(
            "  {} applied to {} -> {}",
            view.applicant_username,
            view.job_title,
            view.application.resume.url()
        );
    }

    let users = portal.accounts.list_users()?;
    let listing = serde_json::to_string_pretty(&users).map_err(std::io::Error::from)?;
    println!("\nGET /api/users/\n{listing}");

    drop(portal);
    worker.await.map_err(std::io::Error::other)?;
    Ok(())
}
