use crate::cli::ServeArgs;
use crate::infra::{build_portal, AppState};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_portal::accounts::{LogMailer, WelcomeMailWorker};
use job_portal::config::AppConfig;
use job_portal::error::AppError;
use job_portal::jobs::FsResumeStore;
use job_portal::telemetry;
use job_portal::web::portal_router;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(root) = args.media_root.take() {
        config.media.root = root;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    tokio::fs::create_dir_all(&config.media.root).await?;
    let resumes = Arc::new(FsResumeStore::new(config.media.root.clone()));
    let (portal, receiver) = build_portal(&config, resumes);
    WelcomeMailWorker::new(
        Arc::new(LogMailer),
        config.mail.default_from_email.clone(),
        config.mail.max_attempts,
    )
    .spawn(receiver);

    let app = with_operational_routes(portal_router(portal))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        media_root = %config.media.root.display(),
        "job portal ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
