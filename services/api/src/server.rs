use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryApplicationRepository};
use crate::routes::with_status_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use case_review::config::AppConfig;
use case_review::error::AppError;
use case_review::telemetry;
use case_review::workflows::status_update::{ApplicationStatusService, CommentAuthor};
use std::sync::atomic::Ordering;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryApplicationRepository::seeded());
    let author = CommentAuthor::new(config.review.default_actor());
    let status_service = Arc::new(ApplicationStatusService::new(repository, author));

    let app = with_status_routes(status_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        reviewer = %config.review.actor_name,
        "application status review service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
