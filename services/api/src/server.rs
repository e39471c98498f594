use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDonorRepository, InMemoryNotificationDispatcher};
use crate::routes::with_screening_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use blood_bridge::config::AppConfig;
use blood_bridge::error::AppError;
use blood_bridge::telemetry;
use blood_bridge::workflows::screening::DonorScreeningService;
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

    let repository = Arc::new(InMemoryDonorRepository::default());
    let notifications = Arc::new(InMemoryNotificationDispatcher::default());
    let screening_service = Arc::new(DonorScreeningService::new(
        repository,
        notifications,
        config.eligibility,
    ));

    let app = with_screening_routes(screening_service.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        missing_values = ?screening_service.evaluator().thresholds().missing_values,
        "blood bridge screening service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
