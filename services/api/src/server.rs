use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryProgressRepository, LoggingRankUpNotifier};
use crate::routes::with_progress_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use seva_rank::config::AppConfig;
use seva_rank::error::AppError;
use seva_rank::progression::{ProgressService, RankEngine};
use seva_rank::telemetry;
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

    let engine = Arc::new(RankEngine::from_config(&config.ranking)?);
    let ladder_source = config
        .ranking
        .ladder_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| config.ranking.ladder.label().to_string());
    info!(
        ladder = %ladder_source,
        tiers = engine.ladder().tiers().len(),
        points_per_person = engine.points_per_unit(),
        "rank ladder loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryProgressRepository::default());
    let notifier = Arc::new(LoggingRankUpNotifier::default());
    let progress_service = Arc::new(ProgressService::new(engine, repository, notifier));

    let app = with_progress_routes(progress_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "seva rank service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
