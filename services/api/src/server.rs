use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAutomationGateway};
use crate::routes::with_board_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

use jobdeck::board::{ApplicationGateway, BoardService, HttpGateway};
use jobdeck::config::AppConfig;
use jobdeck::error::AppError;
use jobdeck::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    match config.upstream.base_url.clone() {
        Some(base_url) => {
            let gateway = HttpGateway::new(&base_url)?;
            info!(%base_url, "using remote automation gateway");
            serve(config, Arc::new(BoardService::new(Arc::new(gateway)))).await
        }
        None => {
            info!("AUTOMATION_API_URL not configured; serving the seeded in-memory board");
            let gateway = InMemoryAutomationGateway::seeded();
            serve(config, Arc::new(BoardService::new(Arc::new(gateway)))).await
        }
    }
}

async fn serve<G>(config: AppConfig, service: Arc<BoardService<G>>) -> Result<(), AppError>
where
    G: ApplicationGateway + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    if let Err(error) = service.load().await {
        warn!(%error, "initial board load failed; the board starts empty");
    }

    let app = with_board_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "jobdeck board service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
