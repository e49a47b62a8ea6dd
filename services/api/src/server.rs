use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCampaignStore};
use crate::routes::with_campaign_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recruit_ai::config::AppConfig;
use recruit_ai::error::AppError;
use recruit_ai::telemetry;
use recruit_ai::workflows::campaign::{
    CampaignAppState, CampaignOrchestrator, CampaignSettings, StaticCandidateCatalog,
};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
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

    let catalog = Arc::new(StaticCandidateCatalog::builtin());
    let orchestrator = Arc::new(Mutex::new(CampaignOrchestrator::new(
        catalog,
        CampaignSettings::default(),
    )));
    let store = if config.seed_demo_campaign {
        Arc::new(InMemoryCampaignStore::with_seed_campaign()?)
    } else {
        Arc::new(InMemoryCampaignStore::default())
    };
    let campaign_state = CampaignAppState {
        orchestrator,
        store,
    };

    let app = with_campaign_routes(campaign_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "recruitment campaign orchestrator ready");

    axum::serve(listener, app).await?;
    Ok(())
}
