use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use sentry::integrations::debug_images::DebugImagesIntegration;
use sentry::types::Dsn;
use sentry::ClientOptions;
use sentry_tracing::EventFilter;
use tokio::time;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod bot;
mod config;
mod server;

use bot::auth::OwnerGuard;
use bot::dispatcher::Dispatcher;
use bot::services::github_status::GithubStatusBackend;
use bot::services::link_info::HttpEnricher;
use bot::services::status_store::{MemoryCell, StatusStore};
use bot::services::telegram_api::TelegramApi;
use config::{Config, CONFIG};

type LiveDispatcher = Dispatcher<GithubStatusBackend, TelegramApi, HttpEnricher>;

fn init_sentry(config: &Config) -> Option<sentry::ClientInitGuard> {
    let raw = config.sentry_dsn.as_deref()?;

    let dsn = match Dsn::from_str(raw) {
        Ok(v) => v,
        Err(err) => {
            warn!("Invalid SENTRY_DSN, error reporting disabled: {err}");
            return None;
        }
    };

    let options = ClientOptions {
        dsn: Some(dsn),
        default_integrations: false,
        ..Default::default()
    }
    .add_integration(DebugImagesIntegration::new());

    Some(sentry::init(options))
}

fn build_dispatcher(config: &Config) -> anyhow::Result<Option<LiveDispatcher>> {
    let (token, owner) = match (&config.bot_token, &config.owner_id) {
        (Some(token), Some(owner)) => (token, owner),
        _ => {
            error!("Missing BOT_TOKEN or OWNER_CHAT_ID, webhook will refuse updates");
            return Ok(None);
        }
    };

    let memory = MemoryCell::new(config.site_active_default);

    let store = match &config.remote_status {
        Some(remote) => {
            let backend = GithubStatusBackend::new(remote)?;
            info!("Site status stored at {}", backend.url());
            StatusStore::new(Some(backend), memory)
        }
        None => {
            info!("No remote status backend configured, keeping status in memory");
            StatusStore::memory_only(memory)
        }
    };

    let gateway = TelegramApi::new(&config.telegram_bot_api, token);
    let enricher = HttpEnricher::new(config.link_info_api.clone(), config.shortener_api.clone())?;

    Ok(Some(Dispatcher::new(
        store,
        OwnerGuard::new(owner),
        gateway,
        enricher,
    )))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let sentry_layer = sentry_tracing::layer().event_filter(|md| match md.level() {
        &tracing::Level::ERROR => EventFilter::Event,
        _ => EventFilter::Ignore,
    });

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("site_toggle_bot=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .with(sentry_layer)
        .init();

    let config = &*CONFIG;
    let _sentry = init_sentry(config);

    let dispatcher = build_dispatcher(config)?.map(Arc::new);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let metric_router = axum::Router::new().route(
        "/metrics",
        get(move || {
            let handle = metric_handle.clone();
            async move { handle.render() }
        }),
    );

    let app = server::router(server::AppState::new(dispatcher))
        .merge(metric_router)
        .layer(prometheus_layer);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.webhook_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Listening on {addr}, webhook at {}", server::WEBHOOK_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let mut interval = time::interval(Duration::from_secs(1));

            while running.load(Ordering::SeqCst) {
                interval.tick().await;
            }
        })
        .await?;

    info!("Webserver shutdown...");

    Ok(())
}
